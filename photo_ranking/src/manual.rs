/*!

This is the long-form manual for `photo_ranking` and `photojudge`.

## Sources

Records can come from three kinds of sources. They are merged by identity
key: the path of the image relative to the contest folder, with forward
slashes, in Unicode NFC form. Case matters: `Ana/Foto.JPG` and `ana/foto.jpg`
are two different images.

### Folder scans

Every image file under the contest folder becomes a record. The key of an
image includes the name of the contest folder itself, for example
`CONCURSANTES/Ana Pérez/amanecer.jpg`.

Recognized formats:
* `jpg`, `jpeg`, `png`, `webp`, `gif`: displayed directly
* `tif`, `tiff`, `bmp`: legacy formats that need a conversion

When the same picture was submitted in two formats (`photo.tiff` and
`photo.jpg` in the same folder, base names compared without case), only the
directly displayable variant is kept. The other one is reported and ignored.

A `pdf` file in a folder is attached to every image of that folder (the
first one in path order if there are several).

A re-scan never changes scores, observations or names. It refreshes the
previews and attachments, and clears a previous conversion error once the
image converts successfully.

### Spreadsheet imports

The sheet must have a header row. Columns are found by name:

| Column | Required | Notes |
|---|---|---|
| `ID (Clave de Ordenación)` | yes | the identity key; `\` separators are accepted |
| `Nombre de Imagen` | no | replaces the current name when not empty |
| `Calidad Artística (pts)` | no | number, 0 when missing or invalid |
| `Contextualización (pts)` | no | number, 0 when missing or invalid |
| `Originalidad (pts)` | no | number, 0 when missing or invalid |
| `Puntuación Total (pts)` | no | ignored: the total is always recomputed |
| `Observaciones` | no | free text |

Rows without an identity are skipped and reported. An import overwrites the
scores and observations of the images it lists, and leaves the other images
alone. Rows for unknown images are added and reported.

Both `.xlsx` (first worksheet) and `.csv` files are accepted.

### Judge sheets

The averaged ranking takes exactly three sheets, one per judge, in the same
format as the spreadsheet import. Each score is averaged over the judges who
scored that image. If a judge lists an image twice, the last row counts.

The name shown for each entry is the contestant: the folder right below
`CONCURSANTES` in the identity key, in upper case. For keys outside that
folder, the first name given by a judge is used instead, also in upper case.

## Ranking

Highest total first. Equal totals are ordered by identity key.

## Outputs

* `ranking.pages.json`: the report pages, as positioned drawing instructions
* `ranking.csv`: the table, with the same columns as the import. Scores and
  totals are rounded to the nearest integer (halves away from zero). The
  total column is the sum of the three rounded scores, so every row adds
  up. The printed report shows the rounded exact total instead.

*/
