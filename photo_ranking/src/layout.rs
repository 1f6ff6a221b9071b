//! The printable ranking report.
//!
//! The report is produced as a list of pages of positioned drawing
//! instructions. Coordinates are in points, measured from the top left
//! corner of the page; the y of a text is its baseline.

use chrono::Datelike;
use log::{debug, info};
use serde::Serialize;
use snafu::ResultExt;

use crate::config::ReportOptions;
use crate::error::{HeaderLayoutSnafu, JudgeResult, LayoutFailureSnafu};
use crate::metrics::{FontMetrics, GlyphError};
use crate::{whole, RankedEntry};

/// Size of the page and of its reserved bands.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Below the top margin: title and column labels.
    pub header_height: f64,
    /// Above the bottom margin: logo, copyright line and page number.
    pub footer_height: f64,
    pub line_height: f64,
    pub font_size: f64,
    pub title_font_size: f64,
    pub footer_font_size: f64,
}

impl Default for PageGeometry {
    /// A4, landscape.
    fn default() -> Self {
        PageGeometry {
            width: 841.89,
            height: 595.28,
            margin: 30.0,
            header_height: 50.0,
            footer_height: 50.0,
            line_height: 12.0,
            font_size: 8.0,
            title_font_size: 14.0,
            footer_font_size: 7.0,
        }
    }
}

impl PageGeometry {
    /// Baseline of the first row of a page.
    pub fn content_top(&self) -> f64 {
        self.margin + self.header_height
    }

    fn is_full(&self, cursor: f64) -> bool {
        self.height - cursor < self.line_height + self.margin + self.footer_height
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Rank,
    MainName,
    ItemName,
    ArtisticQuality,
    Contextualization,
    Originality,
    Total,
    Observations,
}

/// Why a text was drawn. Lets consumers (and tests) find things on a page.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    Title,
    ColumnLabel(Column),
    Cell(Column),
    Footer,
    PageNumber,
}

/// RGB, components in `0.0..=1.0`.
#[derive(PartialEq, Debug, Clone, Copy, Serialize)]
pub struct Rgb(pub f64, pub f64, pub f64);

const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
const TITLE_COLOR: Rgb = Rgb(0.0, 0.2, 0.4);
const FOOTER_COLOR: Rgb = Rgb(0.3, 0.3, 0.3);

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOp {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font: FontStyle,
    pub size: f64,
    pub color: Rgb,
    pub role: TextRole,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Text(TextOp),
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        thickness: f64,
    },
    /// `y` is the top edge of the image.
    Image {
        asset: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// The texts drawn with the given role, in drawing order.
    pub fn texts_with_role(&self, role: TextRole) -> Vec<&TextOp> {
        self.texts().filter(|t| t.role == role).collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum LogoSlot {
    Header,
    Footer,
}

/// An image the page consumer knows how to resolve, already scaled.
#[derive(PartialEq, Debug, Clone)]
pub struct LogoAsset {
    pub handle: String,
    pub width: f64,
    pub height: f64,
}

/// Supplies the logos of the report. A missing logo is simply not drawn.
pub trait AssetProvider {
    fn logo(&self, slot: LogoSlot) -> Option<LogoAsset>;
}

/// No logos at all.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn logo(&self, _slot: LogoSlot) -> Option<LogoAsset> {
        None
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
struct Slot {
    x: f64,
    width: f64,
}

/// Column positions. Computed once, they do not depend on the content.
#[derive(PartialEq, Debug, Clone)]
struct ColumnGrid {
    rank: Slot,
    main: Slot,
    item: Option<Slot>,
    scores: [Slot; 3],
    total: Slot,
    observations: Option<Slot>,
}

const RANK_WIDTH: f64 = 30.0;
const NAME_WIDTH: f64 = 150.0;
const NAME_WIDTH_WITH_ITEM: f64 = 120.0;
const ITEM_WIDTH: f64 = 120.0;
const SCORE_WIDTH: f64 = 70.0;
const GAP: f64 = 10.0;
const ELLIPSIS: &str = "...";

impl ColumnGrid {
    fn new(geometry: &PageGeometry, options: &ReportOptions) -> ColumnGrid {
        let rank = Slot {
            x: geometry.margin,
            width: RANK_WIDTH,
        };
        let has_item = options.item_name_label.is_some();
        let main = Slot {
            x: rank.x + RANK_WIDTH + 5.0,
            width: if has_item {
                NAME_WIDTH_WITH_ITEM
            } else {
                NAME_WIDTH
            },
        };
        let item = if has_item {
            Some(Slot {
                x: main.x + main.width + GAP,
                width: ITEM_WIDTH,
            })
        } else {
            None
        };
        let last = item.unwrap_or(main);
        let first_score = last.x + last.width + GAP;
        let scores = [0.0, 1.0, 2.0].map(|i| Slot {
            x: first_score + i * (SCORE_WIDTH + GAP),
            width: SCORE_WIDTH,
        });
        let total = Slot {
            x: scores[2].x + SCORE_WIDTH + GAP,
            width: SCORE_WIDTH,
        };
        let observations = if options.hide_observations {
            None
        } else {
            let x = total.x + total.width + GAP;
            Some(Slot {
                x,
                width: geometry.width - x - geometry.margin,
            })
        };
        ColumnGrid {
            rank,
            main,
            item,
            scores,
            total,
            observations,
        }
    }

    fn labels<'a>(&self, options: &'a ReportOptions) -> Vec<(Column, f64, &'a str)> {
        let mut res = vec![
            (Column::Rank, self.rank.x, "Rank"),
            (Column::MainName, self.main.x, options.main_name_label.as_str()),
        ];
        if let (Some(slot), Some(label)) = (self.item, options.item_name_label.as_deref()) {
            res.push((Column::ItemName, slot.x, label));
        }
        res.push((Column::ArtisticQuality, self.scores[0].x, "Cal. Artística"));
        res.push((Column::Contextualization, self.scores[1].x, "Context."));
        res.push((Column::Originality, self.scores[2].x, "Originalidad"));
        res.push((Column::Total, self.total.x, "Total"));
        if let Some(slot) = self.observations {
            res.push((Column::Observations, slot.x, "Observaciones"));
        }
        res
    }
}

/// The fixed cells of one row, drawn again on continuation rows.
struct RowCells {
    cells: Vec<(Column, f64, String)>,
}

/// Lays out the ranked records as pages.
///
/// Records are drawn in the order given; their position is their rank.
/// Any text that cannot be drawn aborts the whole report.
pub fn render<T: RankedEntry>(
    records: &[T],
    options: &ReportOptions,
    geometry: &PageGeometry,
    metrics: &dyn FontMetrics,
    assets: &dyn AssetProvider,
) -> JudgeResult<Vec<Page>> {
    let copyright = match options.copyright.as_deref() {
        Some(c) => c.to_string(),
        None => {
            let year = options
                .year
                .unwrap_or_else(|| chrono::Local::now().year());
            format!("© {} PhotoJudge. Unidad de Fotografía Científica.", year)
        }
    };
    let mut r = Renderer {
        geometry,
        options,
        metrics,
        assets,
        grid: ColumnGrid::new(geometry, options),
        copyright,
        done: Vec::new(),
        current: Page::blank(1, geometry),
        cursor: geometry.content_top(),
    };
    r.draw_header()?;
    for (idx, rec) in records.iter().enumerate() {
        r.draw_record(idx + 1, rec)?;
    }
    r.draw_footer()?;
    let mut pages = r.done;
    pages.push(r.current);
    info!("render: {} records on {} pages", records.len(), pages.len());
    Ok(pages)
}

impl Page {
    fn blank(number: usize, geometry: &PageGeometry) -> Page {
        Page {
            number,
            width: geometry.width,
            height: geometry.height,
            ops: Vec::new(),
        }
    }
}

struct Renderer<'a> {
    geometry: &'a PageGeometry,
    options: &'a ReportOptions,
    metrics: &'a dyn FontMetrics,
    assets: &'a dyn AssetProvider,
    grid: ColumnGrid,
    copyright: String,
    done: Vec<Page>,
    current: Page,
    /// Baseline of the next line.
    cursor: f64,
}

impl<'a> Renderer<'a> {
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: FontStyle,
        size: f64,
        color: Rgb,
        role: TextRole,
    ) -> Result<(), GlyphError> {
        // Measuring is the encodability check.
        self.metrics.text_width(text, size)?;
        self.current.ops.push(DrawOp::Text(TextOp {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            color,
            role,
        }));
        Ok(())
    }

    fn draw_header(&mut self) -> JudgeResult<()> {
        let g = *self.geometry;
        let mut title_x = g.margin;
        if let Some(logo) = self.assets.logo(LogoSlot::Header) {
            title_x += logo.width + GAP;
            self.current.ops.push(DrawOp::Image {
                asset: logo.handle,
                x: g.margin,
                y: g.margin,
                width: logo.width,
                height: logo.height,
            });
        }
        let options = self.options;
        let title = options.title();
        self.text(
            title_x,
            g.margin + g.title_font_size * 0.8,
            title,
            FontStyle::Bold,
            g.title_font_size,
            TITLE_COLOR,
            TextRole::Title,
        )
        .context(HeaderLayoutSnafu { label: title })?;

        let labels_y = g.content_top() - 1.2 * g.line_height;
        for (col, x, label) in self.grid.labels(options) {
            self.text(
                x,
                labels_y,
                label,
                FontStyle::Bold,
                g.font_size,
                BLACK,
                TextRole::ColumnLabel(col),
            )
            .context(HeaderLayoutSnafu { label })?;
        }
        let rule_y = g.content_top() - 0.75 * g.line_height;
        self.current.ops.push(DrawOp::Line {
            x1: g.margin,
            y1: rule_y,
            x2: g.width - g.margin,
            y2: rule_y,
            thickness: 0.5,
        });
        self.cursor = g.content_top();
        Ok(())
    }

    fn draw_footer(&mut self) -> JudgeResult<()> {
        let g = *self.geometry;
        let footer_y = g.height - g.margin - 15.0;
        let mut x = g.margin;
        if let Some(logo) = self.assets.logo(LogoSlot::Footer) {
            self.current.ops.push(DrawOp::Image {
                asset: logo.handle,
                x,
                y: footer_y - logo.height / 2.0,
                width: logo.width,
                height: logo.height,
            });
            x += logo.width + 5.0;
        }
        let copyright = self.copyright.clone();
        self.text(
            x,
            footer_y,
            &copyright,
            FontStyle::Regular,
            g.footer_font_size,
            FOOTER_COLOR,
            TextRole::Footer,
        )
        .context(HeaderLayoutSnafu { label: &copyright })?;

        // Right aligned.
        let number = self.current.number.to_string();
        let width = self
            .metrics
            .text_width(&number, g.footer_font_size)
            .context(HeaderLayoutSnafu { label: &number })?;
        self.text(
            g.width - g.margin - width,
            footer_y,
            &number,
            FontStyle::Regular,
            g.footer_font_size,
            FOOTER_COLOR,
            TextRole::PageNumber,
        )
        .context(HeaderLayoutSnafu { label: &number })?;
        Ok(())
    }

    /// Starts a new page when the current one has no room for another line.
    fn break_if_full(&mut self) -> JudgeResult<bool> {
        if !self.geometry.is_full(self.cursor) {
            return Ok(false);
        }
        self.draw_footer()?;
        let next = Page::blank(self.current.number + 1, self.geometry);
        debug!("render: page {}", next.number);
        self.done.push(std::mem::replace(&mut self.current, next));
        self.draw_header()?;
        Ok(true)
    }

    fn draw_record<T: RankedEntry>(&mut self, rank: usize, rec: &T) -> JudgeResult<()> {
        let failed = |_: &mut GlyphError| LayoutFailureSnafu {
            id: rec.id().to_string(),
            name: rec.display_name().to_string(),
        };
        self.break_if_full()?;
        let row = self.row_cells(rank, rec).with_context(failed)?;
        self.draw_cells(&row).with_context(failed)?;

        if let Some(slot) = self.grid.observations {
            let fragments = self
                .wrap(rec.observations(), slot.width)
                .with_context(failed)?;
            for (idx, fragment) in fragments.iter().enumerate() {
                if idx > 0 {
                    self.cursor += self.geometry.line_height;
                    if self.break_if_full()? {
                        self.draw_cells(&row).with_context(failed)?;
                    }
                }
                self.text(
                    slot.x,
                    self.cursor,
                    fragment,
                    FontStyle::Regular,
                    self.geometry.font_size,
                    BLACK,
                    TextRole::Cell(Column::Observations),
                )
                .with_context(failed)?;
            }
        }
        self.cursor += self.geometry.line_height;
        Ok(())
    }

    fn row_cells<T: RankedEntry>(&self, rank: usize, rec: &T) -> Result<RowCells, GlyphError> {
        let size = self.geometry.font_size;
        let grid = &self.grid;
        let main_name = if grid.item.is_some() {
            rec.display_name().to_uppercase()
        } else {
            rec.display_name().to_string()
        };
        let mut cells = vec![
            (Column::Rank, grid.rank.x, rank.to_string()),
            (
                Column::MainName,
                grid.main.x,
                truncate(self.metrics, &main_name, grid.main.width, size)?,
            ),
        ];
        if let Some(slot) = grid.item {
            cells.push((
                Column::ItemName,
                slot.x,
                truncate(self.metrics, rec.id().file_name(), slot.width, size)?,
            ));
        }
        let axes = [
            Column::ArtisticQuality,
            Column::Contextualization,
            Column::Originality,
        ];
        for ((col, slot), x) in axes.into_iter().zip(grid.scores).zip(rec.scores().axes()) {
            cells.push((col, slot.x, whole(x).to_string()));
        }
        cells.push((Column::Total, grid.total.x, whole(rec.total()).to_string()));
        Ok(RowCells { cells })
    }

    fn draw_cells(&mut self, row: &RowCells) -> Result<(), GlyphError> {
        let y = self.cursor;
        let size = self.geometry.font_size;
        for (col, x, text) in row.cells.iter() {
            self.text(
                *x,
                y,
                text,
                FontStyle::Regular,
                size,
                BLACK,
                TextRole::Cell(*col),
            )?;
        }
        Ok(())
    }

    /// Splits the text on newlines, then fills each line greedily, word by
    /// word. A single word wider than the column is kept whole.
    fn wrap(&self, text: &str, width: f64) -> Result<Vec<String>, GlyphError> {
        let size = self.geometry.font_size;
        let mut res: Vec<String> = Vec::new();
        for line in text.split('\n') {
            let mut fragment = String::new();
            for word in line.split_whitespace() {
                if fragment.is_empty() {
                    fragment.push_str(word);
                    continue;
                }
                let candidate = format!("{} {}", fragment, word);
                if self.metrics.text_width(&candidate, size)? > width {
                    res.push(std::mem::replace(&mut fragment, word.to_string()));
                } else {
                    fragment = candidate;
                }
            }
            if !fragment.is_empty() {
                res.push(fragment);
            }
        }
        Ok(res)
    }
}

/// Shortens the text, one character at a time, until it fits the width
/// with an ellipsis appended.
fn truncate(
    metrics: &dyn FontMetrics,
    text: &str,
    width: f64,
    size: f64,
) -> Result<String, GlyphError> {
    if metrics.text_width(text, size)? <= width {
        return Ok(text.to_string());
    }
    let mut chars: Vec<char> = text.chars().collect();
    while chars.pop().is_some() {
        let candidate = format!("{}{}", chars.iter().collect::<String>(), ELLIPSIS);
        if metrics.text_width(&candidate, size)? <= width {
            return Ok(candidate);
        }
    }
    Ok(ELLIPSIS.to_string())
}
