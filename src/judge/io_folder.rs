// Walks the contest folder.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use log::{debug, info, warn};
use photo_ranking::*;
use rayon::prelude::*;
use snafu::prelude::*;
use walkdir::WalkDir;

use crate::judge::*;

/// Lists the files under `root`, in path order. Hidden files are skipped.
///
/// The path of every file starts with the name of `root` itself.
pub fn list_files(root: &Path) -> BAppResult<Vec<FileDescriptor>> {
    let root_s = root.display().to_string();
    let root_name = fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_default();

    let mut res: Vec<FileDescriptor> = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.context(ScanningFolderSnafu {
            path: root_s.clone(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            debug!("list_files: skipping hidden file {}", entry.path().display());
            continue;
        }
        let relative: Vec<String> = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let path = if root_name.is_empty() {
            relative.join("/")
        } else {
            format!("{}/{}", root_name, relative.join("/"))
        };
        let meta = entry.metadata().context(ScanningFolderSnafu {
            path: root_s.clone(),
        })?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);
        res.push(FileDescriptor {
            name,
            path,
            size: meta.len(),
            modified,
            content: FileContent::DataRef(entry.path().display().to_string()),
        });
    }
    Ok(res)
}

/// Scans the images of the contest folder. The conversions run in parallel.
pub fn scan_images(
    root: &Path,
    converter: &dyn FormatConverter,
) -> BAppResult<Vec<ScannedImage>> {
    let files = list_files(root)?;
    info!("scan_images: {} files under {}", files.len(), root.display());

    let companions: HashMap<String, Attachment> = associate_companions(&files);
    let (kept, discarded) = dedupe_variants(files);
    for d in discarded.iter() {
        debug!("scan_images: {} is a variant of {}, ignored", d.path, d.kept);
    }

    let results: Vec<JudgeResult<ScannedImage>> = kept
        .par_iter()
        .map(|f| scan_image(f, converter, &companions))
        .collect();
    let mut images: Vec<ScannedImage> = Vec::with_capacity(results.len());
    for r in results {
        match r {
            Ok(img) => images.push(img),
            Err(e) => warn!("scan_images: {}", e),
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, b"x").unwrap();
    }

    #[test]
    fn scan_contest_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("CONCURSANTES");
        touch(&root, "Ana/amanecer.jpg");
        touch(&root, "Ana/amanecer.TIFF");
        touch(&root, "Ana/bases.pdf");
        touch(&root, "Luis/noche.tif");
        touch(&root, "Luis/.DS_Store");
        touch(&root, "Luis/notas.txt");

        let files = list_files(&root).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "CONCURSANTES/Ana/amanecer.TIFF",
                "CONCURSANTES/Ana/amanecer.jpg",
                "CONCURSANTES/Ana/bases.pdf",
                "CONCURSANTES/Luis/noche.tif",
                "CONCURSANTES/Luis/notas.txt",
            ]
        );
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        for f in files.iter() {
            let m = f.modified.unwrap();
            assert!((now - m).abs() < 3600, "{} is not in seconds", m);
        }

        let images = scan_images(&root, &PassthroughConverter).unwrap();
        assert_eq!(images.len(), 2);
        let ana = images
            .iter()
            .find(|i| i.id.as_str() == "CONCURSANTES/Ana/amanecer.jpg")
            .unwrap();
        assert!(ana.preview.is_some());
        assert_eq!(ana.auxiliary.as_ref().unwrap().name, "bases.pdf");
        let luis = images
            .iter()
            .find(|i| i.id.as_str() == "CONCURSANTES/Luis/noche.tif")
            .unwrap();
        assert!(luis.preview.is_none());
        assert!(luis.status_error.is_some());
        assert!(luis.auxiliary.is_none());
    }

    #[test]
    fn missing_folder() {
        let err = list_files(Path::new("/nonexistent/CONCURSANTES")).unwrap_err();
        assert!(matches!(*err, AppError::ScanningFolder { .. }));
    }
}
