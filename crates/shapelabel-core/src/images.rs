//! Image directory scanning and label file naming.

use crate::storage::{StorageError, StorageResult};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of label files.
pub const LABEL_EXTENSION: &str = "txt";

/// List the images in `dir` whose extension is one of `extensions`, in natural order.
pub fn scan(dir: &Path, extensions: &[String]) -> StorageResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut images: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    images.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(images)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Name of the label file for `image`: its file stem with a `.txt` extension.
pub fn label_file_name(image: &Path) -> String {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.{}", stem, LABEL_EXTENSION)
}

/// Compare strings treating runs of ASCII digits as numbers.
///
/// `img2.png` sorts before `img10.png`. Equal numbers with different
/// zero-padding fall back to the shorter run first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let la = a.iter().take_while(|c| c.is_ascii_digit()).count();
                let lb = b.iter().take_while(|c| c.is_ascii_digit()).count();
                let ord = cmp_digits(&a[..la], &b[..lb]);
                if ord != Ordering::Equal {
                    return ord;
                }
                a = &a[la..];
                b = &b[lb..];
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(cb);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn cmp_digits(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().take_while(|c| **c == b'0').count() };
    let (na, nb) = (&a[trim(a)..], &b[trim(b)..]);
    na.len()
        .cmp(&nb.len())
        .then_with(|| na.cmp(nb))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("img2.png", "img10.png"), Ordering::Less);
        assert_eq!(natural_cmp("img10.png", "img9.png"), Ordering::Greater);
        assert_eq!(natural_cmp("a.png", "b.png"), Ordering::Less);
        assert_eq!(natural_cmp("img02.png", "img2.png"), Ordering::Greater);
        assert_eq!(natural_cmp("img2.png", "img2.png"), Ordering::Equal);
        assert_eq!(natural_cmp("img", "img1"), Ordering::Less);
    }

    #[test]
    fn test_label_file_name() {
        assert_eq!(label_file_name(Path::new("/data/imgs/cat_01.png")), "cat_01.txt");
        assert_eq!(label_file_name(Path::new("scan.v2.jpg")), "scan.v2.txt");
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["img10.png", "img2.PNG", "img1.jpg", "notes.txt", "img3.gif"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let exts = vec!["png".to_string(), "jpg".to_string()];
        let names: Vec<String> = scan(dir.path(), &exts)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["img1.jpg", "img2.PNG", "img10.png"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            scan(&dir.path().join("absent"), &["png".to_string()]),
            Err(StorageError::Io(_))
        ));
    }
}
