//! Packaging the working directory into the final archive.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::hooks::Archiver;
use crate::sanitize::{force_ascii, sanitize_file_name};

const MAX_STEM_CHARS: usize = 150;

/// Every regular file under `root`, in a stable order.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// `<title>-<timestamp>.<extension>`, with the title reduced to a safe ASCII
/// stem.
///
/// ```
/// use bindery::package::archive_name;
///
/// assert_eq!(archive_name("Moby Dick!", "hpub", 1700000000), "Moby-Dick-1700000000.hpub");
/// assert_eq!(archive_name("", "hpub", 1), "book-1.hpub");
/// ```
pub fn archive_name(title: &str, extension: &str, timestamp: i64) -> String {
    let stem = force_ascii(&sanitize_file_name(&title.replace('@', "")));
    let mut stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    if stem.is_empty() {
        stem.push_str("book");
    }
    format!("{stem}-{timestamp}.{extension}")
}

/// Archive everything under `root` into `output_dir`.
///
/// The archive is written under a temporary name and only moved to its final
/// name once complete. Returns the final path.
pub fn package(
    archiver: &dyn Archiver,
    root: &Path,
    output_dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let files = collect_files(root)?;
    let dest = output_dir.join(file_name);

    std::fs::create_dir_all(output_dir)?;
    let partial = tempfile::Builder::new()
        .prefix(".bindery-")
        .suffix(".part")
        .tempfile_in(output_dir)?;

    let added = archiver.write(&files, root, partial.path())?;
    if added == 0 {
        // Dropping `partial` removes it.
        return Err(Error::EmptyArchive(dest));
    }
    partial.persist(&dest).map_err(|e| Error::Io(e.error))?;

    tracing::info!(archive = %dest.display(), files = added, "archive written");
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::ZipArchiver;

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("Café @ Night", "hpub", 42), "Caf-Night-42.hpub");
        assert_eq!(archive_name("???", "hpub", 42), "book-42.hpub");
        let long = "a".repeat(400);
        assert_eq!(archive_name(&long, "hpub", 1).len(), 150 + "-1.hpub".len());
    }

    #[test]
    fn test_collect_files_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("images")).unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("images/b.png"), b"b").unwrap();
        std::fs::write(dir.path().join("book.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("a.html"), b"a").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["a.html", "book.json", "images/b.png"]);
    }

    #[test]
    fn test_package_writes_zip() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("css")).unwrap();
        std::fs::write(root.path().join("css/style.css"), b"body{}").unwrap();
        std::fs::write(root.path().join("book.json"), b"{}").unwrap();

        let path = package(&ZipArchiver::default(), root.path(), out.path(), "b-1.hpub").unwrap();
        assert_eq!(path, out.path().join("b-1.hpub"));

        let mut zip = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        assert!(zip.by_name("css/style.css").is_ok());
        assert!(zip.by_name("book.json").is_ok());
    }

    #[test]
    fn test_empty_directory_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("gfx")).unwrap();

        let err = package(&ZipArchiver::default(), root.path(), out.path(), "b-1.hpub").unwrap_err();
        assert!(matches!(err, Error::EmptyArchive(_)));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
