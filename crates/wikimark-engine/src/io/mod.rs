use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of page sources.
pub const PAGE_EXTENSION: &str = "txt";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Page not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid pages directory: {0}")]
    InvalidPagesDir(String),
}

/// Resolves a page name such as `Projects/Wiki` to `<root>/Projects/Wiki.txt`.
pub fn page_path(name: &str, pages_root: &Path) -> PathBuf {
    RelativePath::new(name)
        .normalize()
        .with_extension(PAGE_EXTENSION)
        .to_path(pages_root)
}

/// Read a page source file and return its content
pub fn read_page(relative_path: &RelativePath, pages_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(pages_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    Ok(fs::read_to_string(&absolute_path)?)
}

/// Write a page source file, creating parent directories as needed
pub fn write_page(
    relative_path: &RelativePath,
    pages_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(pages_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::write(&absolute_path, content)?)
}

/// Lists page names (paths relative to the root, without extension),
/// sorted.
pub fn list_pages(pages_root: &Path) -> Result<Vec<String>, IoError> {
    validate_pages_dir(pages_root)?;
    let mut files = Vec::new();
    scan_directory_recursive(pages_root, &mut files)?;

    let mut names: Vec<String> = files
        .iter()
        .filter_map(|path| path.strip_prefix(pages_root).ok())
        .filter_map(|rel| relative_path::RelativePathBuf::from_path(rel).ok())
        .map(|rel| rel.with_extension("").into_string())
        .collect();
    names.sort();
    Ok(names)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == PAGE_EXTENSION
        {
            files.push(path);
        }
    }
    Ok(())
}

pub fn validate_pages_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidPagesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn pages_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn write_then_read_page() {
        let dir = pages_dir();
        let path = RelativePath::new("Nested/Home.txt");
        write_page(path, dir.path(), "= Home =").unwrap();
        assert_eq!(read_page(path, dir.path()).unwrap(), "= Home =");
    }

    #[test]
    fn missing_page_is_not_found() {
        let dir = pages_dir();
        let err = read_page(RelativePath::new("Nope.txt"), dir.path()).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn pages_are_listed_by_name() {
        let dir = pages_dir();
        for name in ["Zeta.txt", "Alpha.txt", "sub/Beta.txt", "notes.md"] {
            write_page(RelativePath::new(name), dir.path(), "x").unwrap();
        }
        assert_eq!(
            list_pages(dir.path()).unwrap(),
            vec!["Alpha", "Zeta", "sub/Beta"]
        );
    }

    #[test]
    fn page_names_resolve_under_root() {
        let root = Path::new("/wiki");
        assert_eq!(page_path("Home", root), PathBuf::from("/wiki/Home.txt"));
        assert_eq!(
            page_path("a/../Projects/Wiki", root),
            PathBuf::from("/wiki/Projects/Wiki.txt")
        );
    }

    #[test]
    fn invalid_pages_dir_is_reported() {
        let err = list_pages(Path::new("/this/path/does/not/exist")).unwrap_err();
        assert!(err.to_string().contains("Invalid pages directory"));
    }
}
