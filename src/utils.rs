use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolve the working directory: the given path or the current directory
pub fn resolve_base_dir(path: Option<&Path>) -> Result<PathBuf> {
    let base_dir = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !base_dir.is_dir() {
        return Err(Error::custom(format!(
            "working directory not found: {}",
            base_dir.display()
        )));
    }

    Ok(base_dir)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Turn a relative path into a `/`-separated archive path
///
/// `.` segments are dropped. Absolute paths and `..` segments are rejected
/// since they would escape the archive root.
pub fn to_archive_path(path: &Path) -> Result<String> {
    let mut segments = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidConfig(format!(
                    "path must stay inside the working directory: {}",
                    path.display()
                )));
            }
        }
    }

    if segments.is_empty() {
        return Err(Error::InvalidConfig(format!("empty path: {:?}", path)));
    }

    Ok(segments.join("/"))
}
