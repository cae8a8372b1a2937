//! Source file discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CslintError;
use crate::result::Result;

/// Collect analyzable C# files from a set of paths.
///
/// Files are taken as-is (regardless of extension, since the user named
/// them explicitly); directories are walked recursively for `.cs` files.
/// Hidden directories and common build output directories are skipped.
pub fn discover_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_dir(path, &mut files);
        } else {
            return Err(CslintError::io_error(
                path.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            !(name.starts_with('.') || name == "bin" || name == "obj")
        } else {
            true
        }
    });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                if entry.path().extension().and_then(|e| e.to_str()) == Some("cs") {
                    files.push(entry.path().to_path_buf());
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {e}", dir.display());
            }
        }
    }
}
