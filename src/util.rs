//! Vault path helpers
//!
//! Mapping between filesystem paths and vault [`Location`]s, with the
//! same traversal checks for both directions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::MARKDOWN_EXTENSION;
use crate::location::Location;

/// Filesystem path of a location, refusing anything that escapes the vault
pub fn secure_path(vault: &Path, location: &Location) -> io::Result<PathBuf> {
    let mut result = vault.to_path_buf();

    for component in location.as_str().split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Path traversal detected: cannot escape the vault",
                ));
            }
            _ => {
                // Drive prefixes such as `C:`
                if component.len() >= 2 && component.as_bytes()[1] == b':' {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Absolute paths are not allowed",
                    ));
                }
                result.push(component);
            }
        }
    }

    Ok(result)
}

/// Location of a filesystem path inside the vault.
///
/// Relative paths are taken relative to the current directory. Paths are
/// canonicalized with `dunce` so Windows paths carry no UNC prefix.
pub fn location_for(vault: &Path, path: &Path) -> io::Result<Location> {
    let vault = dunce::canonicalize(vault)?;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let canonical = dunce::canonicalize(&absolute).unwrap_or(absolute);

    let relative = canonical.strip_prefix(&vault).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is outside the vault {}", display_path(&canonical), display_path(&vault)),
        )
    })?;
    Ok(Location::new(&display_path(relative)))
}

/// Resolve a user-supplied document argument: an existing file path, or
/// a vault-relative location.
pub fn resolve_document(vault: &Path, arg: &str) -> io::Result<(Location, PathBuf)> {
    let as_path = Path::new(arg);
    if as_path.is_file() {
        let location = location_for(vault, as_path)?;
        return Ok((location, as_path.to_path_buf()));
    }
    let location = Location::new(arg);
    let path = secure_path(vault, &location)?;
    if !path.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Document not found: {}", arg),
        ));
    }
    Ok((location, path))
}

/// Every markdown document in the vault, as sorted locations.
/// Hidden files and directories are skipped.
pub fn markdown_files(vault: &Path) -> io::Result<Vec<Location>> {
    let mut found = Vec::new();
    collect_markdown(vault, vault, &mut found)?;
    found.sort();
    Ok(found.into_iter().map(|p| Location::new(&p)).collect())
}

fn collect_markdown(vault: &Path, dir: &Path, found: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_markdown(vault, &path, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(MARKDOWN_EXTENSION) {
            if let Ok(relative) = path.strip_prefix(vault) {
                found.push(display_path(relative));
            }
        }
    }
    Ok(())
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
