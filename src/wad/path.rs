//! Turning archive entry names into output paths.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// Decode raw name bytes into a platform path.
#[cfg(unix)]
fn decode(name: &[u8]) -> Result<&Path, PathError> {
    use std::os::unix::ffi::OsStrExt;

    if name.contains(&0) {
        return Err(PathError::InvalidEncoding {
            name: String::from_utf8_lossy(name).into_owned(),
        });
    }
    Ok(Path::new(OsStr::from_bytes(name)))
}

#[cfg(not(unix))]
fn decode(name: &[u8]) -> Result<&Path, PathError> {
    let name = std::str::from_utf8(name).map_err(|_| PathError::InvalidEncoding {
        name: String::from_utf8_lossy(name).into_owned(),
    })?;
    if name.contains('\0') {
        return Err(PathError::InvalidEncoding {
            name: name.to_string(),
        });
    }
    Ok(Path::new(OsStr::new(name)))
}

/// Resolve an entry name to a normalized path relative to the output root.
///
/// `.` components are dropped. Absolute names and names containing `..`
/// anywhere are rejected, even where `..` would stay inside the root.
pub fn relative_path(name: &[u8]) -> Result<PathBuf, PathError> {
    if name.is_empty() {
        return Err(PathError::Empty);
    }

    let path = decode(name)?;
    let escapes = || PathError::Escapes {
        name: path.to_string_lossy().into_owned(),
    };

    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(escapes());
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    Ok(relative)
}

/// Join an entry name onto `root`.
pub fn resolve(root: &Path, name: &[u8]) -> Result<PathBuf, PathError> {
    Ok(root.join(relative_path(name)?))
}
