use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "quill";
const DB_FILENAME: &str = "quill.sqlite3";

/// `$XDG_DATA_HOME/quill`, falling back to `~/.local/share/quill`.
pub fn data_dir() -> Result<PathBuf> {
    match env::var_os("XDG_DATA_HOME") {
        Some(dir) if dir.is_empty() => Err(StoreError::InvalidDataPath(PathBuf::from(dir))),
        Some(dir) => Ok(PathBuf::from(dir).join(APP_DIR)),
        None => {
            let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
            Ok(home.join(".local").join("share").join(APP_DIR))
        }
    }
}

/// Database location: `explicit` when given, else the default data dir.
/// The parent directory is created when missing.
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => data_dir()?.join(DB_FILENAME),
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(path),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
        if explicit.is_none() {
            restrict_dir_permissions(parent)?;
        }
    }
    Ok(path)
}

pub fn db_path_in(dir: &Path) -> PathBuf {
    dir.join(DB_FILENAME)
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{db_path_in, resolve_db_path};

    #[test]
    fn explicit_path_creates_parent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let wanted = temp.path().join("nested").join("deeper").join("x.sqlite3");
        let resolved = resolve_db_path(Some(&wanted)).expect("resolve");
        assert_eq!(resolved, wanted);
        assert!(wanted.parent().expect("parent").is_dir());
    }

    #[test]
    fn bare_filename_is_left_alone() {
        let resolved = resolve_db_path(Some("plain.sqlite3".as_ref())).expect("resolve");
        assert_eq!(resolved.to_str(), Some("plain.sqlite3"));
    }

    #[test]
    fn file_name_in_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(db_path_in(temp.path()).ends_with("quill.sqlite3"));
    }
}
