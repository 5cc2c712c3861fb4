use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quill_core::filter::TagCombine;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "quill";
const CONFIG_FILENAME: &str = "config.toml";

/// Largest accepted `|word_count|` threshold.
pub const MAX_WORD_COUNT: i64 = 1_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub filters: FiltersConfig,
}

/// Initial state for freshly built filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersConfig {
    pub tag_combine: TagCombine,
    /// Publisher listings start with the goner criterion off.
    pub hide_goners: bool,
    pub word_count: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid word_count value: {0} (magnitude must not exceed 1000000)")]
    InvalidWordCount(i64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    filters: Option<FiltersFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FiltersFile {
    tag_combine: Option<TagCombine>,
    hide_goners: Option<bool>,
    word_count: Option<i64>,
}

/// Loads the config file. An explicit `config_path` must exist; the default
/// location is optional and yields defaults when absent.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir | ConfigError::InvalidConfigPath(_)) if !required => {
            return Ok(AppConfig::default())
        }
        Err(err) => return Err(err),
    };
    Ok(load_at_path(&path, required)?.unwrap_or_default())
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfigPath(path));
        }
        return Ok(path);
    }

    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if dir.is_empty() => {
            return Err(ConfigError::InvalidConfigPath(PathBuf::from(dir)))
        }
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or(ConfigError::MissingHomeDir)?
            .join(".config"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();
    let Some(filters) = parsed.filters else {
        return Ok(config);
    };

    if let Some(combine) = filters.tag_combine {
        config.filters.tag_combine = combine;
    }
    if let Some(hide) = filters.hide_goners {
        config.filters.hide_goners = hide;
    }
    if let Some(threshold) = filters.word_count {
        if threshold.checked_abs().map_or(true, |abs| abs > MAX_WORD_COUNT) {
            return Err(ConfigError::InvalidWordCount(threshold));
        }
        config.filters.word_count = threshold;
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.permissions().mode() & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load, load_at_path, merge_config, ConfigError, ConfigFile, FiltersFile};
    use quill_core::filter::TagCombine;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_private(path: &Path, contents: &str) {
        fs::write(path, contents).expect("write config");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            filters: Some(FiltersFile {
                tag_combine: Some(TagCombine::All),
                hide_goners: Some(true),
                word_count: Some(-2000),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.filters.tag_combine, TagCombine::All);
        assert!(merged.filters.hide_goners);
        assert_eq!(merged.filters.word_count, -2000);
    }

    #[test]
    fn merge_config_rejects_huge_threshold() {
        for threshold in [1_000_001, -1_000_001, i64::MIN] {
            let parsed = ConfigFile {
                filters: Some(FiltersFile {
                    word_count: Some(threshold),
                    ..Default::default()
                }),
            };
            let err = merge_config(parsed).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidWordCount(value) if value == threshold));
        }
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        write_private(
            &path,
            "[filters]\ntag_combine = \"all\"\nhide_goners = true\nword_count = 5000\n",
        );

        let config = load(Some(path)).expect("load");
        assert_eq!(config.filters.tag_combine, TagCombine::All);
        assert!(config.filters.hide_goners);
        assert_eq!(config.filters.word_count, 5000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        write_private(&path, "[filters]\ncolour = \"blue\"\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn world_readable_config_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
