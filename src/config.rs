// ── Configuration ─────────────────────────────────────────────────────────────
//
// Reads `winshim.json`.  Lookup order: the `WINSHIM_CONFIG` path, then
// `./winshim.json`, then `%APPDATA%\winshim\config.json`.
// No `unsafe`; pure safe Rust over serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Format version ────────────────────────────────────────────────────────────

const CONFIG_VERSION: u32 = 1;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "WINSHIM_CONFIG";

const LOCAL_FILE: &str = "winshim.json";

// ── On-disk type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    /// Filter for the `winshim` log target.
    pub log_level: LevelFilter,
    /// Load system modules from this directory by full path.
    pub system_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LevelFilter::Warn,
            system_directory: None,
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

/// `%APPDATA%\winshim\config.json`, or `None` if `APPDATA` is not set.
pub fn user_config_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("winshim");
    p.push("config.json");
    Some(p)
}

/// The first configuration file that exists, in lookup order.
pub fn discover() -> Option<PathBuf> {
    discover_from(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        [Some(PathBuf::from(LOCAL_FILE)), user_config_path()],
    )
}

/// `explicit` wins even when it does not exist, so a mistyped
/// `WINSHIM_CONFIG` is reported rather than silently skipped.
fn discover_from(
    explicit: Option<PathBuf>,
    candidates: impl IntoIterator<Item = Option<PathBuf>>,
) -> Option<PathBuf> {
    explicit.or_else(|| candidates.into_iter().flatten().find(|p| p.is_file()))
}

// ── Load / save ───────────────────────────────────────────────────────────────

impl Config {
    /// Read and parse one file.  An unrecognised version yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        if config.version != CONFIG_VERSION {
            log::warn!(
                "{}: unsupported config version {}, using defaults",
                path.display(),
                config.version
            );
            return Ok(Self::default());
        }
        Ok(config)
    }

    /// Discover and load the configuration.  Never fails: a missing file
    /// yields defaults, an unreadable or invalid one is logged and ignored.
    pub fn load() -> Self {
        Self::load_discovered(discover())
    }

    fn load_discovered(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Write the configuration, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn load_from_parses_every_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("winshim.json");
        fs::write(
            &path,
            r#"{"version":1,"log_level":"debug","system_directory":"C:\\Windows\\System32"}"#,
        )
        .expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(
            config.system_directory,
            Some(PathBuf::from("C:\\Windows\\System32"))
        );
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            log_level: LevelFilter::Trace,
            ..Config::default()
        };
        config.save_to(&path).expect("save");
        assert_eq!(Config::load_from(&path).expect("load"), config);
    }

    #[test]
    fn unknown_version_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("winshim.json");
        fs::write(&path, r#"{"version":99,"log_level":"trace"}"#).expect("write");
        assert_eq!(Config::load_from(&path).expect("load"), Config::default());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("winshim.json");
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_path_takes_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("winshim.json");
        fs::write(&local, "{}").expect("write");
        let explicit = dir.path().join("elsewhere.json");

        assert_eq!(
            discover_from(Some(explicit.clone()), [Some(local.clone())]),
            Some(explicit)
        );
        assert_eq!(discover_from(None, [Some(local.clone())]), Some(local));
    }

    #[test]
    fn discovery_skips_missing_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("absent.json");
        let user = dir.path().join("config.json");
        fs::write(&user, "{}").expect("write");

        assert_eq!(
            discover_from(None, [Some(absent.clone()), None, Some(user.clone())]),
            Some(user)
        );
        assert_eq!(discover_from(None, [Some(absent), None]), None);
    }

    #[test]
    fn discovered_file_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("winshim.json");
        fs::write(&path, r#"{"version":1,"log_level":"info"}"#).expect("write");

        let config = Config::load_discovered(Some(path));
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(Config::load_discovered(None), Config::default());
    }

    #[test]
    fn unusable_discovered_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let invalid = dir.path().join("winshim.json");
        fs::write(&invalid, "{ not json").expect("write");

        assert_eq!(Config::load_discovered(Some(invalid)), Config::default());
        let absent = dir.path().join("absent.json");
        assert_eq!(Config::load_discovered(Some(absent)), Config::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load_from(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
