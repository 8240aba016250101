use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use softphone_core::{normalize_dialstring, Presence, SoftphoneOptions, DEFAULT_PHONE_NUMBERS};
use thiserror::Error;

const APP_DIR: &str = "softphone";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub initial_presence: Presence,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub phone_numbers: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_presence: Presence::NotReady,
            simulator: SimulatorConfig {
                phone_numbers: DEFAULT_PHONE_NUMBERS.iter().map(|n| n.to_string()).collect(),
            },
        }
    }
}

impl AppConfig {
    pub fn softphone_options(&self) -> SoftphoneOptions {
        SoftphoneOptions {
            initial_presence: self.initial_presence.clone(),
            phone_numbers: self.simulator.phone_numbers.clone(),
        }
    }
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
    #[error("invalid initial_presence value: {0:?}")]
    InvalidPresence(String),
    #[error("simulator.phone_numbers must not be empty")]
    EmptyPhoneNumbers,
    #[error("invalid simulator phone number: {0:?}")]
    InvalidPhoneNumber(String),
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

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    initial_presence: Option<String>,
    simulator: Option<SimulatorFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulatorFile {
    phone_numbers: Option<Vec<String>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
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

    if let Some(label) = parsed.initial_presence {
        config.initial_presence =
            Presence::parse(&label).map_err(|_| ConfigError::InvalidPresence(label))?;
    }

    if let Some(numbers) = parsed.simulator.and_then(|sim| sim.phone_numbers) {
        if numbers.is_empty() {
            return Err(ConfigError::EmptyPhoneNumbers);
        }
        config.simulator.phone_numbers = numbers
            .into_iter()
            .map(|raw| normalize_dialstring(&raw).map_err(|_| ConfigError::InvalidPhoneNumber(raw)))
            .collect::<Result<Vec<_>>>()?;
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
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
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
    use super::{load_at_path, merge_config, ConfigError, ConfigFile, SimulatorFile};
    use softphone_core::Presence;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            initial_presence: Some("Ready".to_string()),
            simulator: Some(SimulatorFile {
                phone_numbers: Some(vec!["+1 (415) 555-1212".to_string()]),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.initial_presence, Presence::Ready);
        assert_eq!(merged.simulator.phone_numbers, vec!["+14155551212"]);
    }

    #[test]
    fn merge_config_keeps_defaults() {
        let parsed = ConfigFile {
            initial_presence: None,
            simulator: None,
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.initial_presence, Presence::NotReady);
        assert_eq!(merged.simulator.phone_numbers.len(), 4);
    }

    #[test]
    fn merge_config_rejects_bad_numbers() {
        let empty = ConfigFile {
            initial_presence: None,
            simulator: Some(SimulatorFile {
                phone_numbers: Some(Vec::new()),
            }),
        };
        assert!(matches!(
            merge_config(empty),
            Err(ConfigError::EmptyPhoneNumbers)
        ));

        let letters = ConfigFile {
            initial_presence: None,
            simulator: Some(SimulatorFile {
                phone_numbers: Some(vec!["CALL-ME".to_string()]),
            }),
        };
        assert!(matches!(
            merge_config(letters),
            Err(ConfigError::InvalidPhoneNumber(_))
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "initial_presence = \"ready\"\n[simulator]\nphone_numbers = [\"555-0100\", \"555-0101\"]\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert!(config.initial_presence.is_ready());
        assert_eq!(config.simulator.phone_numbers, vec!["5550100", "5550101"]);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "ring_volume = 11\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
