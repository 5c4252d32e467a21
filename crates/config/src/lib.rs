use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk CLI configuration: a set of named connection profiles plus the
/// name of the one used when `--profile` is absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Connection values for one Plane instance. Every field is optional so a
/// profile can be partial, with the rest supplied by the environment (the
/// API key usually is).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub base_url: Option<String>,
    pub workspace: Option<String>,
    pub api_key: Option<String>,
    /// Default project reference (id, identifier, slug or name) used when a
    /// command is invoked without `--project`.
    pub project: Option<String>,
}

impl Config {
    /// Reads the config file, or the default location when `path` is `None`.
    /// A file that does not exist yet yields the empty config.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = resolve_path(path);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Unable to read config file at {}", path.display()))
            }
        };

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Writes the config file, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: Option<P>) -> Result<()> {
        let path = resolve_path(path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let serialized = serde_yaml::to_string(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Unable to write config file {}", path.display()))
    }

    /// Picks the profile to operate with: the requested name when given,
    /// otherwise the configured default, otherwise whichever profile exists.
    /// `None` when the requested name is unknown or no profiles are set up.
    pub fn resolve_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Option<(&'a str, &'a Profile)> {
        let name = requested.or(self.default_profile.as_deref());

        match name {
            Some(name) => self.profiles.get(name).map(|profile| (name, profile)),
            None => self
                .profiles
                .iter()
                .next()
                .map(|(name, profile)| (name.as_str(), profile)),
        }
    }
}

fn resolve_path<P: AsRef<Path>>(path: Option<P>) -> PathBuf {
    match path {
        Some(path) => path.as_ref().to_path_buf(),
        None => {
            let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(".plane-cli");
            path.push("config.yaml");
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile(workspace: &str) -> Profile {
        Profile {
            base_url: Some("https://plane.example.com".to_string()),
            workspace: Some(workspace.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_missing_file_is_empty_config() {
        let config = Config::load(Some("/nonexistent/plane-cli/config.yaml")).unwrap();
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "invalid: yaml: [unclosed").unwrap();

        let err = Config::load(Some(temp_file.path())).unwrap_err();
        assert!(err.to_string().contains("Malformed YAML"));
    }

    #[test]
    fn test_save_round_trips_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config {
            default_profile: Some("work".to_string()),
            ..Default::default()
        };
        config.profiles.insert(
            "work".to_string(),
            Profile {
                api_key: Some("plane_api_123".to_string()),
                project: Some("eng".to_string()),
                ..profile("acme")
            },
        );

        config.save(Some(&path)).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();

        assert_eq!(loaded.default_profile.as_deref(), Some("work"));
        let work = loaded.profiles.get("work").unwrap();
        assert_eq!(work.base_url.as_deref(), Some("https://plane.example.com"));
        assert_eq!(work.workspace.as_deref(), Some("acme"));
        assert_eq!(work.api_key.as_deref(), Some("plane_api_123"));
        assert_eq!(work.project.as_deref(), Some("eng"));
    }

    #[test]
    fn test_resolve_profile_prefers_requested_name() {
        let mut config = Config {
            default_profile: Some("home".to_string()),
            ..Default::default()
        };
        config.profiles.insert("home".to_string(), profile("home-ws"));
        config.profiles.insert("work".to_string(), profile("work-ws"));

        let (name, resolved) = config.resolve_profile(Some("work")).unwrap();
        assert_eq!(name, "work");
        assert_eq!(resolved.workspace.as_deref(), Some("work-ws"));
    }

    #[test]
    fn test_resolve_profile_falls_back_to_default() {
        let mut config = Config {
            default_profile: Some("home".to_string()),
            ..Default::default()
        };
        config.profiles.insert("home".to_string(), profile("home-ws"));

        let (name, resolved) = config.resolve_profile(None).unwrap();
        assert_eq!(name, "home");
        assert_eq!(resolved.workspace.as_deref(), Some("home-ws"));
    }

    #[test]
    fn test_resolve_profile_single_entry_without_default() {
        let mut config = Config::default();
        config.profiles.insert("only".to_string(), profile("only-ws"));

        let (name, _) = config.resolve_profile(None).unwrap();
        assert_eq!(name, "only");
    }

    #[test]
    fn test_resolve_profile_unknown_requested_name() {
        let mut config = Config::default();
        config.profiles.insert("only".to_string(), profile("only-ws"));

        assert!(config.resolve_profile(Some("nonexistent")).is_none());
    }

    #[test]
    fn test_resolve_profile_empty_config() {
        assert!(Config::default().resolve_profile(None).is_none());
    }
}
