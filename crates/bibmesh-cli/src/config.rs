//! `bibmesh.toml`: which stores the CLI registers.
//!
//! ```toml
//! [journals]
//! stores = ["data/doaj.jsonl"]
//!
//! [taxonomy]
//! stores = ["data/scimago.json", "data/extra.json"]
//! ```
//!
//! Relative store paths resolve against the config file's directory.

use crate::cli::StoreArgs;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "bibmesh.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read config {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub stores: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub journals: StoreSection,
    #[serde(default)]
    pub taxonomy: StoreSection,
}

impl Config {
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigFileError> {
        toml::from_str(raw).map_err(|source| ConfigFileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Config named by `--config`, or the default file when the flag is absent.
    ///
    /// Only the default may be missing; it then reads as an empty config.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigFileError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::load(Path::new(DEFAULT_CONFIG_PATH)) {
                Err(ConfigFileError::Read { source, .. })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    Ok(Self::default())
                }
                other => other,
            },
        }
    }

    /// Load `path`, resolving relative stores against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::parse(&raw, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.journals.stores = rebase(base, config.journals.stores);
        config.taxonomy.stores = rebase(base, config.taxonomy.stores);
        Ok(config)
    }
}

fn rebase(base: &Path, stores: Vec<String>) -> Vec<String> {
    stores
        .into_iter()
        .map(|store| {
            let path = PathBuf::from(&store);
            if path.is_absolute() || base.as_os_str().is_empty() {
                store
            } else {
                base.join(path).display().to_string()
            }
        })
        .collect()
}

/// Stores the command will register, after flag overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStores {
    pub journals: Vec<String>,
    pub taxonomy: Vec<String>,
}

impl ResolvedStores {
    /// Flags replace the file's list for their kind; an absent flag keeps it.
    pub fn resolve(args: &StoreArgs) -> Result<Self, ConfigFileError> {
        let config = Config::locate(args.config.as_deref())?;
        Ok(Self::merge(config, args))
    }

    fn merge(config: Config, args: &StoreArgs) -> Self {
        let journals = if args.journals.is_empty() {
            config.journals.stores
        } else {
            args.journals.clone()
        };
        let taxonomy = if args.taxonomy.is_empty() {
            config.taxonomy.stores
        } else {
            args.taxonomy.clone()
        };
        Self { journals, taxonomy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(journals: &[&str], taxonomy: &[&str]) -> StoreArgs {
        StoreArgs {
            config: None,
            journals: journals.iter().map(|s| s.to_string()).collect(),
            taxonomy: taxonomy.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn parses_both_sections() {
        let config = Config::parse(
            "[journals]\nstores = [\"a.jsonl\"]\n\n[taxonomy]\nstores = [\"b.json\", \"c.json\"]\n",
            Path::new("bibmesh.toml"),
        )
        .expect("config parses");
        assert_eq!(config.journals.stores, vec!["a.jsonl"]);
        assert_eq!(config.taxonomy.stores, vec!["b.json", "c.json"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let config = Config::parse("", Path::new("bibmesh.toml")).expect("empty config parses");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("[journals]\nstore = \"a\"\n", Path::new("x.toml"))
            .expect_err("typo should be rejected");
        assert!(err.to_string().contains("x.toml"));
    }

    #[test]
    fn flags_override_per_kind() {
        let config = Config {
            journals: StoreSection {
                stores: vec!["file.jsonl".into()],
            },
            taxonomy: StoreSection {
                stores: vec!["file.json".into()],
            },
        };
        let resolved = ResolvedStores::merge(config, &args(&["flag.jsonl"], &[]));
        assert_eq!(resolved.journals, vec!["flag.jsonl"]);
        assert_eq!(resolved.taxonomy, vec!["file.json"]);
    }

    #[test]
    fn relative_stores_follow_config_directory() {
        let rebased = rebase(
            Path::new("conf"),
            vec!["data/j.jsonl".into(), "/abs/t.json".into()],
        );
        assert_eq!(
            rebased,
            vec![
                Path::new("conf").join("data/j.jsonl").display().to_string(),
                "/abs/t.json".to_string()
            ]
        );
    }

    #[test]
    fn missing_default_config_is_empty() {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            assert_eq!(
                Config::locate(None).expect("missing default is fine"),
                Config::default()
            );
        }
        assert!(Config::locate(Some(Path::new("/definitely/not/bibmesh.toml"))).is_err());
    }

    #[test]
    fn explicit_default_name_must_exist() {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            let err = Config::locate(Some(Path::new(DEFAULT_CONFIG_PATH)))
                .expect_err("an explicitly named config must exist");
            assert!(matches!(err, ConfigFileError::Read { .. }));
        }
    }
}
