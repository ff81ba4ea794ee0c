//! Configuration loading and validation

use std::path::PathBuf;

use crate::cli::Cli;

/// Errors in the runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("audio directory {} does not exist", .0.display())]
    AudioDirMissing(PathBuf),
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TOML file holding the guest registry
    pub tags_file: PathBuf,

    /// Directory audio filenames are resolved against
    pub audio_dir: PathBuf,

    /// Explicit device node, bypassing discovery
    pub device: Option<PathBuf>,
}

impl Config {
    /// Build configuration from parsed arguments
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if !cli.audio_dir.is_dir() {
            return Err(ConfigError::AudioDirMissing(cli.audio_dir));
        }

        Ok(Self {
            tags_file: cli.tags_file,
            audio_dir: cli.audio_dir,
            device: cli.device,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LogLevel;

    fn cli(audio_dir: PathBuf) -> Cli {
        Cli {
            tags_file: PathBuf::from("tags.toml"),
            audio_dir,
            log_level: LogLevel::Info,
            device: None,
        }
    }

    #[test]
    fn test_config_from_cli() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_cli(cli(dir.path().to_owned())).unwrap();
        assert_eq!(config.audio_dir, dir.path());
        assert_eq!(config.tags_file, PathBuf::from("tags.toml"));
        assert!(config.device.is_none());
    }

    #[test]
    fn test_missing_audio_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Config::from_cli(cli(missing.clone())).unwrap_err();
        assert!(matches!(err, ConfigError::AudioDirMissing(p) if p == missing));
    }
}
