//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which bundled dataset to load when no file is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    /// Small dataset for quick iteration.
    Development,
    /// Full-size dataset.
    #[default]
    Production,
}

impl Environment {
    pub fn dataset_file_name(self) -> &'static str {
        match self {
            Environment::Development => "dataset_small.csv",
            Environment::Production => "dataset_large.csv",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "modboard")]
#[command(about = "Interdependent filtering dashboard for CSV datasets", long_about = None)]
pub struct Config {
    /// Dataset to open (.csv or .json); overrides the bundled dataset
    pub file: Option<PathBuf>,

    /// Selects the bundled dataset variant
    #[arg(long = "env", value_enum, env = "DASHBOARD_ENV", default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Directory holding the bundled datasets
    #[arg(long, env = "DASHBOARD_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl Config {
    /// The file to load at startup.
    ///
    /// Without an explicit file, a missing large dataset falls back to the
    /// bundled small one (generate the large one with `generate_sample`).
    pub fn dataset_path(&self) -> PathBuf {
        if let Some(path) = &self.file {
            return path.clone();
        }
        let path = self.data_dir.join(self.environment.dataset_file_name());
        if path.exists() || self.environment == Environment::Development {
            return path;
        }
        let small = self
            .data_dir
            .join(Environment::Development.dataset_file_name());
        if small.exists() {
            log::warn!(
                "{} not found, falling back to {}",
                path.display(),
                small.display()
            );
            return small;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_selects_small_dataset() {
        let config = Config::try_parse_from(["modboard", "--env", "development", "--data-dir", "bundled"])
            .unwrap();
        assert_eq!(config.dataset_path(), PathBuf::from("bundled/dataset_small.csv"));
    }

    #[test]
    fn explicit_file_wins() {
        let config = Config::try_parse_from(["modboard", "mine.json", "--env", "development"]).unwrap();
        assert_eq!(config.dataset_path(), PathBuf::from("mine.json"));
    }

    #[test]
    fn default_config_resolves_to_a_bundled_file() {
        let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
        let config = Config::try_parse_from(["modboard", "--data-dir", data_dir]).unwrap();
        assert!(config.dataset_path().exists(), "{}", config.dataset_path().display());
    }

    #[test]
    fn missing_large_dataset_falls_back_to_small() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dataset_small.csv"), "number,mod3\n1,1\n").unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let config =
            Config::try_parse_from(["modboard", "--env", "production", "--data-dir", data_dir]).unwrap();
        assert_eq!(config.dataset_path(), dir.path().join("dataset_small.csv"));

        std::fs::write(dir.path().join("dataset_large.csv"), "number,mod3\n1,1\n").unwrap();
        assert_eq!(config.dataset_path(), dir.path().join("dataset_large.csv"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Config::try_parse_from(["modboard", "--env", "staging"]).is_err());
    }
}
