//! This module contains the definition for ratatosk configuration and command line arguments.
use clap::{Parser, Subcommand};
use config::Config;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::path::PathBuf;

use rubber::adapters::secondary::http::ElasticsearchConfig;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Config Compilation Error: {}", source))]
    ConfigCompilation { source: common::config::Error },

    #[snafu(display("Config Merge Error: {} [{}]", msg, source))]
    ConfigMerge {
        msg: String,
        source: config::ConfigError,
    },

    #[snafu(display("Invalid Configuration: {}", msg))]
    Invalid { msg: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bulk {
    /// Documents per bulk request.
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub mode: Option<String>,
    pub logging: Logging,
    pub elasticsearch: ElasticsearchConfig,
    pub bulk: Bulk,
    #[serde(default)]
    pub nb_threads: Option<usize>,
}

#[derive(Debug, Parser)]
#[command(
    name = "ratatosk",
    about = "Query and feed an Elasticsearch cluster",
    version,
    author
)]
pub struct Opts {
    /// Defines the config directory
    ///
    /// This directory must contain 'elasticsearch' and 'ratatosk' subdirectories.
    #[arg(short = 'c', long = "config-dir")]
    pub config_dir: PathBuf,

    /// Defines the run mode in {testing, dev, prod, ...}
    ///
    /// If no run mode is provided, a default behavior will be used.
    #[arg(short = 'm', long = "run-mode")]
    pub run_mode: Option<String>,

    /// Override settings values using key=value
    #[arg(short = 's', long = "setting")]
    pub settings: Vec<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints ratatosk's configuration
    Config,
    /// Prints the cluster health
    Health,
    /// Prints cluster wide statistics
    Stats,
    /// Lists indices
    Indices {
        /// Columns to display, aliases such as 'dc' are accepted
        #[arg(short = 'H', long = "columns", value_delimiter = ',')]
        columns: Vec<String>,
        /// Index name or pattern
        index: Option<String>,
    },
    /// Lists shards
    Shards {
        /// Columns to display, aliases such as 'dc' are accepted
        #[arg(short = 'H', long = "columns", value_delimiter = ',')]
        columns: Vec<String>,
        /// Index name or pattern
        index: Option<String>,
    },
    /// Lists aliases
    Aliases {
        /// Alias name or pattern
        name: Option<String>,
    },
    /// Tells whether an index, or a document when an id is given, exists
    Exists { index: String, id: Option<String> },
    /// Indexes the documents of an NDJSON file, one per line
    Bulk { index: String, file: PathBuf },
}

impl Settings {
    // Read the configuration from <config-dir>/ratatosk and <config-dir>/elasticsearch
    pub fn new(opts: &Opts) -> Result<Self, Error> {
        let config: Config = common::config::config_from(
            opts.config_dir.as_ref(),
            &["ratatosk", "elasticsearch"],
            opts.run_mode.as_deref(),
            "RATATOSK",
            opts.settings.clone(),
        )
        .context(ConfigCompilationSnafu)?;

        let settings: Settings = config.try_deserialize().context(ConfigMergeSnafu {
            msg: String::from("Cannot convert configuration into ratatosk settings"),
        })?;

        if settings.bulk.chunk_size == 0 {
            return Err(Error::Invalid {
                msg: String::from("bulk.chunk_size must be positive"),
            });
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn opts(run_mode: Option<&str>, settings: &[&str]) -> Opts {
        Opts {
            config_dir: [env!("CARGO_MANIFEST_DIR"), "config"].iter().collect(),
            run_mode: run_mode.map(String::from),
            settings: settings.iter().map(|s| s.to_string()).collect(),
            cmd: Command::Config,
        }
    }

    #[test]
    fn should_load_default_settings() {
        let settings = Settings::new(&opts(None, &[])).unwrap();
        assert_eq!(settings.elasticsearch.url.as_str(), "http://localhost:9200/");
        assert_eq!(settings.elasticsearch.timeout, Duration::from_secs(10));
        assert_eq!(settings.bulk.chunk_size, 1000);
        assert!(settings.mode.is_none());
    }

    #[test]
    fn should_apply_run_mode() {
        let settings = Settings::new(&opts(Some("testing"), &[])).unwrap();
        assert_eq!(settings.mode.as_deref(), Some("testing"));
        assert_eq!(settings.elasticsearch.url.as_str(), "http://localhost:9201/");
        assert!(!settings.elasticsearch.healthcheck);
    }

    #[test]
    fn should_override_with_command_line_settings() {
        let settings = Settings::new(&opts(
            None,
            &["bulk.chunk_size=50", "elasticsearch.url=http://es.example.com:9200"],
        ))
        .unwrap();
        assert_eq!(settings.bulk.chunk_size, 50);
        assert_eq!(settings.elasticsearch.url.host_str(), Some("es.example.com"));
    }

    #[test]
    fn should_reject_empty_chunks() {
        let err = Settings::new(&opts(None, &["bulk.chunk_size=0"])).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
    }

    #[test]
    fn should_fail_on_unknown_run_mode() {
        let err = Settings::new(&opts(Some("nope"), &[])).unwrap_err();
        assert!(matches!(err, Error::ConfigCompilation { .. }));
    }

    #[test]
    fn should_parse_command_line() {
        let opts = Opts::try_parse_from([
            "ratatosk",
            "-c",
            "config",
            "-s",
            "bulk.chunk_size=10",
            "indices",
            "-H",
            "idx,dc,rto",
            "places*",
        ])
        .unwrap();
        assert_eq!(opts.settings, vec!["bulk.chunk_size=10"]);
        match opts.cmd {
            Command::Indices { columns, index } => {
                assert_eq!(columns, vec!["idx", "dc", "rto"]);
                assert_eq!(index.as_deref(), Some("places*"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn should_require_config_dir() {
        assert!(Opts::try_parse_from(["ratatosk", "health"]).is_err());
    }
}
