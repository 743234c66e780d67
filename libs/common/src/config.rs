use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use snafu::{ResultExt, Snafu};
use std::env;
use std::path::Path;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Key Value Splitting Error: {}", msg))]
    Splitting { msg: String },

    #[snafu(display("Setting Config Value Error: {}", source))]
    ConfigValue { source: config::ConfigError },

    #[snafu(display("Config Compilation Error: {}", source))]
    ConfigCompilation { source: config::ConfigError },
}

/// Layers the configuration files found in each of `sub_dirs` under
/// `config_dir`, then the environment.
///
/// For each sub directory, in order:
/// * `default.toml`, which must exist,
/// * `<run_mode>.toml`, which must exist if a run mode is given. The `RUN_MODE`
///   environment variable takes precedence over the `run_mode` argument,
/// * `local.toml`, optional, and not meant to be checked in.
///
/// Environment variables starting with `<prefix>_` come last, `_` separating
/// nested keys: `RATATOSK_ELASTICSEARCH_URL` sets `elasticsearch.url`.
pub fn config_builder_from(
    config_dir: &Path,
    sub_dirs: &[&str],
    run_mode: Option<&str>,
    prefix: &str,
) -> ConfigBuilder<DefaultState> {
    let run_mode = env::var("RUN_MODE")
        .ok()
        .or_else(|| run_mode.map(String::from));

    let builder = sub_dirs
        .iter()
        .fold(Config::builder(), |mut builder, sub_dir| {
            let dir_path = config_dir.join(sub_dir);

            let default_path = dir_path.join("default").with_extension("toml");
            builder = builder.add_source(File::from(default_path));

            if let Some(run_mode) = &run_mode {
                let run_mode_path = dir_path.join(run_mode).with_extension("toml");
                builder = builder.add_source(File::from(run_mode_path).required(true));
            }

            let local_path = dir_path.join("local").with_extension("toml");
            builder.add_source(File::from(local_path).required(false))
        });

    builder.add_source(Environment::with_prefix(prefix).separator("_"))
}

/// Same as [`config_builder_from`], with `key=value` overrides on top.
pub fn config_from(
    config_dir: &Path,
    sub_dirs: &[&str],
    run_mode: Option<&str>,
    prefix: &str,
    overrides: Vec<String>,
) -> Result<Config, Error> {
    config_builder_from(config_dir, sub_dirs, run_mode, prefix)
        .add_source(config_from_args(overrides)?)
        .build()
        .context(ConfigCompilationSnafu)
}

/// Create a new configuration source from a list of assignments key=value
///
/// The function iterates over the list, and for each element, it tries to
/// (a) identify the key and the value, by searching for the '=' sign.
/// (b) parse the value into one of bool, i64, f64. if not it's a string.
pub fn config_from_args(args: impl IntoIterator<Item = String>) -> Result<Config, Error> {
    let mut config = Config::builder();

    for arg in args {
        let (key, val) = arg.split_once('=').ok_or(Error::Splitting {
            msg: format!("missing '=' in setting override: {}", arg),
        })?;

        config = {
            if let Ok(as_bool) = val.parse::<bool>() {
                config.set_override(key, as_bool)
            } else if let Ok(as_int) = val.parse::<i64>() {
                config.set_override(key, as_int)
            } else if let Ok(as_float) = val.parse::<f64>() {
                config.set_override(key, as_float)
            } else {
                config.set_override(key, val)
            }
        }
        .context(ConfigValueSnafu)?;
    }

    config.build().context(ConfigCompilationSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, sub_dir: &str, name: &str, content: &str) {
        let sub_dir = dir.join(sub_dir);
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(sub_dir.join(name), content).unwrap();
    }

    #[test]
    fn should_type_overrides() {
        let config = config_from_args(vec![
            String::from("bulk.chunk_size=500"),
            String::from("elasticsearch.healthcheck=true"),
            String::from("ratio=0.5"),
            String::from("elasticsearch.url=http://es:9200"),
        ])
        .unwrap();
        assert_eq!(config.get_int("bulk.chunk_size").unwrap(), 500);
        assert!(config.get_bool("elasticsearch.healthcheck").unwrap());
        assert_eq!(config.get_float("ratio").unwrap(), 0.5);
        assert_eq!(
            config.get_string("elasticsearch.url").unwrap(),
            "http://es:9200"
        );
    }

    #[test]
    fn should_reject_override_without_equal_sign() {
        let err = config_from_args(vec![String::from("elasticsearch.url")]).unwrap_err();
        assert!(matches!(err, Error::Splitting { .. }));
    }

    #[test]
    fn should_layer_files_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tool", "default.toml", "a = 1\nb = 1\nc = 1\nd = 1\n");
        write(dir.path(), "tool", "testing.toml", "b = 2\nc = 2\nd = 2\n");
        write(dir.path(), "tool", "local.toml", "c = 3\nd = 3\n");
        write(dir.path(), "other", "default.toml", "e = \"other\"\n");
        write(dir.path(), "other", "testing.toml", "");

        let config = config_from(
            dir.path(),
            &["tool", "other"],
            Some("testing"),
            "RUBBER_COMMON_TEST",
            vec![String::from("d=4")],
        )
        .unwrap();
        assert_eq!(config.get_int("a").unwrap(), 1);
        assert_eq!(config.get_int("b").unwrap(), 2);
        assert_eq!(config.get_int("c").unwrap(), 3);
        assert_eq!(config.get_int("d").unwrap(), 4);
        assert_eq!(config.get_string("e").unwrap(), "other");
    }

    #[test]
    fn should_require_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = config_from(dir.path(), &["missing"], None, "RUBBER_COMMON_TEST", vec![])
            .unwrap_err();
        assert!(matches!(err, Error::ConfigCompilation { .. }));
    }
}
