//! Loader for claimcheck configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached, with `CLAIMCHECK__`
//! environment variables always applied last (`CLAIMCHECK__BACKEND__BASE_URL`
//! overrides `backend.base_url`). String values may reference other
//! environment variables as `${VAR}`; those are expanded after merging.
//! Every field has a default, so an empty document is a valid configuration.
use claimcheck_common::observability::LogFormat;
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up by [`default_config_paths`].
pub const CONFIG_FILE_NAME: &str = "claimcheck.yaml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CHECK_PATH: &str = "/check";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Default, Deserialize)]
pub struct ClaimCheckConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the claim-verification backend lives.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_check_path")]
    pub check_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            check_path: default_check_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
            dir: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_check_path() -> String {
    DEFAULT_CHECK_PATH.into()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_filter() -> String {
    "info".into()
}

/// Candidate config files, most specific first: the working directory, then
/// the user's config dir (`~/.config/claimcheck/claimcheck.yaml` on Linux).
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("claimcheck").join(CONFIG_FILE_NAME));
    }
    paths
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ClaimCheckConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ClaimCheckConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimCheckConfigLoader {
    /// Start with no files; `CLAIMCHECK__` env overrides are applied on load.
    ///
    /// ```
    /// use claimcheck_config::ClaimCheckConfigLoader;
    ///
    /// let config = ClaimCheckConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.backend.base_url, "http://localhost:3000");
    /// assert_eq!(config.backend.check_path, "/check");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only if present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use claimcheck_config::ClaimCheckConfigLoader;
    ///
    /// let cfg = ClaimCheckConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// backend:
    ///   base_url: "http://factcheck.internal:8080"
    ///   timeout_secs: 40
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.backend.base_url, "http://factcheck.internal:8080");
    /// assert_eq!(cfg.backend.timeout_secs, 40);
    /// assert_eq!(cfg.backend.check_path, "/check");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use claimcheck_config::ClaimCheckConfigLoader;
    ///
    /// unsafe { std::env::set_var("FACTCHECK_HOST", "verifier.example.org"); }
    ///
    /// let config = ClaimCheckConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// backend:
    ///   base_url: "https://${FACTCHECK_HOST}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.backend.base_url, "https://verifier.example.org");
    ///
    /// unsafe { std::env::remove_var("FACTCHECK_HOST"); }
    /// ```
    pub fn load(self) -> Result<ClaimCheckConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("CLAIMCHECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ClaimCheckConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("HOST", Some("localhost")), ("PORT", Some("3000"))], || {
            let mut v = json!([
                "http://$HOST",
                { "base_url": "http://${HOST}:${PORT}" },
                15,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["http://localhost", { "base_url": "http://localhost:3000" }, 15, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("PORT", Some("3000")),
                ("HOST", Some("localhost:${PORT}")),
                ("URL", Some("http://${HOST}/api")),
            ],
            || {
                let mut v = json!("${URL}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("http://localhost:3000/api"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg: ClaimCheckConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.logging.filter, "info");
        assert!(cfg.logging.dir.is_none());
    }

    #[test]
    fn default_paths_start_with_working_dir() {
        let paths = default_config_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE_NAME));
    }
}
