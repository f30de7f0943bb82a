use clap::Parser;
use claimcheck_config::{ClaimCheckConfig, ClaimCheckConfigLoader, ConfigError, default_config_paths};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "claimcheck",
    version,
    about = "Check a claim against a misinformation-checking backend"
)]
pub struct Cli {
    /// YAML config file. Defaults to claimcheck.yaml in the working or user config dir.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configured one.
    #[arg(long, value_name = "URL", env = "CLAIMCHECK_BACKEND")]
    pub backend: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,

    /// Print the raw result JSON instead of the rendered text (one-shot only).
    #[arg(long)]
    pub json: bool,

    /// Claim to check once. Without it the interactive UI starts.
    #[arg(value_name = "CLAIM", trailing_var_arg = true)]
    pub claim: Vec<String>,
}

impl Cli {
    /// The one-shot claim, if any words were given.
    pub fn one_shot_claim(&self) -> Option<String> {
        if self.claim.is_empty() {
            None
        } else {
            Some(self.claim.join(" "))
        }
    }

    pub fn load_config(&self) -> Result<ClaimCheckConfig, ConfigError> {
        let loader = match &self.config {
            Some(path) => ClaimCheckConfigLoader::new().with_file(path),
            // Later sources win, so the working directory goes last.
            None => default_config_paths()
                .into_iter()
                .rev()
                .fold(ClaimCheckConfigLoader::new(), |l, p| l.with_optional_file(p)),
        };
        let mut cfg = loader.load()?;
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    pub fn apply_overrides(&self, cfg: &mut ClaimCheckConfig) {
        if let Some(url) = &self.backend {
            cfg.backend.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.backend.timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_words_are_joined() {
        let cli = Cli::parse_from(["claimcheck", "The", "Earth", "is", "flat"]);
        assert_eq!(cli.one_shot_claim().as_deref(), Some("The Earth is flat"));

        let cli = Cli::parse_from(["claimcheck"]);
        assert!(cli.one_shot_claim().is_none());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "claimcheck",
            "--backend",
            "http://checker.internal:8080",
            "--timeout-secs",
            "3",
            "--json",
            "claim",
        ]);
        assert!(cli.json);
        let mut cfg = ClaimCheckConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.backend.base_url, "http://checker.internal:8080");
        assert_eq!(cfg.backend.timeout_secs, 3);
        assert_eq!(cfg.backend.check_path, "/check");
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let cli = Cli::parse_from(["claimcheck", "--config", "/nonexistent/claimcheck.yaml"]);
        assert!(cli.load_config().is_err());
    }
}
