use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Input poll timeout; one running tick per timeout when no key is pressed.
pub const DEFAULT_TICK: Duration = Duration::from_millis(200);
pub const DEFAULT_SEED: u64 = 5489;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick: Duration,
    pub seed: u64,
    /// Log destination. Stdout belongs to the game, so no path means no logs.
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            seed: DEFAULT_SEED,
            log_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Reads `SNAKE_TICK_MS`, `SNAKE_SEED`, `SNAKE_LOG` and `SNAKE_LOG_LEVEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(raw) = lookup("SNAKE_TICK_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("SNAKE_TICK_MS must be a whole number of milliseconds, got {raw:?}"))?;
            anyhow::ensure!(millis > 0, "SNAKE_TICK_MS must be greater than zero");
            config.tick = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("SNAKE_SEED") {
            config.seed = raw
                .trim()
                .parse()
                .with_context(|| format!("SNAKE_SEED must be an unsigned integer, got {raw:?}"))?;
        }

        if let Some(path) = lookup("SNAKE_LOG").filter(|p| !p.is_empty()) {
            config.log_file = Some(PathBuf::from(path));
        }

        if let Some(filter) = lookup("SNAKE_LOG_LEVEL").filter(|f| !f.is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
