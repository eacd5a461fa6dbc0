//! Runtime configuration, read from the environment with defaults

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MONTHLY_TARGET_KG: f64 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub http_timeout: Duration,
    pub history_capacity: Option<usize>,
    pub monthly_target_kg: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_capacity: None,
            monthly_target_kg: DEFAULT_MONTHLY_TARGET_KG,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unparseable numbers keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("CARBON_TRACKER_GEMINI_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(url) = lookup("CARBON_TRACKER_GEMINI_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }

        if let Some(model) = lookup("CARBON_TRACKER_GEMINI_MODEL") {
            let model = model.trim();
            if !model.is_empty() {
                config.model = model.to_string();
            }
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "CARBON_TRACKER_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(secs);
        }

        config.history_capacity =
            parse_var::<usize, _>(&lookup, "CARBON_TRACKER_HISTORY_CAPACITY").filter(|&n| n > 0);

        if let Some(raw) = lookup("CARBON_TRACKER_MONTHLY_TARGET_KG") {
            match parse_monthly_target(&raw) {
                Ok(target) => config.monthly_target_kg = target,
                Err(reason) => warn!(
                    target: "carbon_tracker::config",
                    value = %raw,
                    %reason,
                    "ignoring monthly target"
                ),
            }
        }

        config
    }
}

/// Parse a monthly target in kg CO2e; it must be finite and not negative.
///
/// Also used as the clap value parser for `--target`.
pub fn parse_monthly_target(raw: &str) -> Result<f64, String> {
    let target: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw.trim()))?;
    if target.is_finite() && target >= 0.0 {
        Ok(target)
    } else {
        Err(format!("target must be a finite, non-negative number, got {target}"))
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                target: "carbon_tracker::config",
                variable = name,
                value = %raw,
                "ignoring unparseable value"
            );
            None
        }
    }
}
