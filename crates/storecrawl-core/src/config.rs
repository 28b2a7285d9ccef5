use crate::app_config::{AppConfig, UnreachablePolicy, DEFAULT_INFO_PAGES};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("STORECRAWL_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("STORECRAWL_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORECRAWL_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let user_agent = or_default(
        "STORECRAWL_USER_AGENT",
        "storecrawl/0.1 (contact-discovery)",
    );
    let max_concurrent_stores = parse_usize("STORECRAWL_MAX_CONCURRENT_STORES", "1")?;
    let product_sample_size = parse_usize("STORECRAWL_PRODUCT_SAMPLE_SIZE", "5")?;

    let info_pages = match lookup("STORECRAWL_INFO_PAGES") {
        Ok(raw) => parse_path_list(&raw),
        Err(_) => DEFAULT_INFO_PAGES.iter().map(|p| (*p).to_string()).collect(),
    };

    let catalog_path = lookup("STORECRAWL_CATALOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let unreachable_policy =
        parse_unreachable_policy(&or_default("STORECRAWL_UNREACHABLE_POLICY", "skip-store"))?;

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_stores,
        product_sample_size,
        info_pages,
        catalog_path,
        unreachable_policy,
    })
}

/// Splits a comma-separated path list, dropping blank entries.
fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a string into an `UnreachablePolicy` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `skip-store` or `fail-run`.
pub fn parse_unreachable_policy(s: &str) -> Result<UnreachablePolicy, ConfigError> {
    match s.trim() {
        "skip-store" => Ok(UnreachablePolicy::SkipStore),
        "fail-run" => Ok(UnreachablePolicy::FailRun),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STORECRAWL_UNREACHABLE_POLICY".to_string(),
            reason: format!("expected \"skip-store\" or \"fail-run\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
