use std::path::PathBuf;

pub const DEFAULT_CONSOLE_BASE_URL: &str = "http://127.0.0.1:3000";
pub const ENV_CONSOLE_BASE_URL: &str = "CONSOLE_BASE_URL";
pub const ENV_CONSOLE_PREFERENCES_PATH: &str = "CONSOLE_PREFERENCES_PATH";
pub const PREFERENCES_FILE_NAME: &str = "console-preferences.v1.json";
pub const CONFIG_SOURCE_DEFAULT: &str = "default_local";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseUrl {
    pub base_url: String,
    pub source: String,
}

/// Base URL of the console backend: explicit override, then
/// `CONSOLE_BASE_URL`, then the local default.
pub fn resolve_base_url(explicit: Option<&str>) -> Result<ResolvedBaseUrl, ConfigError> {
    if let Some(base_url) = explicit.map(str::trim).filter(|value| !value.is_empty()) {
        return Ok(ResolvedBaseUrl {
            base_url: normalize_base_url(base_url)?,
            source: "argument".to_string(),
        });
    }
    if let Some(base_url) = env_non_empty(ENV_CONSOLE_BASE_URL) {
        return Ok(ResolvedBaseUrl {
            base_url: normalize_base_url(&base_url)?,
            source: ENV_CONSOLE_BASE_URL.to_string(),
        });
    }
    Ok(ResolvedBaseUrl {
        base_url: normalize_base_url(DEFAULT_CONSOLE_BASE_URL)?,
        source: CONFIG_SOURCE_DEFAULT.to_string(),
    })
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

/// Preference file location: explicit override, then
/// `CONSOLE_PREFERENCES_PATH`, then the platform data directory.
#[must_use]
pub fn resolve_preferences_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Some(path) = env_non_empty(ENV_CONSOLE_PREFERENCES_PATH) {
        return PathBuf::from(path);
    }
    default_preferences_path()
}

fn default_preferences_path() -> PathBuf {
    if let Some(mut data_dir) = dirs::data_local_dir() {
        data_dir.push("relay-console");
        data_dir.push(PREFERENCES_FILE_NAME);
        return data_dir;
    }

    if let Some(mut home_dir) = dirs::home_dir() {
        home_dir.push(".relay-console");
        home_dir.push(PREFERENCES_FILE_NAME);
        return home_dir;
    }

    PathBuf::from(PREFERENCES_FILE_NAME)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn with_env<T>(overrides: &[(&str, Option<&str>)], test: impl FnOnce() -> T) -> T {
        let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = overrides
            .iter()
            .map(|(key, _)| (*key, std::env::var(key).ok()))
            .collect::<Vec<_>>();

        for (key, value) in overrides {
            if let Some(value) = value {
                unsafe { std::env::set_var(key, value) };
            } else {
                unsafe { std::env::remove_var(key) };
            }
        }

        let result = test();

        for (key, value) in previous {
            if let Some(value) = value {
                unsafe { std::env::set_var(key, value) };
            } else {
                unsafe { std::env::remove_var(key) };
            }
        }

        result
    }

    #[test]
    fn normalize_base_url_trims_and_drops_trailing_slash() {
        let normalized = normalize_base_url(" https://console.example.com/ ").expect("valid");
        assert_eq!(normalized, "https://console.example.com");
    }

    #[test]
    fn normalize_base_url_rejects_missing_scheme_or_host() {
        assert_eq!(
            normalize_base_url("console.example.com"),
            Err(ConfigError::InvalidBaseUrl)
        );
        assert_eq!(normalize_base_url("https:///"), Err(ConfigError::InvalidBaseUrl));
        assert_eq!(normalize_base_url("  "), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn base_url_prefers_argument_then_env_then_default() {
        with_env(&[(ENV_CONSOLE_BASE_URL, Some("https://env.example.com/"))], || {
            let explicit = resolve_base_url(Some("http://10.0.0.2:3000")).expect("explicit");
            assert_eq!(explicit.base_url, "http://10.0.0.2:3000");
            assert_eq!(explicit.source, "argument");

            let from_env = resolve_base_url(None).expect("env");
            assert_eq!(from_env.base_url, "https://env.example.com");
            assert_eq!(from_env.source, ENV_CONSOLE_BASE_URL);
        });

        with_env(&[(ENV_CONSOLE_BASE_URL, None)], || {
            let resolved = resolve_base_url(Some("  ")).expect("default");
            assert_eq!(resolved.base_url, DEFAULT_CONSOLE_BASE_URL);
            assert_eq!(resolved.source, CONFIG_SOURCE_DEFAULT);
        });
    }

    #[test]
    fn preferences_path_honors_env_override() {
        with_env(
            &[(ENV_CONSOLE_PREFERENCES_PATH, Some("/tmp/console/prefs.json"))],
            || {
                assert_eq!(
                    resolve_preferences_path(None),
                    PathBuf::from("/tmp/console/prefs.json")
                );
                assert_eq!(
                    resolve_preferences_path(Some(PathBuf::from("other.json"))),
                    PathBuf::from("other.json")
                );
            },
        );
    }
}
