//! Config loading: ~/.whizdesk/config.json plus environment overrides.
//!
//! A missing or malformed file is not an error; defaults apply and a
//! warning is logged. Overrides come last so deployments can point the
//! agent at a different backend without editing the file.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ApiError;
use crate::types::Config;

/// Path to the config file.
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".whizdesk")
        .join("config.json")
}

/// Load config from the default path, applying env overrides.
pub fn load() -> Config {
    let cfg = load_from(&config_path());
    apply_overrides(cfg, |key| std::env::var(key).ok())
}

/// Load config from a specific file. Falls back to defaults on any
/// read or parse failure.
pub fn load_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Malformed config at {}: {}. Using defaults.", path.display(), e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// Apply environment-style overrides from a lookup function.
///
/// Split out from `load` so tests can pass a closure instead of racing
/// on process-wide env vars.
pub fn apply_overrides(mut cfg: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(base) = lookup("WHIZDESK_API_URL") {
        if !base.trim().is_empty() {
            cfg.api_base_url = base.trim().trim_end_matches('/').to_string();
        }
    }
    if let Some(org) = lookup("WHIZDESK_ORG_ID") {
        match org.trim().parse::<u64>() {
            Ok(id) => cfg.organization_id = id,
            Err(_) => log::warn!("Ignoring non-numeric WHIZDESK_ORG_ID: {}", org),
        }
    }
    if let Some(token) = lookup("WHIZDESK_TOKEN") {
        if !token.trim().is_empty() {
            cfg.auth_token = Some(token.trim().to_string());
        }
    }
    cfg
}

/// Validate that the configured base URL is actually a URL.
pub fn validate(cfg: &Config) -> Result<(), ApiError> {
    Url::parse(&cfg.api_base_url)
        .map(|_| ())
        .map_err(|e| ApiError::Config(format!("invalid apiBaseUrl {:?}: {}", cfg.api_base_url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let cfg = load_from(Path::new("/nonexistent/whizdesk/config.json"));
        assert_eq!(cfg.api_base_url, "http://localhost:3001");
        assert_eq!(cfg.organization_id, 1);
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut f = std::fs::File::create(&path).expect("create");
        write!(f, r#"{{"apiBaseUrl": "https://hr.example.com", "organizationId": 7}}"#)
            .expect("write");

        let cfg = load_from(&path);
        assert_eq!(cfg.api_base_url, "https://hr.example.com");
        assert_eq!(cfg.organization_id, 7);
        // untouched fields keep their defaults
        assert_eq!(cfg.delayed_threshold_days, 3);
    }

    #[test]
    fn test_load_from_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").expect("write");

        let cfg = load_from(&path);
        assert_eq!(cfg.organization_id, 1);
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let cfg = apply_overrides(Config::default(), |key| match key {
            "WHIZDESK_API_URL" => Some("https://api.example.com/".to_string()),
            "WHIZDESK_ORG_ID" => Some("42".to_string()),
            _ => None,
        });
        assert_eq!(cfg.api_base_url, "https://api.example.com");
        assert_eq!(cfg.organization_id, 42);
        assert!(cfg.auth_token.is_none());
    }

    #[test]
    fn test_non_numeric_org_override_ignored() {
        let cfg = apply_overrides(Config::default(), |key| match key {
            "WHIZDESK_ORG_ID" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(cfg.organization_id, 1);
    }

    #[test]
    fn test_validate_rejects_garbage_url() {
        let mut cfg = Config::default();
        cfg.api_base_url = "not a url".to_string();
        assert!(validate(&cfg).is_err());
        cfg.api_base_url = "http://localhost:3001".to_string();
        assert!(validate(&cfg).is_ok());
    }
}
