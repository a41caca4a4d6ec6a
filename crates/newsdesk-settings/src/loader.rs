//! Settings loading: file → deep-merge over defaults → env overrides.

use std::env;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::NewsdeskSettings;

/// Default settings file location: `~/.newsdesk/settings.json`.
///
/// Falls back to a relative `settings.json` when `HOME` is unset (CI,
/// containers).
#[must_use]
pub fn settings_path() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || PathBuf::from("settings.json"),
        |home| PathBuf::from(home).join(".newsdesk").join("settings.json"),
    )
}

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key-by-key; any other value (including arrays) in the
/// overlay replaces the base value wholesale.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path.
pub fn load_settings() -> Result<NewsdeskSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file path.
///
/// A missing file is not an error — defaults (plus env overrides) apply.
/// A present-but-malformed file is an error; the caller decides whether to
/// fall back to defaults.
pub fn load_settings_from_path(path: &Path) -> Result<NewsdeskSettings> {
    let defaults = serde_json::to_value(NewsdeskSettings::default())
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_value: Value =
            serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        deep_merge(defaults, file_value)
    } else {
        defaults
    };

    let mut settings: NewsdeskSettings =
        serde_json::from_value(merged).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Apply `NEWSDESK_*` environment variable overrides (highest priority).
fn apply_env_overrides(settings: &mut NewsdeskSettings) {
    if let Ok(path) = env::var("NEWSDESK_STORAGE_PATH") {
        settings.storage.path = PathBuf::from(path);
    }
    if let Ok(hour) = env::var("NEWSDESK_DIGEST_HOUR")
        && let Ok(hour) = hour.parse()
    {
        settings.digest.hour = hour;
    }
    if let Ok(minute) = env::var("NEWSDESK_DIGEST_MINUTE")
        && let Ok(minute) = minute.parse()
    {
        settings.digest.minute = minute;
    }
    if let Ok(tz) = env::var("NEWSDESK_DIGEST_TIMEZONE") {
        settings.digest.timezone = tz;
    }
    if let Ok(level) = env::var("NEWSDESK_LOG") {
        settings.logging.level = level;
    }
    if let Ok(token) = env::var("NEWSDESK_GATEWAY_TOKEN") {
        settings.gateway.token = Some(token);
    }
}

/// Range checks the type system cannot express.
fn validate(settings: &NewsdeskSettings) -> Result<()> {
    if settings.digest.hour > 23 {
        return Err(SettingsError::Invalid {
            reason: format!("digest.hour must be 0-23, got {}", settings.digest.hour),
        });
    }
    if settings.digest.minute > 59 {
        return Err(SettingsError::Invalid {
            reason: format!("digest.minute must be 0-59, got {}", settings.digest.minute),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_nested_objects() {
        let base = serde_json::json!({"digest": {"hour": 7, "minute": 30}});
        let overlay = serde_json::json!({"digest": {"hour": 9}});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["digest"]["hour"], 9);
        assert_eq!(merged["digest"]["minute"], 30);
    }

    #[test]
    fn deep_merge_arrays_replace() {
        let base = serde_json::json!({"xs": [1, 2, 3]});
        let overlay = serde_json::json!({"xs": [9]});
        assert_eq!(deep_merge(base, overlay)["xs"], serde_json::json!([9]));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_from_path(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.digest.hour, 7);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"digest": {"hour": 21, "timezone": "Europe/Moscow"}}"#)
            .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.digest.hour, 21);
        assert_eq!(settings.digest.timezone, "Europe/Moscow");
        assert_eq!(settings.digest.minute, 30, "unset fields keep defaults");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn out_of_range_hour_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"digest": {"hour": 24}}"#).unwrap();

        let err = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }
}
