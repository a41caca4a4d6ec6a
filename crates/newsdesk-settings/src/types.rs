//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial settings file is valid — missing fields get their production
//! default during deserialization.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings for the Newsdesk service.
///
/// Loaded from `~/.newsdesk/settings.json` with defaults applied for
/// missing fields; `NEWSDESK_*` environment variables override specific
/// values. All configuration is supplied at process start — there is no
/// runtime reconfiguration surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsdeskSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Durable storage location.
    pub storage: StorageSettings,
    /// Daily digest schedule.
    pub digest: DigestSettings,
    /// Multi-step submission session behavior.
    pub submission: SubmissionSettings,
    /// Outbound delivery behavior.
    pub delivery: DeliverySettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Messaging-gateway credential.
    pub gateway: GatewaySettings,
}

impl Default for NewsdeskSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "newsdesk".to_string(),
            storage: StorageSettings::default(),
            digest: DigestSettings::default(),
            submission: SubmissionSettings::default(),
            delivery: DeliverySettings::default(),
            logging: LoggingSettings::default(),
            gateway: GatewaySettings::default(),
        }
    }
}

/// Durable storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Path of the JSON state file.
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("newsdesk.json"),
        }
    }
}

/// Daily digest schedule settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigestSettings {
    /// Whether the daily digest is sent at all.
    pub enabled: bool,
    /// Local fire hour (0–23).
    pub hour: u32,
    /// Local fire minute (0–59).
    pub minute: u32,
    /// Civil timezone for the schedule: an IANA name
    /// (`"Europe/Moscow"`) or a fixed offset (`"+03:00"`).
    pub timezone: String,
}

impl Default for DigestSettings {
    fn default() -> Self {
        // 07:30 at a fixed +03:00 offset.
        Self {
            enabled: true,
            hour: 7,
            minute: 30,
            timezone: "+03:00".to_string(),
        }
    }
}

/// Pending-submission session settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionSettings {
    /// Seconds before an unfinished multi-step submission is dropped.
    pub timeout_secs: u64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self { timeout_secs: 600 }
    }
}

/// Outbound delivery settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliverySettings {
    /// Per-recipient delivery timeout during digest fan-out, in seconds.
    pub timeout_secs: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter directive (overridden by `NEWSDESK_LOG`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Messaging-gateway settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewaySettings {
    /// Transport credential, if the deployment wires a real gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
