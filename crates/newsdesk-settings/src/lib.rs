//! # newsdesk-settings
//!
//! Configuration management with layered sources for the Newsdesk service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`NewsdeskSettings::default()`]
//! 2. **User file** — `~/.newsdesk/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `NEWSDESK_*` overrides (highest priority)
//!
//! All configuration is read once at process start and handed to each
//! component by its constructor; there is no runtime reconfiguration
//! surface and no global settings state.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
