#![forbid(unsafe_code)]

//! Tunables for the active-section engine.
//!
//! Every timing and offset the engine uses lives in [`SpyConfig`], so hosts can
//! retune without code changes. With the `config` feature the struct loads from
//! TOML or JSON; missing keys fall back to the defaults.
//!
//! ```toml
//! # folio.toml
//! header_offset_px = 150.0
//! hover_grace_ms = 100
//! quiet_period_ms = 1000
//!
//! [band]
//! top = 0.2
//! bottom = 0.6
//! ```
//!
//! ```rust,ignore
//! let config = SpyConfig::from_toml_file("folio.toml")?;
//! ```

use core::time::Duration;
#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use folio_core::{BandInsets, DEFAULT_DOCUMENT_ORDER, SectionId};

/// Engine configuration. `Default` is the site's shipped behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SpyConfig {
    /// Added to the scroll offset before picking the section under the header.
    pub header_offset_px: f64,
    /// Subtracted from a section's top when navigating, to clear the sticky
    /// header.
    pub nav_scroll_offset_px: f64,
    /// Observation band, as fractions of the viewport height.
    pub band: BandInsets,
    /// Delay between pointer leave and clearing hover intent.
    pub hover_grace_ms: u64,
    /// Quiet period that closes a suppression window after the last motion.
    pub quiet_period_ms: u64,
    /// Delay between a navigation request and focusing the target.
    pub focus_delay_ms: u64,
    /// Entries kept in the arbiter's dispatch log.
    pub log_capacity: usize,
    /// Section ids, top to bottom.
    pub document_order: Vec<String>,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            header_offset_px: 150.0,
            nav_scroll_offset_px: 100.0,
            band: BandInsets::default(),
            hover_grace_ms: 100,
            quiet_period_ms: 1000,
            focus_delay_ms: 300,
            log_capacity: 64,
            document_order: DEFAULT_DOCUMENT_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SpyConfig {
    #[must_use]
    pub fn hover_grace(&self) -> Duration {
        Duration::from_millis(self.hover_grace_ms)
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    #[must_use]
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    /// Declared document order as ids.
    #[must_use]
    pub fn section_order(&self) -> Vec<SectionId> {
        self.document_order.iter().map(SectionId::new).collect()
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.header_offset_px.is_finite() {
            errors.push(format!(
                "header_offset_px must be finite, got {}",
                self.header_offset_px
            ));
        }
        if !self.nav_scroll_offset_px.is_finite() {
            errors.push(format!(
                "nav_scroll_offset_px must be finite, got {}",
                self.nav_scroll_offset_px
            ));
        }
        if !self.band.is_valid() {
            errors.push(format!(
                "band insets must be in [0, 1) and sum below 1, got top={} bottom={}",
                self.band.top, self.band.bottom
            ));
        }
        if self.hover_grace_ms == 0 {
            errors.push("hover_grace_ms must be > 0".into());
        }
        if self.quiet_period_ms == 0 {
            errors.push("quiet_period_ms must be > 0".into());
        }
        if self.log_capacity == 0 {
            errors.push("log_capacity must be > 0".into());
        }
        for (idx, id) in self.document_order.iter().enumerate() {
            if !SectionId::new(id).is_well_formed() {
                errors.push(format!("document_order[{idx}] is not a valid section id: {id:?}"));
            }
            if self.document_order[..idx].contains(id) {
                errors.push(format!("document_order[{idx}] duplicates {id:?}"));
            }
        }

        errors
    }

    /// Return `self` if valid, otherwise every violation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors from loading a [`SpyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("failed to write TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[cfg(feature = "config")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SpyConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.hover_grace(), Duration::from_millis(100));
        assert_eq!(config.quiet_period(), Duration::from_millis(1000));
        assert_eq!(config.focus_delay(), Duration::from_millis(300));
        assert_eq!(
            config.section_order(),
            ["home", "profile", "experience", "contact"].map(SectionId::from)
        );
    }

    #[test]
    fn validation_collects_every_violation() {
        let config = SpyConfig {
            header_offset_px: f64::NAN,
            band: BandInsets::new(0.7, 0.5),
            hover_grace_ms: 0,
            quiet_period_ms: 0,
            log_capacity: 0,
            document_order: vec!["home".into(), "home".into(), "bad id".into()],
            ..SpyConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 7, "{errors:?}");
    }

    #[test]
    fn validated_reports_errors() {
        let config = SpyConfig {
            quiet_period_ms: 0,
            ..SpyConfig::default()
        };
        match config.validated() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec!["quiet_period_ms must be > 0".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "config validation failed: a; b");
    }
}
