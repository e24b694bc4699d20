//! Sync configuration at ~/.config/busyblock/config.toml
//!
//! Loaded once at startup, validated, and handed to the reconciler as plain
//! values. Nothing here is mutated after load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{BusyBlockError, BusyBlockResult};
use crate::filter::EligibilityFilter;
use crate::matching::{DuplicatePolicy, MatchingMode};
use crate::reconciler::{DescriptionPolicy, PlaceholderTemplate, SyncSettings};
use crate::remote::RemoteProvider;

const DEFAULT_LOOKAHEAD_DAYS: u32 = 3;
const DEFAULT_BUSY_TITLE: &str = "Busy";
/// Google Calendar's "Tangerine"
const DEFAULT_BUSY_COLOR_ID: &str = "6";
const DEFAULT_IGNORE_BEFORE_HOUR: u32 = 8;
const DEFAULT_IGNORE_AFTER_HOUR: u32 = 23;

fn default_lookahead_days() -> u32 {
    DEFAULT_LOOKAHEAD_DAYS
}

/// One calendar on one provider account.
///
/// Keys other than `provider` and `calendar_id` are provider-specific
/// (e.g. `google_account`) and are forwarded to the provider untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub provider: String,
    pub calendar_id: String,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl CalendarConfig {
    /// Provider params as JSON for the provider protocol.
    pub fn remote_params(&self) -> serde_json::Map<String, serde_json::Value> {
        self.params
            .iter()
            .filter_map(|(key, value)| {
                serde_json::to_value(value)
                    .ok()
                    .map(|json| (key.clone(), json))
            })
            .collect()
    }

    pub fn remote(&self) -> RemoteProvider {
        RemoteProvider::new(&self.provider, self.remote_params())
    }

    fn validate(&self, role: &str) -> BusyBlockResult<()> {
        if self.provider.trim().is_empty() {
            return Err(BusyBlockError::Config(format!("[{role}] provider is empty")));
        }
        if self.calendar_id.trim().is_empty() {
            return Err(BusyBlockError::Config(format!("[{role}] calendar_id is empty")));
        }
        Ok(())
    }

    fn is_same_calendar(&self, other: &CalendarConfig) -> bool {
        self.provider == other.provider
            && self.calendar_id == other.calendar_id
            && self.params == other.params
    }
}

#[derive(Debug, Default, Deserialize)]
struct PlaceholderConfig {
    title: Option<String>,
    color_id: Option<String>,
    description: Option<DescriptionPolicy>,
    #[serde(default)]
    use_default_reminders: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FilterConfig {
    ignore_before_hour: Option<u32>,
    ignore_after_hour: Option<u32>,
    ignore_weekends: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingConfig {
    #[serde(default)]
    mode: MatchingMode,
    #[serde(default)]
    duplicates: DuplicatePolicy,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default = "default_lookahead_days")]
    lookahead_days: u32,
    timezone: Option<String>,
    source: CalendarConfig,
    destination: CalendarConfig,
    #[serde(default)]
    placeholder: PlaceholderConfig,
    #[serde(default)]
    filter: FilterConfig,
    #[serde(default)]
    matching: MatchingConfig,
}

/// Validated configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub lookahead_days: u32,
    pub source: CalendarConfig,
    pub destination: CalendarConfig,
    pub settings: SyncSettings,
}

impl SyncConfig {
    /// Default location: ~/.config/busyblock/config.toml
    pub fn default_path() -> BusyBlockResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BusyBlockError::Config("Could not determine config directory".into()))?
            .join("busyblock");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve an optional `--config` override (with `~` expansion) or the default path.
    pub fn resolve_path(path: Option<&str>) -> BusyBlockResult<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(shellexpand::tilde(p).as_ref())),
            None => Self::default_path(),
        }
    }

    /// Load and validate the config file at `path`.
    ///
    /// `fallback_timezone` applies when the file sets no `timezone`.
    pub fn load(path: &Path, fallback_timezone: Tz) -> BusyBlockResult<Self> {
        if !path.exists() {
            return Err(BusyBlockError::Config(format!(
                "Config file not found at {}\n\nCreate one with:\n  busyblock init",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content, fallback_timezone)
            .map_err(|e| BusyBlockError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str, fallback_timezone: Tz) -> BusyBlockResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| BusyBlockError::Config(e.to_string()))?;

        file.source.validate("source")?;
        file.destination.validate("destination")?;
        if file.source.is_same_calendar(&file.destination) {
            return Err(BusyBlockError::Config(
                "source and destination are the same calendar".into(),
            ));
        }

        if file.lookahead_days == 0 {
            return Err(BusyBlockError::Config("lookahead_days must be at least 1".into()));
        }

        let timezone = match &file.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| BusyBlockError::Config(format!("Unknown timezone '{name}'")))?,
            None => fallback_timezone,
        };

        let ignore_before_hour = file
            .filter
            .ignore_before_hour
            .unwrap_or(DEFAULT_IGNORE_BEFORE_HOUR);
        let ignore_after_hour = file
            .filter
            .ignore_after_hour
            .unwrap_or(DEFAULT_IGNORE_AFTER_HOUR);
        for (key, hour) in [
            ("ignore_before_hour", ignore_before_hour),
            ("ignore_after_hour", ignore_after_hour),
        ] {
            if hour > 24 {
                return Err(BusyBlockError::Config(format!(
                    "[filter] {key} must be between 0 and 24, got {hour}"
                )));
            }
        }

        let title = file
            .placeholder
            .title
            .unwrap_or_else(|| DEFAULT_BUSY_TITLE.to_string());
        if title.trim().is_empty() {
            return Err(BusyBlockError::Config("[placeholder] title is empty".into()));
        }

        let mode = file.matching.mode;
        let description = file.placeholder.description.unwrap_or(match mode {
            MatchingMode::TitleCorrelated => DescriptionPolicy::Copy,
            MatchingMode::FixedTitle => DescriptionPolicy::Omit,
        });

        let color_id = match file.placeholder.color_id {
            Some(id) if id.is_empty() => None,
            Some(id) => Some(id),
            None => Some(DEFAULT_BUSY_COLOR_ID.to_string()),
        };

        Ok(SyncConfig {
            lookahead_days: file.lookahead_days,
            source: file.source,
            destination: file.destination,
            settings: SyncSettings {
                matching: mode,
                duplicates: file.matching.duplicates,
                template: PlaceholderTemplate {
                    title,
                    color_id,
                    description,
                    use_default_reminders: file.placeholder.use_default_reminders,
                },
                filter: EligibilityFilter {
                    ignore_before_hour,
                    ignore_after_hour,
                    ignore_weekends: file.filter.ignore_weekends.unwrap_or(true),
                    timezone,
                },
            },
        })
    }

    /// Write a starter config file with every option documented.
    pub fn create_default_config(path: &Path) -> BusyBlockResult<()> {
        let contents = format!(
            "\
# busyblock configuration

# How many days ahead to block off time:
# lookahead_days = {DEFAULT_LOOKAHEAD_DAYS}

# Time zone for the hour and weekend rules (defaults to this machine's zone):
# timezone = \"America/New_York\"

# Calendar whose events are mirrored (never written to):
[source]
provider = \"google\"
google_account = \"you@work.example.com\"
calendar_id = \"you@work.example.com\"

# Calendar that receives the placeholders:
[destination]
provider = \"google\"
google_account = \"you@personal.example.com\"
calendar_id = \"primary\"

[placeholder]
# title = \"{DEFAULT_BUSY_TITLE}\"
# color_id = \"{DEFAULT_BUSY_COLOR_ID}\"
# Copy the source description onto placeholders (\"copy\" or \"omit\"):
# description = \"omit\"
# use_default_reminders = false

[filter]
# Ignore events that end at or before this hour (24h clock):
# ignore_before_hour = {DEFAULT_IGNORE_BEFORE_HOUR}
# Ignore events that start at or after this hour:
# ignore_after_hour = {DEFAULT_IGNORE_AFTER_HOUR}
# ignore_weekends = true

[matching]
# \"fixed_title\": placeholders are all titled with the busy title
# \"title_correlated\": placeholders copy the source title; a destination
#   event sharing a source title but not its time is treated as stale
# mode = \"fixed_title\"
# When several placeholders match one source event:
# \"update_all\" keeps them all, \"keep_first\" deletes the extras
# duplicates = \"update_all\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BusyBlockError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BusyBlockError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[source]
provider = "google"
google_account = "me@work.example.com"
calendar_id = "me@work.example.com"

[destination]
provider = "google"
google_account = "me@gmail.com"
calendar_id = "primary"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = SyncConfig::from_toml(MINIMAL, Tz::Europe__Paris).unwrap();

        assert_eq!(config.lookahead_days, 3);
        assert_eq!(config.settings.matching, MatchingMode::FixedTitle);
        assert_eq!(config.settings.duplicates, DuplicatePolicy::UpdateAll);
        assert_eq!(config.settings.template.title, "Busy");
        assert_eq!(config.settings.template.color_id.as_deref(), Some("6"));
        assert_eq!(config.settings.template.description, DescriptionPolicy::Omit);
        assert!(!config.settings.template.use_default_reminders);
        assert_eq!(config.settings.filter.ignore_before_hour, 8);
        assert_eq!(config.settings.filter.ignore_after_hour, 23);
        assert!(config.settings.filter.ignore_weekends);
        assert_eq!(config.settings.filter.timezone, Tz::Europe__Paris);
    }

    #[test]
    fn test_provider_params_are_forwarded() {
        let config = SyncConfig::from_toml(MINIMAL, Tz::UTC).unwrap();
        let params = config.destination.remote_params();

        assert_eq!(params.len(), 1);
        assert_eq!(params["google_account"], "me@gmail.com");
        assert_eq!(config.destination.remote().name(), "google");
    }

    #[test]
    fn test_full_config() {
        let content = format!(
            r#"
lookahead_days = 14
timezone = "America/Chicago"

[placeholder]
title = "Blocked"
color_id = ""
use_default_reminders = true

[filter]
ignore_before_hour = 9
ignore_after_hour = 17
ignore_weekends = false

[matching]
mode = "title_correlated"
duplicates = "keep_first"
{MINIMAL}"#
        );
        let config = SyncConfig::from_toml(&content, Tz::UTC).unwrap();
        let settings = &config.settings;

        assert_eq!(config.lookahead_days, 14);
        assert_eq!(settings.matching, MatchingMode::TitleCorrelated);
        assert_eq!(settings.duplicates, DuplicatePolicy::KeepFirst);
        assert_eq!(settings.template.title, "Blocked");
        assert_eq!(settings.template.color_id, None);
        assert_eq!(settings.template.description, DescriptionPolicy::Copy);
        assert!(settings.template.use_default_reminders);
        assert_eq!(settings.filter.ignore_before_hour, 9);
        assert_eq!(settings.filter.ignore_after_hour, 17);
        assert!(!settings.filter.ignore_weekends);
        assert_eq!(settings.filter.timezone, Tz::America__Chicago);
    }

    #[test]
    fn test_same_source_and_destination_is_rejected() {
        let content = r#"
[source]
provider = "google"
calendar_id = "primary"

[destination]
provider = "google"
calendar_id = "primary"
"#;
        let err = SyncConfig::from_toml(content, Tz::UTC).unwrap_err();
        assert!(err.to_string().contains("same calendar"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            format!("lookahead_days = 0\n{MINIMAL}"),
            format!("timezone = \"Mars/Olympus\"\n{MINIMAL}"),
            format!("{MINIMAL}\n[filter]\nignore_after_hour = 25\n"),
            format!("[placeholder]\ntitle = \" \"\n{MINIMAL}"),
            format!("[matching]\nmode = \"fuzzy\"\n{MINIMAL}"),
            MINIMAL.replace("calendar_id = \"primary\"", "calendar_id = \"\""),
            MINIMAL.replace("[destination]", "[elsewhere]"),
        ];

        for content in cases {
            let result = SyncConfig::from_toml(&content, Tz::UTC);
            assert!(
                matches!(result, Err(BusyBlockError::Config(_))),
                "accepted invalid config:\n{content}"
            );
        }
    }

    #[test]
    fn test_default_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        SyncConfig::create_default_config(&path).unwrap();
        let config = SyncConfig::load(&path, Tz::UTC).unwrap();

        assert_eq!(config.source.calendar_id, "you@work.example.com");
        assert_eq!(config.destination.calendar_id, "primary");
        assert_eq!(config.lookahead_days, 3);
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyncConfig::load(&dir.path().join("absent.toml"), Tz::UTC).unwrap_err();
        assert!(matches!(err, BusyBlockError::Config(msg) if msg.contains("busyblock init")));
    }

    #[test]
    fn test_resolve_path_expands_home() {
        let path = SyncConfig::resolve_path(Some("/etc/busyblock.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/etc/busyblock.toml"));

        if let Some(home) = dirs::home_dir() {
            let path = SyncConfig::resolve_path(Some("~/busyblock.toml")).unwrap();
            assert_eq!(path, home.join("busyblock.toml"));
        }
    }
}
