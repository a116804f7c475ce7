// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use leadgen_app::{LeadSortField, Section, SenderProfile, SortDirection, SortSpec};
use leadgen_assist::{
    Assistant, DEFAULT_CHAT_DELAY, DEFAULT_DRAFT_DELAY, DEFAULT_GENERATION_DELAY,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "leadgen=info";
const LOG_FILE_NAME: &str = "leadgen.log";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub assist: Assist,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            assist: Assist::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_section: Option<String>,
    pub start_path: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_section: Some(Section::Generate.as_str().to_owned()),
            start_path: None,
            sort_field: Some(LeadSortField::Score.as_str().to_owned()),
            sort_direction: Some(SortDirection::Desc.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assist {
    pub generation_delay: Option<String>,
    pub chat_delay: Option<String>,
    pub draft_delay: Option<String>,
    pub sender_name: Option<String>,
    pub sender_company: Option<String>,
}

impl Default for Assist {
    fn default() -> Self {
        Self {
            generation_delay: Some("2s".to_owned()),
            chat_delay: Some("1500ms".to_owned()),
            draft_delay: Some("600ms".to_owned()),
            sender_name: None,
            sender_company: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("LEADGEN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set LEADGEN_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(leadgen_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [storage], [ui], [assist], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `leadgen --print-example-config` for the current schema",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            leadgen_store::validate_db_path(db_path)?;
        }

        if let Some(section) = &self.ui.start_section
            && Section::parse(section).is_none()
        {
            bail!(
                "ui.start_section in {} must be one of generate, leads, campaigns, outreach, analytics, templates; got {section:?}",
                path.display()
            );
        }

        if let Some(start_path) = &self.ui.start_path
            && !start_path.starts_with('/')
        {
            bail!(
                "ui.start_path in {} must be an absolute path such as \"/about\"; got {start_path:?}",
                path.display()
            );
        }

        if let Some(field) = &self.ui.sort_field
            && LeadSortField::parse(field).is_none()
        {
            let allowed = LeadSortField::ALL
                .iter()
                .map(|field| field.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "ui.sort_field in {} must be one of {allowed}; got {field:?}",
                path.display()
            );
        }

        if let Some(direction) = &self.ui.sort_direction
            && SortDirection::parse(direction).is_none()
        {
            bail!(
                "ui.sort_direction in {} must be asc or desc; got {direction:?}",
                path.display()
            );
        }

        for (key, value) in [
            ("assist.generation_delay", &self.assist.generation_delay),
            ("assist.chat_delay", &self.assist.chat_delay),
            ("assist.draft_delay", &self.assist.draft_delay),
        ] {
            if let Some(raw) = value {
                parse_duration(raw).with_context(|| format!("{key} in {}", path.display()))?;
            }
        }

        if let Some(level) = &self.logging.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "logging.level in {} is not a valid filter (for example \"info\" or \"leadgen=debug\")",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => leadgen_store::default_db_path(),
        }
    }

    pub fn start_section(&self) -> Section {
        self.ui
            .start_section
            .as_deref()
            .and_then(Section::parse)
            .unwrap_or(Section::Generate)
    }

    /// Public page shown at launch when no session is stored.
    pub fn start_path(&self) -> Option<&str> {
        self.ui.start_path.as_deref()
    }

    pub fn sort_spec(&self) -> SortSpec {
        let default = SortSpec::default();
        SortSpec {
            field: self
                .ui
                .sort_field
                .as_deref()
                .and_then(LeadSortField::parse)
                .unwrap_or(default.field),
            direction: self
                .ui
                .sort_direction
                .as_deref()
                .and_then(SortDirection::parse)
                .unwrap_or(default.direction),
        }
    }

    pub fn assistant(&self) -> Result<Assistant> {
        let delay = |raw: &Option<String>, fallback: Duration| -> Result<Duration> {
            raw.as_deref().map_or(Ok(fallback), parse_duration)
        };
        Ok(Assistant::new(
            delay(&self.assist.generation_delay, DEFAULT_GENERATION_DELAY)?,
            delay(&self.assist.chat_delay, DEFAULT_CHAT_DELAY)?,
            delay(&self.assist.draft_delay, DEFAULT_DRAFT_DELAY)?,
        ))
    }

    pub fn sender_profile(&self) -> SenderProfile {
        let default = SenderProfile::default();
        SenderProfile {
            name: self
                .assist
                .sender_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(default.name),
            company: self
                .assist
                .sender_company
                .clone()
                .filter(|company| !company.trim().is_empty())
                .unwrap_or(default.company),
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.logging.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [logging].file to a writable log path")
        })?;
        Ok(data_root.join(leadgen_store::APP_NAME).join(LOG_FILE_NAME))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# leadgen config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/leadgen/session.db)\n# db_path = \"/absolute/path/to/session.db\"\n\n[ui]\n# generate | leads | campaigns | outreach | analytics | templates\nstart_section = \"generate\"\n# Optional. Page shown when signed out: / | /home | /about | /blog | /settings\n# start_path = \"/home\"\n# name | title | company | industry | score | generated_at\nsort_field = \"score\"\nsort_direction = \"desc\"\n\n[assist]\ngeneration_delay = \"2s\"\nchat_delay = \"1500ms\"\ndraft_delay = \"600ms\"\n# sender_name = \"Your Name\"\n# sender_company = \"Your Company\"\n\n[logging]\nlevel = \"{}\"\n# file = \"/absolute/path/to/{}\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
            LOG_FILE_NAME,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 2s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use leadgen_app::{LeadSortField, Section, SenderProfile, SortDirection};
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_section(), Section::Generate);
        assert_eq!(config.sort_spec().field, LeadSortField::Score);
        assert_eq!(config.sort_spec().direction, SortDirection::Desc);
        assert_eq!(config.log_level(), "leadgen=info");
        assert_eq!(config.sender_profile(), SenderProfile::default());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nstart_section = \"leads\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage], [ui], [assist], and [logging]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\ndb_path = \"/tmp/leadgen-session.db\"\n[ui]\nstart_section = \"outreach\"\nstart_path = \"/about\"\nsort_field = \"company\"\nsort_direction = \"asc\"\n[assist]\ngeneration_delay = \"250ms\"\nchat_delay = \"1s\"\ndraft_delay = \"0s\"\nsender_name = \"Riley\"\nsender_company = \"Northwind\"\n[logging]\nlevel = \"leadgen=debug\"\nfile = \"/tmp/leadgen-test.log\"\n",
        )?;
        let config = Config::load(&path)?;

        assert_eq!(config.db_path()?, PathBuf::from("/tmp/leadgen-session.db"));
        assert_eq!(config.start_section(), Section::Outreach);
        assert_eq!(config.start_path(), Some("/about"));
        assert_eq!(config.sort_spec().field, LeadSortField::Company);
        assert_eq!(config.sort_spec().direction, SortDirection::Asc);

        let assistant = config.assistant()?;
        assert_eq!(assistant.generation_delay(), Duration::from_millis(250));
        assert_eq!(assistant.chat_delay(), Duration::from_secs(1));
        assert_eq!(assistant.draft_delay(), Duration::ZERO);

        let sender = config.sender_profile();
        assert_eq!(sender.name, "Riley");
        assert_eq!(sender.company, "Northwind");
        assert_eq!(config.log_level(), "leadgen=debug");
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/leadgen-test.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_ui_values_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_section = \"inbox\"\n")?;
        let error = Config::load(&path).expect_err("unknown section should fail");
        assert!(error.to_string().contains("ui.start_section"));

        let (_temp, path) = write_config("version = 1\n[ui]\nstart_path = \"about\"\n")?;
        let error = Config::load(&path).expect_err("relative start path should fail");
        assert!(error.to_string().contains("ui.start_path"));

        let (_temp, path) = write_config("version = 1\n[ui]\nsort_field = \"revenue\"\n")?;
        let error = Config::load(&path).expect_err("unknown sort field should fail");
        assert!(error.to_string().contains("generated_at"));

        let (_temp, path) = write_config("version = 1\n[ui]\nsort_direction = \"up\"\n")?;
        let error = Config::load(&path).expect_err("unknown direction should fail");
        assert!(error.to_string().contains("asc or desc"));
        Ok(())
    }

    #[test]
    fn invalid_delay_is_rejected_with_key_name() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[assist]\nchat_delay = \"soon\"\n")?;
        let error = Config::load(&path).expect_err("bad delay should fail");
        assert!(format!("{error:#}").contains("assist.chat_delay"));
        Ok(())
    }

    #[test]
    fn blank_sender_falls_back_to_default() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[assist]\nsender_name = \"  \"\nsender_company = \"Acme\"\n")?;
        let config = Config::load(&path)?;
        let sender = config.sender_profile();
        assert_eq!(sender.name, SenderProfile::default().name);
        assert_eq!(sender.company, "Acme");
        Ok(())
    }

    #[test]
    fn parse_duration_accepts_supported_units() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("2s")?, Duration::from_secs(2));
        assert_eq!(parse_duration("3m")?, Duration::from_secs(180));
        assert!(parse_duration("2h").is_err());
        assert!(parse_duration("ms").is_err());
        Ok(())
    }

    #[test]
    fn example_config_round_trips() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_section(), Section::Generate);
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("LEADGEN_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("LEADGEN_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn db_path_prefers_storage_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"/explicit/from-config.db\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("LEADGEN_DB_PATH", "/from/env.db");
        }
        let config = Config::load(&path)?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("LEADGEN_DB_PATH");
        }
        assert_eq!(config.db_path()?, PathBuf::from("/explicit/from-config.db"));
        Ok(())
    }

    #[test]
    fn db_path_uses_env_override_when_storage_db_path_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("LEADGEN_DB_PATH", "/from/env-only.db");
        }
        let config = Config::load(&path)?;
        let resolved = config.db_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("LEADGEN_DB_PATH");
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.db"));
        Ok(())
    }
}
