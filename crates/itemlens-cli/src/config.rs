// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use itemlens_table::{DEFAULT_OUTPUT_FILE, DEFAULT_TITLE};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "30s";
const DEFAULT_FIELDS: [&str; 2] = ["Description", "Labels"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub export: Export,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            service: Service::default(),
            export: Export::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    pub output: Option<String>,
    pub title: Option<String>,
    pub fields: Option<Vec<String>>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ITEMLENS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ITEMLENS_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join("itemlens");
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
                    "config file {} is not versioned. Add `version = 1` and place values under [service] and [export]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
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
        if let Some(timeout) = &self.service.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "service.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(output) = &self.export.output
            && output.trim().is_empty()
        {
            bail!("export.output in {} must not be blank", path.display());
        }

        if let Some(fields) = &self.export.fields
            && fields.iter().any(|field| field.trim().is_empty())
        {
            bail!("export.fields in {} must not contain blank names", path.display());
        }

        Ok(())
    }

    pub fn service_base_url(&self) -> Option<&str> {
        self.service
            .base_url
            .as_deref()
            .map(|base_url| base_url.trim_end_matches('/'))
    }

    pub fn service_token(&self) -> Option<&str> {
        self.service.token.as_deref()
    }

    pub fn service_project(&self) -> Option<&str> {
        self.service.project.as_deref()
    }

    pub fn service_timeout(&self) -> Result<Duration> {
        parse_duration(self.service.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn export_output(&self) -> &str {
        self.export.output.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    pub fn export_title(&self) -> &str {
        self.export.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn export_fields(&self) -> Vec<String> {
        match &self.export.fields {
            Some(fields) => fields.clone(),
            None => DEFAULT_FIELDS.iter().map(|field| (*field).to_owned()).collect(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# itemlens config\n# Place this file at: {}\n\nversion = 1\n\n[service]\n# base_url = \"https://tracker.example.com/rest\"\n# token = \"your-api-token\"\n# project = \"PROJ\"\ntimeout = \"{}\"\n\n[export]\noutput = \"{}\"\ntitle = \"{}\"\nfields = [\"Description\", \"Labels\"]\n",
            path.display(),
            DEFAULT_TIMEOUT,
            DEFAULT_OUTPUT_FILE,
            DEFAULT_TITLE,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 30s)")
}
