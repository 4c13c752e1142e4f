//! Tap configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::render::{RenderOptions, DEFAULT_FILE_BASE_URL};
use crate::stream::StreamKind;

/// What a sync does with a node whose blocks fail to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderErrorPolicy {
    /// Abort the sync
    #[default]
    Fail,
    /// Log the failure and drop the record
    Skip,
}

/// Configuration loaded from the tap's JSON config file.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    /// Restrict the sync to a single stream
    pub stream_name: Option<String>,

    /// Database host
    pub edgedb_host: Option<String>,

    /// Database port
    pub edgedb_port: Option<u16>,

    /// Database user
    pub edgedb_user: Option<String>,

    /// Database branch
    pub edgedb_branch: Option<String>,

    /// Database name
    pub edgedb_database: Option<String>,

    /// Database password
    pub edgedb_password: Option<String>,

    /// Database secret key
    pub edgedb_secret_key: Option<String>,

    /// TLS security mode (e.g. "strict", "insecure")
    pub edgedb_client_tls_security: Option<String>,

    /// Replicate records at or after this instant when no bookmark exists
    pub start_date: Option<DateTime<Utc>>,

    /// Base URL for stored file keys
    pub file_base_url: Option<String>,

    /// Handling of render failures
    pub on_render_error: RenderErrorPolicy,
}

impl TapConfig {
    /// Load and validate a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse and validate config JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: TapConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.stream_name {
            name.parse::<StreamKind>()?;
        }
        if let Some(ref url) = self.file_base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(Error::InvalidConfig(format!(
                    "file_base_url must be an http(s) URL, got `{}`",
                    url
                )));
            }
        }
        if let Some(ref mode) = self.edgedb_client_tls_security {
            if !matches!(
                mode.as_str(),
                "strict" | "no_host_verification" | "insecure" | "default"
            ) {
                return Err(Error::InvalidConfig(format!(
                    "unknown edgedb_client_tls_security `{}`",
                    mode
                )));
            }
        }
        Ok(())
    }

    /// Streams selected for the sync, in emission order.
    pub fn selected_streams(&self) -> Result<Vec<StreamKind>> {
        match self.stream_name {
            Some(ref name) => Ok(vec![name.parse()?]),
            None => Ok(StreamKind::ALL.to_vec()),
        }
    }

    /// Start of replication when a stream has no bookmark.
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date.unwrap_or_else(default_start_date)
    }

    /// Render options derived from this config.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new().with_file_base_url(
            self.file_base_url
                .as_deref()
                .unwrap_or(DEFAULT_FILE_BASE_URL),
        )
    }

    /// `host:port` of the database, when a host is configured.
    pub fn connection_target(&self) -> Option<String> {
        let host = self.edgedb_host.as_deref()?;
        Some(match self.edgedb_port {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

impl fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("TapConfig")
            .field("stream_name", &self.stream_name)
            .field("edgedb_host", &self.edgedb_host)
            .field("edgedb_port", &self.edgedb_port)
            .field("edgedb_user", &self.edgedb_user)
            .field("edgedb_branch", &self.edgedb_branch)
            .field("edgedb_database", &self.edgedb_database)
            .field("edgedb_password", &redact(&self.edgedb_password))
            .field("edgedb_secret_key", &redact(&self.edgedb_secret_key))
            .field(
                "edgedb_client_tls_security",
                &self.edgedb_client_tls_security,
            )
            .field("start_date", &self.start_date)
            .field("file_base_url", &self.file_base_url)
            .field("on_render_error", &self.on_render_error)
            .finish()
    }
}

fn default_start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
