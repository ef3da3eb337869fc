use anyhow::Context as _;
use serde::Deserialize;

use devsuite_core::config::Config;
use devsuite_domain::calendar::DayBoundary;

use crate::domain::types::AdminContact;

/// Mail transport selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    /// Log messages instead of sending them.
    #[default]
    Console,
    Smtp,
}

/// Ops service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct OpsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    #[serde(default = "default_from_email")]
    pub default_from_email: String,
    /// Comma-separated `Name <email>` or bare addresses.
    #[serde(default)]
    pub admins: String,
    /// Minutes east of UTC at which the business day starts.
    #[serde(default)]
    pub day_boundary_offset_minutes: i32,
    #[serde(default)]
    pub email_backend: EmailBackend,
    #[serde(default)]
    pub email_host: Option<String>,
    #[serde(default = "default_email_port")]
    pub email_port: u16,
    #[serde(default = "default_true")]
    pub email_use_tls: bool,
    #[serde(default)]
    pub email_host_user: Option<String>,
    #[serde(default)]
    pub email_host_password: Option<String>,
}

impl Config for OpsConfig {}

fn default_from_email() -> String {
    "noreply@localhost".to_owned()
}

fn default_email_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

impl OpsConfig {
    pub fn day_boundary(&self) -> anyhow::Result<DayBoundary> {
        DayBoundary::from_offset_minutes(self.day_boundary_offset_minutes)
            .context("invalid DAY_BOUNDARY_OFFSET_MINUTES")
    }

    pub fn admin_contacts(&self) -> anyhow::Result<Vec<AdminContact>> {
        self.admins
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.parse::<AdminContact>().context("invalid ADMINS entry"))
            .collect()
    }

    /// Reject settings that would only fail later, at send time.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.day_boundary()?;
        self.admin_contacts()?;
        if self.email_backend == EmailBackend::Smtp && self.email_host.is_none() {
            anyhow::bail!("EMAIL_HOST is required when EMAIL_BACKEND=smtp");
        }
        Ok(())
    }
}
