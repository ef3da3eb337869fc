use crate::domain::repository::RecipientDirectory;
use crate::error::OpsServiceError;

/// Email addresses that receive administrator alerts.
///
/// Configured administrators win; superuser accounts are only consulted when
/// none are configured. Blank superuser emails are dropped. An empty result is
/// not an error.
pub async fn resolve_admin_emails<D: RecipientDirectory>(
    directory: &D,
) -> Result<Vec<String>, OpsServiceError> {
    let configured = directory.configured_admins().await?;
    if !configured.is_empty() {
        return Ok(configured.into_iter().map(|admin| admin.email).collect());
    }

    let superusers = directory.superuser_emails().await?;
    Ok(superusers
        .into_iter()
        .map(|email| email.trim().to_owned())
        .filter(|email| !email.is_empty())
        .collect())
}
