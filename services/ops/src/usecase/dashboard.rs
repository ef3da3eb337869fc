use crate::domain::repository::NotificationRepository;
use crate::domain::types::DashboardSummary;
use crate::error::OpsServiceError;

pub const DEFAULT_RECENT_LIMIT: u64 = 10;

// ── NotificationDashboard ────────────────────────────────────────────────────

pub struct NotificationDashboardUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> NotificationDashboardUseCase<R> {
    /// Status counts plus the `limit` newest notifications
    /// (`DEFAULT_RECENT_LIMIT` when `None`).
    pub async fn execute(&self, limit: Option<u64>) -> Result<DashboardSummary, OpsServiceError> {
        let counts = self.repo.count_by_status().await?;
        let recent = self
            .repo
            .list_recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await?;
        Ok(DashboardSummary { counts, recent })
    }
}
