//! Status changes on existing records. These are the fields the reminder
//! sweep filters on.

use tracing::info;

use devsuite_domain::id::{InvoiceId, MilestoneId, TaskId};
use devsuite_domain::status::{InvoiceStatus, TaskStatus};

use crate::domain::repository::{InvoiceRepository, ProjectRepository};
use crate::domain::types::{Invoice, Milestone, Task};
use crate::error::OpsServiceError;

// ── CompleteMilestone ────────────────────────────────────────────────────────

pub struct CompleteMilestoneUseCase<P: ProjectRepository> {
    pub projects: P,
}

impl<P: ProjectRepository> CompleteMilestoneUseCase<P> {
    /// Marks the milestone completed, or open again when `completed` is false.
    pub async fn execute(
        &self,
        id: MilestoneId,
        completed: bool,
    ) -> Result<Milestone, OpsServiceError> {
        let milestone = self
            .projects
            .set_milestone_completed(id, completed)
            .await?
            .ok_or(OpsServiceError::MilestoneNotFound)?;
        info!(milestone_id = %id, completed, "milestone updated");
        Ok(milestone)
    }
}

// ── UpdateTaskStatus ─────────────────────────────────────────────────────────

pub struct UpdateTaskStatusUseCase<P: ProjectRepository> {
    pub projects: P,
}

impl<P: ProjectRepository> UpdateTaskStatusUseCase<P> {
    pub async fn execute(&self, id: TaskId, status: TaskStatus) -> Result<Task, OpsServiceError> {
        let task = self
            .projects
            .set_task_status(id, status)
            .await?
            .ok_or(OpsServiceError::TaskNotFound)?;
        info!(task_id = %id, status = status.as_str(), "task status updated");
        Ok(task)
    }
}

// ── SetInvoiceStatus ─────────────────────────────────────────────────────────

pub struct SetInvoiceStatusUseCase<I: InvoiceRepository> {
    pub invoices: I,
}

impl<I: InvoiceRepository> SetInvoiceStatusUseCase<I> {
    pub async fn execute(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Invoice, OpsServiceError> {
        let invoice = self
            .invoices
            .set_status(id, status)
            .await?
            .ok_or(OpsServiceError::InvoiceNotFound)?;
        info!(invoice_id = %id, status = status.as_str(), "invoice status updated");
        Ok(invoice)
    }
}
