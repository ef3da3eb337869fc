#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};

use devsuite_domain::entity::EntityRef;
use devsuite_domain::id::{ClientId, InvoiceId, MilestoneId, ProjectId, ServiceId, TaskId};
use devsuite_domain::money::Money;
use devsuite_domain::status::{InvoiceStatus, TaskStatus};

use crate::domain::types::{
    AdminContact, Client, Credential, Expense, Invoice, InvoiceDue, Milestone, MilestoneDue,
    NewClient, NewCredential, NewExpense, NewInvoice, NewMilestone, NewNote, NewPayment,
    NewProject, NewService, NewTask, NewTimeEntry, Note, Notification, NotificationCounts,
    OutgoingMail, Payment, Project, ProjectDue, RecentTimeEntry, Service, ServiceExpiring, Task,
    TaskDue, TimeEntry,
};
use crate::error::{MailError, OpsServiceError};

/// Read side of the reminder sweep: records falling due on a given day.
///
/// Returns every record with the matching date; status filters are applied by
/// the sweep itself.
pub trait ReminderSource: Send + Sync {
    async fn projects_due_on(&self, date: NaiveDate) -> Result<Vec<ProjectDue>, OpsServiceError>;

    async fn milestones_due_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MilestoneDue>, OpsServiceError>;

    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<TaskDue>, OpsServiceError>;

    async fn services_expiring_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ServiceExpiring>, OpsServiceError>;

    async fn invoices_due_on(&self, date: NaiveDate) -> Result<Vec<InvoiceDue>, OpsServiceError>;

    /// Time entries whose end time lies in `[from, to]`.
    async fn time_entries_ended_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RecentTimeEntry>, OpsServiceError>;
}

/// Persistence for sent and attempted notifications.
pub trait NotificationRepository: Send + Sync {
    /// Whether a notification with the full dedup key already exists.
    async fn exists_for_key(
        &self,
        recipient: &str,
        subject: &str,
        entity: EntityRef,
        created_on: NaiveDate,
    ) -> Result<bool, OpsServiceError>;

    /// Whether any notification, on any day, references `entity`.
    async fn exists_for_entity(&self, entity: EntityRef) -> Result<bool, OpsServiceError>;

    /// Insert a pending notification. Returns `false` when the dedup key is
    /// already taken and nothing was written.
    async fn insert_pending(&self, notification: &Notification) -> Result<bool, OpsServiceError>;

    /// Persist the delivery outcome (status, sent-at, updated-at).
    async fn update_delivery(&self, notification: &Notification) -> Result<(), OpsServiceError>;

    async fn count_by_status(&self) -> Result<NotificationCounts, OpsServiceError>;

    /// Most recent notifications, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Notification>, OpsServiceError>;
}

/// Where administrator addresses come from.
pub trait RecipientDirectory: Send + Sync {
    /// Administrators named in configuration, in configured order.
    async fn configured_admins(&self) -> Result<Vec<AdminContact>, OpsServiceError>;

    /// Emails of accounts flagged as superuser.
    async fn superuser_emails(&self) -> Result<Vec<String>, OpsServiceError>;
}

pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, OpsServiceError>;

    async fn short_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OpsServiceError>;

    /// Insert with the given short code. Returns `None` if the code is taken.
    async fn insert(
        &self,
        client: &NewClient,
        short_code: &str,
    ) -> Result<Option<Client>, OpsServiceError>;
}

pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, OpsServiceError>;

    async fn insert(&self, project: &NewProject) -> Result<Project, OpsServiceError>;

    async fn insert_task(&self, task: &NewTask) -> Result<Task, OpsServiceError>;

    async fn insert_milestone(
        &self,
        milestone: &NewMilestone,
    ) -> Result<Milestone, OpsServiceError>;

    /// Returns `None` if the milestone does not exist.
    async fn set_milestone_completed(
        &self,
        id: MilestoneId,
        completed: bool,
    ) -> Result<Option<Milestone>, OpsServiceError>;

    /// Returns `None` if the task does not exist.
    async fn set_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, OpsServiceError>;
}

pub trait ServiceRepository: Send + Sync {
    async fn find_by_id(&self, id: ServiceId) -> Result<Option<Service>, OpsServiceError>;

    async fn insert(&self, service: &NewService) -> Result<Service, OpsServiceError>;

    async fn insert_credential(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, OpsServiceError>;
}

pub trait InvoiceRepository: Send + Sync {
    async fn invoice_numbers_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, OpsServiceError>;

    /// Insert with the given number. Returns `None` if the number is taken.
    async fn insert(
        &self,
        invoice: &NewInvoice,
        invoice_number: &str,
        date_issued: NaiveDate,
    ) -> Result<Option<Invoice>, OpsServiceError>;

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, OpsServiceError>;

    /// Returns `None` if the invoice does not exist.
    async fn set_status(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, OpsServiceError>;

    async fn insert_payment(
        &self,
        payment: &NewPayment,
        date: NaiveDate,
    ) -> Result<Payment, OpsServiceError>;

    /// Summed invoice amounts per status. Statuses without invoices are absent.
    async fn totals_by_status(&self) -> Result<Vec<(InvoiceStatus, Money)>, OpsServiceError>;

    /// Latest invoices by issue date, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Invoice>, OpsServiceError>;
}

pub trait ExpenseRepository: Send + Sync {
    async fn insert(
        &self,
        expense: &NewExpense,
        date: NaiveDate,
    ) -> Result<Expense, OpsServiceError>;

    async fn total(&self) -> Result<Money, OpsServiceError>;

    /// Latest expenses by date, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Expense>, OpsServiceError>;
}

pub trait NoteRepository: Send + Sync {
    async fn insert(&self, note: &NewNote) -> Result<Note, OpsServiceError>;
}

pub trait TimeEntryRepository: Send + Sync {
    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, OpsServiceError>;
}

/// Outbound email.
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}
