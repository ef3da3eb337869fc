use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use uuid::Uuid;

use devsuite_domain::entity::EntityRef;
use devsuite_domain::id::{
    ClientId, CredentialId, ExpenseId, InvoiceId, MilestoneId, NoteId, PaymentId, ProjectId,
    ServiceId, TaskId, TimeEntryId,
};
use devsuite_domain::money::Money;
use devsuite_domain::status::{
    InvoiceStatus, NotificationStatus, ProjectStatus, ServiceType, TaskStatus,
};

/// Column width of `notifications.subject`.
pub const SUBJECT_MAX_LEN: usize = 255;

// ── Recipients ───────────────────────────────────────────────────────────────

/// An administrator from the `ADMINS` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid admin entry: {0}")]
pub struct InvalidAdmin(pub String);

impl FromStr for AdminContact {
    type Err = InvalidAdmin;

    /// Accepts `Jane Doe <jane@example.com>` or a bare `jane@example.com`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let (name, email) = match entry.split_once('<') {
            Some((name, rest)) => {
                let email = rest
                    .strip_suffix('>')
                    .ok_or_else(|| InvalidAdmin(s.to_owned()))?;
                (name.trim(), email.trim())
            }
            None => ("", entry),
        };
        if email.is_empty() || !email.contains('@') {
            return Err(InvalidAdmin(s.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
        })
    }
}

/// Name and optional email of the client a reminder is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContact {
    pub name: String,
    pub email: Option<String>,
}

impl ClientContact {
    /// Blank stored emails mean "no email on file".
    pub fn new(name: impl Into<String>, email: &str) -> Self {
        let email = email.trim();
        Self {
            name: name.into(),
            email: (!email.is_empty()).then(|| email.to_owned()),
        }
    }
}

// ── Reminder candidates ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProjectDue {
    pub id: ProjectId,
    pub name: String,
    pub deadline: NaiveDate,
    pub client: ClientContact,
}

#[derive(Debug, Clone)]
pub struct MilestoneDue {
    pub id: MilestoneId,
    pub title: String,
    pub due_date: NaiveDate,
    pub is_completed: bool,
    pub project_name: String,
    pub client: ClientContact,
}

#[derive(Debug, Clone)]
pub struct TaskDue {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub project_name: String,
}

#[derive(Debug, Clone)]
pub struct ServiceExpiring {
    pub id: ServiceId,
    pub name: String,
    pub service_type: ServiceType,
    pub expiry_date: NaiveDate,
    pub client: ClientContact,
}

#[derive(Debug, Clone)]
pub struct InvoiceDue {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub client: ClientContact,
}

/// A finished time entry.
#[derive(Debug, Clone)]
pub struct RecentTimeEntry {
    pub id: TimeEntryId,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RecentTimeEntry {
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

// ── Notifications ────────────────────────────────────────────────────────────

/// A message the sweep wants delivered, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient: String,
    pub subject: String,
    pub message: String,
    pub entity: Option<EntityRef>,
}

impl NotificationRequest {
    /// Subjects longer than the column are cut at a character boundary.
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
        entity: Option<EntityRef>,
    ) -> Self {
        let mut subject = subject.into();
        if let Some((idx, _)) = subject.char_indices().nth(SUBJECT_MAX_LEN) {
            subject.truncate(idx);
        }
        Self {
            recipient: recipient.into(),
            subject,
            message: message.into(),
            entity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub message: String,
    pub status: NotificationStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub entity: Option<EntityRef>,
    pub created_at: DateTime<Utc>,
    /// Business-calendar day of `created_at`; part of the dedup key.
    pub created_on: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn pending(request: NotificationRequest, now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient: request.recipient,
            subject: request.subject,
            message: request.message,
            status: NotificationStatus::Pending,
            sent_at: None,
            entity: request.entity,
            created_at: now,
            created_on: today,
            updated_at: now,
        }
    }

    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(at);
        self.updated_at = at;
    }

    pub fn mark_failed(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Failed;
        self.sent_at = None;
        self.updated_at = at;
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification to {}: {}", self.recipient, self.subject)
    }
}

/// Email handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outcome counts of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Notifications persisted (sent + failed).
    pub created: u32,
    pub sent: u32,
    pub failed: u32,
    /// Per-recipient notifications dropped because an equivalent one already
    /// exists. An already-notified time entry counts once for every admin.
    pub skipped: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationCounts {
    pub pending: u64,
    pub sent: u64,
    pub failed: u64,
}

impl NotificationCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.sent + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub counts: NotificationCounts,
    pub recent: Vec<Notification>,
}

/// Income and spending totals with the latest invoices and expenses.
#[derive(Debug, Clone)]
pub struct FinanceSummary {
    /// Sum of paid invoices.
    pub total_income: Money,
    pub total_expenses: Money,
    /// Sum of invoices sent or overdue.
    pub pending_income: Money,
    pub recent_invoices: Vec<Invoice>,
    pub recent_expenses: Vec<Expense>,
}

impl FinanceSummary {
    pub fn net_profit(&self) -> Money {
        Money(self.total_income.cents() - self.total_expenses.cents())
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub short_code: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    /// Generated from the name when absent.
    pub short_code: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub client_id: ClientId,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub budget: Option<Money>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_id: ClientId,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub budget: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub id: MilestoneId,
    pub project_id: ProjectId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_completed { "done" } else { "open" };
        write!(f, "{} [{mark}]", self.title)
    }
}

#[derive(Debug, Clone)]
pub struct NewMilestone {
    pub project_id: ProjectId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: ServiceId,
    pub client_id: ClientId,
    pub service_type: ServiceType,
    pub name: String,
    pub provider: String,
    pub cost: Money,
    pub renewal_price: Money,
    pub start_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub auto_renew: bool,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub client_id: ClientId,
    pub service_type: ServiceType,
    pub name: String,
    pub provider: String,
    pub cost: Money,
    pub renewal_price: Money,
    pub start_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub auto_renew: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_id: ClientId,
    pub project_id: ProjectId,
    pub invoice_number: String,
    pub amount: Money,
    pub date_issued: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub project_id: ProjectId,
    pub amount: Money,
    /// Defaults to today.
    pub date_issued: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub date: NaiveDate,
    pub method: String,
    pub transaction_id: String,
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payment of {} for invoice #{}", self.amount, self.invoice_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub method: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub service_id: Option<ServiceId>,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.description, self.amount)
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub service_id: Option<ServiceId>,
    pub description: String,
    pub amount: Money,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub category: String,
}

/// Login details kept for a service. The password never appears in
/// `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: CredentialId,
    pub service_id: ServiceId,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("service_id", &self.service_id)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let username = if self.username.is_empty() {
            "No Username"
        } else {
            &self.username
        };
        write!(f, "Credential ({username}) for service #{}", self.service_id)
    }
}

#[derive(Clone)]
pub struct NewCredential {
    pub service_id: ServiceId,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("service_id", &self.service_id)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish_non_exhaustive()
    }
}

const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Titles are cut to this many characters when displayed.
pub const NOTE_TITLE_DISPLAY_LEN: usize = 50;

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title: String = self.title.chars().take(NOTE_TITLE_DISPLAY_LEN).collect();
        f.write_str(&title)
    }
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<TimeDelta>,
}

#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}
