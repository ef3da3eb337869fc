//! Command-line surface of the `devsuite` binary.

use std::fmt::{self, Write as _};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use devsuite_domain::id::{ClientId, InvoiceId, MilestoneId, ProjectId, ServiceId, TaskId};
use devsuite_domain::money::Money;
use devsuite_domain::status::{InvoiceStatus, ProjectStatus, ServiceType, TaskStatus};

use crate::domain::types::{
    DashboardSummary, FinanceSummary, NewClient, NewCredential, NewExpense, NewInvoice,
    NewMilestone, NewNote, NewPayment, NewProject, NewService, NewTask, NewTimeEntry,
    SweepReport,
};

#[derive(Debug, Parser)]
#[command(name = "devsuite", about = "DevSuite operations: records and reminder emails")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Email reminders for everything due tomorrow. Meant to run from cron.
    SendNotifications,
    /// Show notification counts and the most recent notifications.
    Notifications {
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Show income, expenses and the latest invoices and expenses.
    Finance {
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Create a record.
    #[command(subcommand)]
    Add(AddCommand),
    /// Change the status of an existing record.
    #[command(subcommand)]
    Update(UpdateCommand),
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    Client(ClientArgs),
    Project(ProjectArgs),
    Task(TaskArgs),
    Milestone(MilestoneArgs),
    Service(ServiceArgs),
    Invoice(InvoiceArgs),
    Payment(PaymentArgs),
    Expense(ExpenseArgs),
    Credential(CredentialArgs),
    Note(NoteArgs),
    TimeEntry(TimeEntryArgs),
}

#[derive(Debug, Subcommand)]
pub enum UpdateCommand {
    /// Mark a milestone completed.
    Milestone {
        id: MilestoneId,
        /// Mark it open again instead.
        #[arg(long)]
        reopen: bool,
    },
    Task {
        id: TaskId,
        #[arg(long)]
        status: TaskStatus,
    },
    Invoice {
        id: InvoiceId,
        #[arg(long)]
        status: InvoiceStatus,
    },
}

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub name: String,
    /// Generated from the name when omitted.
    #[arg(long)]
    pub short_code: Option<String>,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub company_name: String,
}

impl From<ClientArgs> for NewClient {
    fn from(args: ClientArgs) -> Self {
        Self {
            name: args.name,
            short_code: args.short_code,
            email: args.email,
            phone: args.phone,
            address: args.address,
            company_name: args.company_name,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[arg(long)]
    pub client_id: ClientId,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    #[arg(long)]
    pub deadline: Option<NaiveDate>,
    #[arg(long, default_value = "planning")]
    pub status: ProjectStatus,
    #[arg(long)]
    pub budget: Option<Money>,
}

impl From<ProjectArgs> for NewProject {
    fn from(args: ProjectArgs) -> Self {
        Self {
            client_id: args.client_id,
            name: args.name,
            description: args.description,
            start_date: args.start_date,
            deadline: args.deadline,
            status: args.status,
            budget: args.budget,
        }
    }
}

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[arg(long)]
    pub project_id: ProjectId,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "todo")]
    pub status: TaskStatus,
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
}

impl From<TaskArgs> for NewTask {
    fn from(args: TaskArgs) -> Self {
        Self {
            project_id: args.project_id,
            title: args.title,
            description: args.description,
            status: args.status,
            due_date: args.due_date,
        }
    }
}

#[derive(Debug, Args)]
pub struct MilestoneArgs {
    #[arg(long)]
    pub project_id: ProjectId,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
}

impl From<MilestoneArgs> for NewMilestone {
    fn from(args: MilestoneArgs) -> Self {
        Self {
            project_id: args.project_id,
            title: args.title,
            due_date: args.due_date,
        }
    }
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(long)]
    pub client_id: ClientId,
    #[arg(long = "type")]
    pub service_type: ServiceType,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub provider: String,
    #[arg(long, default_value = "0")]
    pub cost: Money,
    #[arg(long, default_value = "0")]
    pub renewal_price: Money,
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    #[arg(long)]
    pub expiry_date: Option<NaiveDate>,
    #[arg(long)]
    pub auto_renew: bool,
}

impl From<ServiceArgs> for NewService {
    fn from(args: ServiceArgs) -> Self {
        Self {
            client_id: args.client_id,
            service_type: args.service_type,
            name: args.name,
            provider: args.provider,
            cost: args.cost,
            renewal_price: args.renewal_price,
            start_date: args.start_date,
            expiry_date: args.expiry_date,
            auto_renew: args.auto_renew,
        }
    }
}

#[derive(Debug, Args)]
pub struct InvoiceArgs {
    #[arg(long)]
    pub client_id: ClientId,
    #[arg(long)]
    pub project_id: ProjectId,
    #[arg(long)]
    pub amount: Money,
    /// Defaults to today.
    #[arg(long)]
    pub date_issued: Option<NaiveDate>,
    #[arg(long)]
    pub due_date: NaiveDate,
    #[arg(long, default_value = "draft")]
    pub status: InvoiceStatus,
}

impl From<InvoiceArgs> for NewInvoice {
    fn from(args: InvoiceArgs) -> Self {
        Self {
            client_id: args.client_id,
            project_id: args.project_id,
            amount: args.amount,
            date_issued: args.date_issued,
            due_date: args.due_date,
            status: args.status,
        }
    }
}

#[derive(Debug, Args)]
pub struct PaymentArgs {
    #[arg(long)]
    pub invoice_id: InvoiceId,
    #[arg(long)]
    pub amount: Money,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "Bank Transfer")]
    pub method: String,
    #[arg(long, default_value = "")]
    pub transaction_id: String,
}

impl From<PaymentArgs> for NewPayment {
    fn from(args: PaymentArgs) -> Self {
        Self {
            invoice_id: args.invoice_id,
            amount: args.amount,
            date: args.date,
            method: args.method,
            transaction_id: args.transaction_id,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub amount: Money,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long)]
    pub service_id: Option<ServiceId>,
}

impl From<ExpenseArgs> for NewExpense {
    fn from(args: ExpenseArgs) -> Self {
        Self {
            service_id: args.service_id,
            description: args.description,
            amount: args.amount,
            date: args.date,
            category: args.category,
        }
    }
}

#[derive(Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub service_id: ServiceId,
    #[arg(long, default_value = "")]
    pub url: String,
    #[arg(long, default_value = "")]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl fmt::Debug for CredentialArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialArgs")
            .field("service_id", &self.service_id)
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl From<CredentialArgs> for NewCredential {
    fn from(args: CredentialArgs) -> Self {
        Self {
            service_id: args.service_id,
            url: args.url,
            username: args.username,
            password: args.password,
            notes: args.notes,
        }
    }
}

#[derive(Debug, Args)]
pub struct NoteArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub content: String,
}

impl From<NoteArgs> for NewNote {
    fn from(args: NoteArgs) -> Self {
        Self {
            title: args.title,
            content: args.content,
        }
    }
}

#[derive(Debug, Args)]
pub struct TimeEntryArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub project_id: Option<ProjectId>,
    #[arg(long)]
    pub task_id: Option<TaskId>,
    /// RFC 3339, e.g. `2026-05-10T09:00:00Z`.
    #[arg(long)]
    pub start: DateTime<Utc>,
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,
}

impl From<TimeEntryArgs> for NewTimeEntry {
    fn from(args: TimeEntryArgs) -> Self {
        Self {
            project_id: args.project_id,
            task_id: args.task_id,
            description: args.description,
            start_time: args.start,
            end_time: args.end,
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

pub fn render_report(report: &SweepReport) -> String {
    format!(
        "Notifications check completed. created={} sent={} failed={} skipped={}",
        report.created, report.sent, report.failed, report.skipped
    )
}

pub fn render_dashboard(summary: &DashboardSummary) -> String {
    let counts = &summary.counts;
    let mut out = format!(
        "Total: {}  Pending: {}  Sent: {}  Failed: {}\n",
        counts.total(),
        counts.pending,
        counts.sent,
        counts.failed
    );
    if summary.recent.is_empty() {
        out.push_str("No notifications yet.\n");
        return out;
    }
    out.push_str("Recent:\n");
    for n in &summary.recent {
        let _ = writeln!(
            out,
            "  {}  {:<7}  {}  {}",
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.status.label(),
            n.recipient,
            n.subject
        );
    }
    out
}

pub fn render_finance(summary: &FinanceSummary) -> String {
    let mut out = format!(
        "Income: {}  Expenses: {}  Net profit: {}  Pending: {}\n",
        summary.total_income,
        summary.total_expenses,
        summary.net_profit(),
        summary.pending_income
    );
    if !summary.recent_invoices.is_empty() {
        out.push_str("Recent invoices:\n");
        for i in &summary.recent_invoices {
            let _ = writeln!(
                out,
                "  {}  {:<9}  {}  {}",
                i.date_issued,
                i.status.label(),
                i.invoice_number,
                i.amount
            );
        }
    }
    if !summary.recent_expenses.is_empty() {
        out.push_str("Recent expenses:\n");
        for e in &summary.recent_expenses {
            let _ = writeln!(out, "  {}  {}", e.date, e);
        }
    }
    out
}
