use chrono::NaiveDate;
use tracing::{info, warn};

use devsuite_domain::code::{
    invoice_number_prefix, next_invoice_number, next_short_code, short_code_prefix,
};
use devsuite_domain::validation::{
    require, require_positive, time_entry_duration, validate_project_dates,
    validate_service_dates, validate_short_code, validate_task_due_date,
};

use crate::domain::repository::{
    ClientRepository, ExpenseRepository, InvoiceRepository, NoteRepository, ProjectRepository,
    ServiceRepository, TimeEntryRepository,
};
use crate::domain::types::{
    Client, Credential, Expense, Invoice, Milestone, NewClient, NewCredential, NewExpense,
    NewInvoice, NewMilestone, NewNote, NewPayment, NewProject, NewService, NewTask,
    NewTimeEntry, Note, Payment, Project, Service, Task, TimeEntry,
};
use crate::error::OpsServiceError;

/// Attempts at allocating a generated code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

// ── CreateClient ─────────────────────────────────────────────────────────────

pub struct CreateClientUseCase<R: ClientRepository> {
    pub repo: R,
}

impl<R: ClientRepository> CreateClientUseCase<R> {
    pub async fn execute(&self, input: NewClient) -> Result<Client, OpsServiceError> {
        require("name", &input.name)?;

        if let Some(code) = input.short_code.as_deref().map(str::trim) {
            if !code.is_empty() {
                validate_short_code(code)?;
                let client = self
                    .repo
                    .insert(&input, code)
                    .await?
                    .ok_or(OpsServiceError::ShortCodeTaken)?;
                info!(client_id = %client.id, short_code = %client.short_code, "client created");
                return Ok(client);
            }
        }

        let prefix = short_code_prefix(&input.name);
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let existing = self.repo.short_codes_with_prefix(&prefix).await?;
            let code = next_short_code(&input.name, existing.iter().map(String::as_str))?;
            if let Some(client) = self.repo.insert(&input, &code).await? {
                info!(client_id = %client.id, short_code = %client.short_code, "client created");
                return Ok(client);
            }
            warn!(short_code = %code, attempt, "short code taken concurrently, retrying");
        }
        Err(OpsServiceError::CodeConflict)
    }
}

// ── CreateProject ────────────────────────────────────────────────────────────

pub struct CreateProjectUseCase<C: ClientRepository, P: ProjectRepository> {
    pub clients: C,
    pub projects: P,
}

impl<C: ClientRepository, P: ProjectRepository> CreateProjectUseCase<C, P> {
    pub async fn execute(&self, input: NewProject) -> Result<Project, OpsServiceError> {
        require("name", &input.name)?;
        validate_project_dates(input.start_date, input.deadline)?;
        self.clients
            .find_by_id(input.client_id)
            .await?
            .ok_or(OpsServiceError::ClientNotFound)?;
        self.projects.insert(&input).await
    }
}

// ── CreateTask ───────────────────────────────────────────────────────────────

pub struct CreateTaskUseCase<P: ProjectRepository> {
    pub projects: P,
}

impl<P: ProjectRepository> CreateTaskUseCase<P> {
    /// `today` is the current business day; tasks cannot be due before it.
    pub async fn execute(&self, input: NewTask, today: NaiveDate) -> Result<Task, OpsServiceError> {
        require("title", &input.title)?;
        validate_task_due_date(input.due_date, today)?;
        self.projects
            .find_by_id(input.project_id)
            .await?
            .ok_or(OpsServiceError::ProjectNotFound)?;
        self.projects.insert_task(&input).await
    }
}

// ── CreateMilestone ──────────────────────────────────────────────────────────

pub struct CreateMilestoneUseCase<P: ProjectRepository> {
    pub projects: P,
}

impl<P: ProjectRepository> CreateMilestoneUseCase<P> {
    pub async fn execute(&self, input: NewMilestone) -> Result<Milestone, OpsServiceError> {
        require("title", &input.title)?;
        self.projects
            .find_by_id(input.project_id)
            .await?
            .ok_or(OpsServiceError::ProjectNotFound)?;
        let milestone = self.projects.insert_milestone(&input).await?;
        info!(
            milestone_id = %milestone.id,
            project_id = %milestone.project_id,
            "milestone created"
        );
        Ok(milestone)
    }
}

// ── CreateService ────────────────────────────────────────────────────────────

pub struct CreateServiceUseCase<C: ClientRepository, S: ServiceRepository> {
    pub clients: C,
    pub services: S,
}

impl<C: ClientRepository, S: ServiceRepository> CreateServiceUseCase<C, S> {
    pub async fn execute(
        &self,
        input: NewService,
        today: NaiveDate,
    ) -> Result<Service, OpsServiceError> {
        require("name", &input.name)?;
        validate_service_dates(input.start_date, input.expiry_date, today)?;
        self.clients
            .find_by_id(input.client_id)
            .await?
            .ok_or(OpsServiceError::ClientNotFound)?;
        self.services.insert(&input).await
    }
}

// ── CreateInvoice ────────────────────────────────────────────────────────────

pub struct CreateInvoiceUseCase<C, P, I>
where
    C: ClientRepository,
    P: ProjectRepository,
    I: InvoiceRepository,
{
    pub clients: C,
    pub projects: P,
    pub invoices: I,
}

impl<C, P, I> CreateInvoiceUseCase<C, P, I>
where
    C: ClientRepository,
    P: ProjectRepository,
    I: InvoiceRepository,
{
    /// Numbers the invoice `{client short code}-{NNNN}`. `today` is the
    /// default issue date.
    pub async fn execute(
        &self,
        input: NewInvoice,
        today: NaiveDate,
    ) -> Result<Invoice, OpsServiceError> {
        let client = self
            .clients
            .find_by_id(input.client_id)
            .await?
            .ok_or(OpsServiceError::ClientNotFound)?;
        self.projects
            .find_by_id(input.project_id)
            .await?
            .ok_or(OpsServiceError::ProjectNotFound)?;

        let date_issued = input.date_issued.unwrap_or(today);
        let prefix = invoice_number_prefix(&client.short_code);
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let existing = self.invoices.invoice_numbers_with_prefix(&prefix).await?;
            let number =
                next_invoice_number(&client.short_code, existing.iter().map(String::as_str));
            if let Some(invoice) = self.invoices.insert(&input, &number, date_issued).await? {
                info!(invoice_id = %invoice.id, invoice_number = %invoice.invoice_number, "invoice created");
                return Ok(invoice);
            }
            warn!(invoice_number = %number, attempt, "invoice number taken concurrently, retrying");
        }
        Err(OpsServiceError::CodeConflict)
    }
}

// ── LogTimeEntry ─────────────────────────────────────────────────────────────

pub struct LogTimeEntryUseCase<T: TimeEntryRepository> {
    pub entries: T,
}

impl<T: TimeEntryRepository> LogTimeEntryUseCase<T> {
    pub async fn execute(&self, input: NewTimeEntry) -> Result<TimeEntry, OpsServiceError> {
        require("description", &input.description)?;
        time_entry_duration(input.start_time, input.end_time)?;
        self.entries.insert(&input).await
    }
}

// ── RecordPayment ────────────────────────────────────────────────────────────

pub struct RecordPaymentUseCase<I: InvoiceRepository> {
    pub invoices: I,
}

impl<I: InvoiceRepository> RecordPaymentUseCase<I> {
    /// `today` is the default payment date.
    pub async fn execute(
        &self,
        input: NewPayment,
        today: NaiveDate,
    ) -> Result<Payment, OpsServiceError> {
        require_positive("amount", input.amount)?;
        self.invoices
            .find_by_id(input.invoice_id)
            .await?
            .ok_or(OpsServiceError::InvoiceNotFound)?;
        let payment = self
            .invoices
            .insert_payment(&input, input.date.unwrap_or(today))
            .await?;
        info!(payment_id = %payment.id, invoice_id = %payment.invoice_id, "payment recorded");
        Ok(payment)
    }
}

// ── LogExpense ───────────────────────────────────────────────────────────────

pub struct LogExpenseUseCase<S: ServiceRepository, E: ExpenseRepository> {
    pub services: S,
    pub expenses: E,
}

impl<S: ServiceRepository, E: ExpenseRepository> LogExpenseUseCase<S, E> {
    /// `today` is the default expense date.
    pub async fn execute(
        &self,
        input: NewExpense,
        today: NaiveDate,
    ) -> Result<Expense, OpsServiceError> {
        require("description", &input.description)?;
        require_positive("amount", input.amount)?;
        if let Some(service_id) = input.service_id {
            self.services
                .find_by_id(service_id)
                .await?
                .ok_or(OpsServiceError::ServiceNotFound)?;
        }
        self.expenses
            .insert(&input, input.date.unwrap_or(today))
            .await
    }
}

// ── CreateCredential ─────────────────────────────────────────────────────────

pub struct CreateCredentialUseCase<S: ServiceRepository> {
    pub services: S,
}

impl<S: ServiceRepository> CreateCredentialUseCase<S> {
    pub async fn execute(&self, input: NewCredential) -> Result<Credential, OpsServiceError> {
        self.services
            .find_by_id(input.service_id)
            .await?
            .ok_or(OpsServiceError::ServiceNotFound)?;
        let credential = self.services.insert_credential(&input).await?;
        info!(
            credential_id = %credential.id,
            service_id = %credential.service_id,
            "credential stored"
        );
        Ok(credential)
    }
}

// ── CreateNote ───────────────────────────────────────────────────────────────

pub struct CreateNoteUseCase<N: NoteRepository> {
    pub notes: N,
}

impl<N: NoteRepository> CreateNoteUseCase<N> {
    pub async fn execute(&self, input: NewNote) -> Result<Note, OpsServiceError> {
        require("title", &input.title)?;
        self.notes.insert(&input).await
    }
}
