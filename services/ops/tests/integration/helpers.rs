use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use devsuite_domain::entity::EntityRef;
use devsuite_domain::id::{
    ClientId, CredentialId, ExpenseId, InvoiceId, MilestoneId, NoteId, PaymentId, ProjectId,
    ServiceId, TaskId, TimeEntryId,
};
use devsuite_domain::money::Money;
use devsuite_domain::status::{InvoiceStatus, ProjectStatus, ServiceType, TaskStatus};
use devsuite_ops::domain::repository::{
    ClientRepository, ExpenseRepository, InvoiceRepository, MailTransport, NoteRepository,
    NotificationRepository, ProjectRepository, RecipientDirectory, ReminderSource,
    ServiceRepository, TimeEntryRepository,
};
use devsuite_ops::domain::types::{
    AdminContact, Client, ClientContact, Credential, Expense, Invoice, InvoiceDue, Milestone,
    MilestoneDue, NewClient, NewCredential, NewExpense, NewInvoice, NewMilestone, NewNote,
    NewPayment, NewProject, NewService, NewTask, NewTimeEntry, Note, Notification,
    NotificationCounts, OutgoingMail, Payment, Project, ProjectDue, RecentTimeEntry, Service,
    ServiceExpiring, Task, TaskDue, TimeEntry,
};
use devsuite_ops::error::{MailError, OpsServiceError};

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Noon UTC on 2026-05-10; "tomorrow" is 2026-05-11.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 11).unwrap()
}

pub fn acme() -> ClientContact {
    ClientContact::new("Acme", "ops@acme.test")
}

pub fn admin(email: &str) -> AdminContact {
    AdminContact {
        name: String::new(),
        email: email.to_owned(),
    }
}

pub fn project_due(
    id: i32,
    name: &str,
    deadline: NaiveDate,
    client: ClientContact,
) -> ProjectDue {
    ProjectDue {
        id: ProjectId(id),
        name: name.to_owned(),
        deadline,
        client,
    }
}

pub fn test_client(id: i32, name: &str, short_code: &str) -> Client {
    Client {
        id: ClientId(id),
        name: name.to_owned(),
        short_code: short_code.to_owned(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
        company_name: String::new(),
        created_at: now(),
    }
}

pub fn test_project(id: i32, client_id: i32) -> Project {
    Project {
        id: ProjectId(id),
        client_id: ClientId(client_id),
        name: "Acme Launch".to_owned(),
        description: String::new(),
        start_date: None,
        deadline: None,
        status: ProjectStatus::InProgress,
        budget: None,
    }
}

pub fn test_task(id: i32, project_id: i32, status: TaskStatus) -> Task {
    Task {
        id: TaskId(id),
        project_id: ProjectId(project_id),
        title: "Ship".to_owned(),
        description: String::new(),
        status,
        due_date: Some(tomorrow()),
    }
}

pub fn test_milestone(id: i32, project_id: i32, is_completed: bool) -> Milestone {
    Milestone {
        id: MilestoneId(id),
        project_id: ProjectId(project_id),
        title: "Beta".to_owned(),
        due_date: Some(tomorrow()),
        is_completed,
    }
}

pub fn test_service(id: i32, client_id: i32) -> Service {
    Service {
        id: ServiceId(id),
        client_id: ClientId(client_id),
        service_type: ServiceType::Hosting,
        name: "acme.test".to_owned(),
        provider: String::new(),
        cost: Money(0),
        renewal_price: Money(0),
        start_date: None,
        expiry_date: None,
        auto_renew: false,
    }
}

pub fn test_invoice(
    id: i32,
    amount: Money,
    status: InvoiceStatus,
    date_issued: NaiveDate,
) -> Invoice {
    Invoice {
        id: InvoiceId(id),
        client_id: ClientId(1),
        project_id: ProjectId(1),
        invoice_number: format!("ACM001-{id:04}"),
        amount,
        date_issued,
        due_date: tomorrow(),
        status,
    }
}

pub fn test_expense(id: i32, amount: Money, date: NaiveDate) -> Expense {
    Expense {
        id: ExpenseId(id),
        service_id: None,
        description: format!("expense {id}"),
        amount,
        date,
        category: String::new(),
        created_at: now(),
    }
}

// ── MockReminderSource ───────────────────────────────────────────────────────

/// Holds candidate records of every class; each query filters by date like
/// the database does.
#[derive(Default)]
pub struct MockReminderSource {
    pub projects: Vec<ProjectDue>,
    pub milestones: Vec<MilestoneDue>,
    pub tasks: Vec<TaskDue>,
    pub services: Vec<ServiceExpiring>,
    pub invoices: Vec<InvoiceDue>,
    pub time_entries: Vec<RecentTimeEntry>,
}

impl ReminderSource for MockReminderSource {
    async fn projects_due_on(&self, date: NaiveDate) -> Result<Vec<ProjectDue>, OpsServiceError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| p.deadline == date)
            .cloned()
            .collect())
    }

    async fn milestones_due_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MilestoneDue>, OpsServiceError> {
        Ok(self
            .milestones
            .iter()
            .filter(|m| m.due_date == date)
            .cloned()
            .collect())
    }

    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<TaskDue>, OpsServiceError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.due_date == date)
            .cloned()
            .collect())
    }

    async fn services_expiring_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ServiceExpiring>, OpsServiceError> {
        Ok(self
            .services
            .iter()
            .filter(|s| s.expiry_date == date)
            .cloned()
            .collect())
    }

    async fn invoices_due_on(&self, date: NaiveDate) -> Result<Vec<InvoiceDue>, OpsServiceError> {
        Ok(self
            .invoices
            .iter()
            .filter(|i| i.due_date == date)
            .cloned()
            .collect())
    }

    async fn time_entries_ended_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RecentTimeEntry>, OpsServiceError> {
        Ok(self
            .time_entries
            .iter()
            .filter(|e| e.end_time >= from && e.end_time <= to)
            .cloned()
            .collect())
    }
}

/// A reminder source whose store is unreachable.
pub struct FailingReminderSource;

impl ReminderSource for FailingReminderSource {
    async fn projects_due_on(&self, _date: NaiveDate) -> Result<Vec<ProjectDue>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn milestones_due_on(
        &self,
        _date: NaiveDate,
    ) -> Result<Vec<MilestoneDue>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn tasks_due_on(&self, _date: NaiveDate) -> Result<Vec<TaskDue>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn services_expiring_on(
        &self,
        _date: NaiveDate,
    ) -> Result<Vec<ServiceExpiring>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn invoices_due_on(
        &self,
        _date: NaiveDate,
    ) -> Result<Vec<InvoiceDue>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn time_entries_ended_between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<RecentTimeEntry>, OpsServiceError> {
        Err(anyhow::anyhow!("connection refused").into())
    }
}

// ── MockNotificationRepo ─────────────────────────────────────────────────────

/// In-memory notification store enforcing the same unique dedup key as the
/// database index.
#[derive(Clone)]
pub struct MockNotificationRepo {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
    /// When set, `exists_for_key` always answers `false`, as if another sweep
    /// inserted its row after this one checked.
    pub blind_key_check: bool,
}

impl MockNotificationRepo {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications: Arc::new(Mutex::new(notifications)),
            blind_key_check: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the stored notifications for post-execution inspection.
    pub fn handle(&self) -> Arc<Mutex<Vec<Notification>>> {
        Arc::clone(&self.notifications)
    }
}

fn same_key(
    n: &Notification,
    recipient: &str,
    subject: &str,
    entity: EntityRef,
    on: NaiveDate,
) -> bool {
    n.recipient == recipient
        && n.subject == subject
        && n.entity == Some(entity)
        && n.created_on == on
}

impl NotificationRepository for MockNotificationRepo {
    async fn exists_for_key(
        &self,
        recipient: &str,
        subject: &str,
        entity: EntityRef,
        created_on: NaiveDate,
    ) -> Result<bool, OpsServiceError> {
        if self.blind_key_check {
            return Ok(false);
        }
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .any(|n| same_key(n, recipient, subject, entity, created_on)))
    }

    async fn exists_for_entity(&self, entity: EntityRef) -> Result<bool, OpsServiceError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.entity == Some(entity)))
    }

    async fn insert_pending(&self, notification: &Notification) -> Result<bool, OpsServiceError> {
        let mut stored = self.notifications.lock().unwrap();
        if let Some(entity) = notification.entity {
            let taken = stored.iter().any(|n| {
                same_key(
                    n,
                    &notification.recipient,
                    &notification.subject,
                    entity,
                    notification.created_on,
                )
            });
            if taken {
                return Ok(false);
            }
        }
        stored.push(notification.clone());
        Ok(true)
    }

    async fn update_delivery(&self, notification: &Notification) -> Result<(), OpsServiceError> {
        let mut stored = self.notifications.lock().unwrap();
        if let Some(n) = stored.iter_mut().find(|n| n.id == notification.id) {
            n.status = notification.status;
            n.sent_at = notification.sent_at;
            n.updated_at = notification.updated_at;
        }
        Ok(())
    }

    async fn count_by_status(&self) -> Result<NotificationCounts, OpsServiceError> {
        use devsuite_domain::status::NotificationStatus;

        let stored = self.notifications.lock().unwrap();
        let count = |status: NotificationStatus| {
            stored.iter().filter(|n| n.status == status).count() as u64
        };
        Ok(NotificationCounts {
            pending: count(NotificationStatus::Pending),
            sent: count(NotificationStatus::Sent),
            failed: count(NotificationStatus::Failed),
        })
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Notification>, OpsServiceError> {
        let mut recent = self.notifications.lock().unwrap().clone();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

// ── MockDirectory ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDirectory {
    pub admins: Vec<AdminContact>,
    pub superusers: Vec<String>,
}

impl MockDirectory {
    pub fn admins(emails: &[&str]) -> Self {
        Self {
            admins: emails.iter().map(|e| admin(e)).collect(),
            superusers: vec![],
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl RecipientDirectory for MockDirectory {
    async fn configured_admins(&self) -> Result<Vec<AdminContact>, OpsServiceError> {
        Ok(self.admins.clone())
    }

    async fn superuser_emails(&self) -> Result<Vec<String>, OpsServiceError> {
        Ok(self.superusers.clone())
    }
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

/// Records every message; fails delivery to the listed recipients.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
    pub failing_recipients: Vec<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Arc::default(),
            failing_recipients: recipients.iter().map(|r| (*r).to_owned()).collect(),
        }
    }

    /// Returns a shared handle to the delivered messages.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<OutgoingMail>>> {
        Arc::clone(&self.sent)
    }
}

impl MailTransport for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.failing_recipients.contains(&mail.to) {
            return Err(MailError::Transport("connection refused".to_owned()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

// ── MockClientRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockClientRepo {
    pub clients: Arc<Mutex<Vec<Client>>>,
    /// Number of upcoming inserts rejected as if a concurrent writer took the code.
    pub conflicts: Arc<Mutex<usize>>,
    pub insert_attempts: Arc<Mutex<usize>>,
}

impl MockClientRepo {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            clients: Arc::new(Mutex::new(clients)),
            conflicts: Arc::new(Mutex::new(0)),
            insert_attempts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn with_conflicts(self, conflicts: usize) -> Self {
        *self.conflicts.lock().unwrap() = conflicts;
        self
    }
}

impl ClientRepository for MockClientRepo {
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, OpsServiceError> {
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn short_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OpsServiceError> {
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.short_code.starts_with(prefix))
            .map(|c| c.short_code.clone())
            .collect())
    }

    async fn insert(
        &self,
        client: &NewClient,
        short_code: &str,
    ) -> Result<Option<Client>, OpsServiceError> {
        *self.insert_attempts.lock().unwrap() += 1;
        {
            let mut conflicts = self.conflicts.lock().unwrap();
            if *conflicts > 0 {
                *conflicts -= 1;
                return Ok(None);
            }
        }
        let mut clients = self.clients.lock().unwrap();
        if clients.iter().any(|c| c.short_code == short_code) {
            return Ok(None);
        }
        let created = Client {
            id: ClientId(clients.len() as i32 + 1),
            name: client.name.clone(),
            short_code: short_code.to_owned(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            company_name: client.company_name.clone(),
            created_at: now(),
        };
        clients.push(created.clone());
        Ok(Some(created))
    }
}

// ── MockProjectRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockProjectRepo {
    pub projects: Arc<Mutex<Vec<Project>>>,
    pub tasks: Arc<Mutex<Vec<Task>>>,
    pub milestones: Arc<Mutex<Vec<Milestone>>>,
}

impl MockProjectRepo {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            tasks: Arc::default(),
            milestones: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().unwrap() = tasks;
        self
    }

    pub fn with_milestones(self, milestones: Vec<Milestone>) -> Self {
        *self.milestones.lock().unwrap() = milestones;
        self
    }
}

impl ProjectRepository for MockProjectRepo {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, OpsServiceError> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, OpsServiceError> {
        let mut projects = self.projects.lock().unwrap();
        let created = Project {
            id: ProjectId(projects.len() as i32 + 1),
            client_id: project.client_id,
            name: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            deadline: project.deadline,
            status: project.status,
            budget: project.budget,
        };
        projects.push(created.clone());
        Ok(created)
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Task, OpsServiceError> {
        let mut tasks = self.tasks.lock().unwrap();
        let created = Task {
            id: TaskId(tasks.len() as i32 + 1),
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            due_date: task.due_date,
        };
        tasks.push(created.clone());
        Ok(created)
    }

    async fn insert_milestone(
        &self,
        milestone: &NewMilestone,
    ) -> Result<Milestone, OpsServiceError> {
        let mut milestones = self.milestones.lock().unwrap();
        let created = Milestone {
            id: MilestoneId(milestones.len() as i32 + 1),
            project_id: milestone.project_id,
            title: milestone.title.clone(),
            due_date: milestone.due_date,
            is_completed: false,
        };
        milestones.push(created.clone());
        Ok(created)
    }

    async fn set_milestone_completed(
        &self,
        id: MilestoneId,
        completed: bool,
    ) -> Result<Option<Milestone>, OpsServiceError> {
        let mut milestones = self.milestones.lock().unwrap();
        Ok(milestones.iter_mut().find(|m| m.id == id).map(|m| {
            m.is_completed = completed;
            m.clone()
        }))
    }

    async fn set_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, OpsServiceError> {
        let mut tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|t| {
            t.status = status;
            t.clone()
        }))
    }
}

// ── MockServiceRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockServiceRepo {
    pub services: Arc<Mutex<Vec<Service>>>,
    pub credentials: Arc<Mutex<Vec<Credential>>>,
}

impl MockServiceRepo {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services: Arc::new(Mutex::new(services)),
            credentials: Arc::default(),
        }
    }
}

impl ServiceRepository for MockServiceRepo {
    async fn find_by_id(&self, id: ServiceId) -> Result<Option<Service>, OpsServiceError> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn insert(&self, service: &NewService) -> Result<Service, OpsServiceError> {
        let mut services = self.services.lock().unwrap();
        let created = Service {
            id: ServiceId(services.len() as i32 + 1),
            client_id: service.client_id,
            service_type: service.service_type,
            name: service.name.clone(),
            provider: service.provider.clone(),
            cost: service.cost,
            renewal_price: service.renewal_price,
            start_date: service.start_date,
            expiry_date: service.expiry_date,
            auto_renew: service.auto_renew,
        };
        services.push(created.clone());
        Ok(created)
    }

    async fn insert_credential(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, OpsServiceError> {
        let mut credentials = self.credentials.lock().unwrap();
        let created = Credential {
            id: CredentialId(credentials.len() as i32 + 1),
            service_id: credential.service_id,
            url: credential.url.clone(),
            username: credential.username.clone(),
            password: credential.password.clone(),
            notes: credential.notes.clone(),
        };
        credentials.push(created.clone());
        Ok(created)
    }
}

// ── MockInvoiceRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockInvoiceRepo {
    pub invoices: Arc<Mutex<Vec<Invoice>>>,
    pub payments: Arc<Mutex<Vec<Payment>>>,
    pub conflicts: Arc<Mutex<usize>>,
}

impl MockInvoiceRepo {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: Arc::new(Mutex::new(invoices)),
            ..Self::default()
        }
    }

    pub fn with_conflicts(self, conflicts: usize) -> Self {
        *self.conflicts.lock().unwrap() = conflicts;
        self
    }
}

impl InvoiceRepository for MockInvoiceRepo {
    async fn invoice_numbers_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, OpsServiceError> {
        Ok(self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.invoice_number.starts_with(prefix))
            .map(|i| i.invoice_number.clone())
            .collect())
    }

    async fn insert(
        &self,
        invoice: &NewInvoice,
        invoice_number: &str,
        date_issued: NaiveDate,
    ) -> Result<Option<Invoice>, OpsServiceError> {
        {
            let mut conflicts = self.conflicts.lock().unwrap();
            if *conflicts > 0 {
                *conflicts -= 1;
                return Ok(None);
            }
        }
        let mut invoices = self.invoices.lock().unwrap();
        if invoices.iter().any(|i| i.invoice_number == invoice_number) {
            return Ok(None);
        }
        let created = Invoice {
            id: InvoiceId(invoices.len() as i32 + 1),
            client_id: invoice.client_id,
            project_id: invoice.project_id,
            invoice_number: invoice_number.to_owned(),
            amount: invoice.amount,
            date_issued,
            due_date: invoice.due_date,
            status: invoice.status,
        };
        invoices.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, OpsServiceError> {
        Ok(self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn set_status(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, OpsServiceError> {
        let mut invoices = self.invoices.lock().unwrap();
        Ok(invoices.iter_mut().find(|i| i.id == id).map(|i| {
            i.status = status;
            i.clone()
        }))
    }

    async fn insert_payment(
        &self,
        payment: &NewPayment,
        date: NaiveDate,
    ) -> Result<Payment, OpsServiceError> {
        let mut payments = self.payments.lock().unwrap();
        let created = Payment {
            id: PaymentId(payments.len() as i32 + 1),
            invoice_id: payment.invoice_id,
            amount: payment.amount,
            date,
            method: payment.method.clone(),
            transaction_id: payment.transaction_id.clone(),
        };
        payments.push(created.clone());
        Ok(created)
    }

    async fn totals_by_status(&self) -> Result<Vec<(InvoiceStatus, Money)>, OpsServiceError> {
        let mut totals: Vec<(InvoiceStatus, Money)> = Vec::new();
        for invoice in self.invoices.lock().unwrap().iter() {
            match totals.iter_mut().find(|(status, _)| *status == invoice.status) {
                Some((_, sum)) => *sum = Money(sum.cents() + invoice.amount.cents()),
                None => totals.push((invoice.status, invoice.amount)),
            }
        }
        Ok(totals)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Invoice>, OpsServiceError> {
        let mut recent = self.invoices.lock().unwrap().clone();
        recent.sort_by(|a, b| b.date_issued.cmp(&a.date_issued).then(b.id.0.cmp(&a.id.0)));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

// ── MockExpenseRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockExpenseRepo {
    pub expenses: Arc<Mutex<Vec<Expense>>>,
}

impl MockExpenseRepo {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Arc::new(Mutex::new(expenses)),
        }
    }
}

impl ExpenseRepository for MockExpenseRepo {
    async fn insert(
        &self,
        expense: &NewExpense,
        date: NaiveDate,
    ) -> Result<Expense, OpsServiceError> {
        let mut expenses = self.expenses.lock().unwrap();
        let created = Expense {
            id: ExpenseId(expenses.len() as i32 + 1),
            service_id: expense.service_id,
            description: expense.description.clone(),
            amount: expense.amount,
            date,
            category: expense.category.clone(),
            created_at: now(),
        };
        expenses.push(created.clone());
        Ok(created)
    }

    async fn total(&self) -> Result<Money, OpsServiceError> {
        let cents = self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.amount.cents())
            .sum();
        Ok(Money(cents))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Expense>, OpsServiceError> {
        let mut recent = self.expenses.lock().unwrap().clone();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.0.cmp(&a.id.0)));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

// ── MockNoteRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNoteRepo {
    pub notes: Arc<Mutex<Vec<Note>>>,
}

impl NoteRepository for MockNoteRepo {
    async fn insert(&self, note: &NewNote) -> Result<Note, OpsServiceError> {
        let mut notes = self.notes.lock().unwrap();
        let created = Note {
            id: NoteId(notes.len() as i32 + 1),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: now(),
            updated_at: now(),
        };
        notes.push(created.clone());
        Ok(created)
    }
}

// ── MockTimeEntryRepo ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockTimeEntryRepo {
    pub entries: Arc<Mutex<Vec<TimeEntry>>>,
}

impl TimeEntryRepository for MockTimeEntryRepo {
    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, OpsServiceError> {
        let mut entries = self.entries.lock().unwrap();
        let created = TimeEntry {
            id: TimeEntryId(entries.len() as i32 + 1),
            project_id: entry.project_id,
            task_id: entry.task_id,
            description: entry.description.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            duration: entry.end_time.map(|end| end - entry.start_time),
        };
        entries.push(created.clone());
        Ok(created)
    }
}
