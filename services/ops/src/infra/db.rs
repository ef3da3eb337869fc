use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Alias, Expr, Func, OnConflict, SimpleExpr},
};

use devsuite_domain::entity::{EntityKind, EntityRef};
use devsuite_domain::id::{
    ClientId, CredentialId, ExpenseId, InvoiceId, MilestoneId, NoteId, PaymentId, ProjectId,
    ServiceId, TaskId, TimeEntryId,
};
use devsuite_domain::money::Money;
use devsuite_domain::status::{
    InvoiceStatus, NotificationStatus, ProjectStatus, ServiceType, TaskStatus,
};
use devsuite_domain::validation::time_entry_duration;
use devsuite_ops_schema::{
    accounts, clients, credentials, expenses, invoices, milestones, notes, notifications,
    payments, projects, services, tasks, time_entries,
};

use crate::domain::repository::{
    ClientRepository, ExpenseRepository, InvoiceRepository, NoteRepository,
    NotificationRepository, ProjectRepository, RecipientDirectory, ReminderSource,
    ServiceRepository, TimeEntryRepository,
};
use crate::domain::types::{
    AdminContact, Client, ClientContact, Credential, Expense, Invoice, InvoiceDue, Milestone,
    MilestoneDue, NewClient, NewCredential, NewExpense, NewInvoice, NewMilestone, NewNote,
    NewPayment, NewProject, NewService, NewTask, NewTimeEntry, Note, Notification,
    NotificationCounts, Payment, Project, ProjectDue, RecentTimeEntry, Service, ServiceExpiring,
    Task, TaskDue, TimeEntry,
};
use crate::error::OpsServiceError;

// ── Reminder source ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReminderSource {
    pub db: DatabaseConnection,
}

impl ReminderSource for DbReminderSource {
    async fn projects_due_on(&self, date: NaiveDate) -> Result<Vec<ProjectDue>, OpsServiceError> {
        let rows = projects::Entity::find()
            .filter(projects::Column::Deadline.eq(date))
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await
            .context("find projects due")?;
        Ok(rows
            .into_iter()
            .map(|(project, client)| ProjectDue {
                id: ProjectId(project.id),
                name: project.name,
                deadline: date,
                client: client_contact(client),
            })
            .collect())
    }

    async fn milestones_due_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MilestoneDue>, OpsServiceError> {
        let rows = milestones::Entity::find()
            .filter(milestones::Column::DueDate.eq(date))
            .find_also_related(projects::Entity)
            .all(&self.db)
            .await
            .context("find milestones due")?;

        let client_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, project)| project.as_ref().map(|p| p.client_id))
            .collect();
        let clients_by_id: HashMap<i32, clients::Model> = if client_ids.is_empty() {
            HashMap::new()
        } else {
            clients::Entity::find()
                .filter(clients::Column::Id.is_in(client_ids))
                .all(&self.db)
                .await
                .context("find clients of due milestones")?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(milestone, project)| {
                let client = project
                    .as_ref()
                    .and_then(|p| clients_by_id.get(&p.client_id))
                    .cloned();
                MilestoneDue {
                    id: MilestoneId(milestone.id),
                    title: milestone.title,
                    due_date: date,
                    is_completed: milestone.is_completed,
                    project_name: project.map(|p| p.name).unwrap_or_default(),
                    client: client_contact(client),
                }
            })
            .collect())
    }

    async fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<TaskDue>, OpsServiceError> {
        let rows = tasks::Entity::find()
            .filter(tasks::Column::DueDate.eq(date))
            .find_also_related(projects::Entity)
            .all(&self.db)
            .await
            .context("find tasks due")?;
        rows.into_iter()
            .map(|(task, project)| -> Result<TaskDue, OpsServiceError> {
                Ok(TaskDue {
                    id: TaskId(task.id),
                    title: task.title,
                    due_date: date,
                    status: task.status.parse::<TaskStatus>().context("parse task status")?,
                    project_name: project.map(|p| p.name).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn services_expiring_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ServiceExpiring>, OpsServiceError> {
        let rows = services::Entity::find()
            .filter(services::Column::ExpiryDate.eq(date))
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await
            .context("find services expiring")?;
        rows.into_iter()
            .map(|(service, client)| -> Result<ServiceExpiring, OpsServiceError> {
                Ok(ServiceExpiring {
                    id: ServiceId(service.id),
                    name: service.name,
                    service_type: service
                        .service_type
                        .parse::<ServiceType>()
                        .context("parse service type")?,
                    expiry_date: date,
                    client: client_contact(client),
                })
            })
            .collect()
    }

    async fn invoices_due_on(&self, date: NaiveDate) -> Result<Vec<InvoiceDue>, OpsServiceError> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::DueDate.eq(date))
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await
            .context("find invoices due")?;
        rows.into_iter()
            .map(|(invoice, client)| -> Result<InvoiceDue, OpsServiceError> {
                Ok(InvoiceDue {
                    id: InvoiceId(invoice.id),
                    invoice_number: invoice.invoice_number,
                    amount: Money(invoice.amount_cents),
                    due_date: invoice.due_date,
                    status: invoice
                        .status
                        .parse::<InvoiceStatus>()
                        .context("parse invoice status")?,
                    client: client_contact(client),
                })
            })
            .collect()
    }

    async fn time_entries_ended_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RecentTimeEntry>, OpsServiceError> {
        let rows = time_entries::Entity::find()
            .filter(time_entries::Column::EndTime.gte(from))
            .filter(time_entries::Column::EndTime.lte(to))
            .order_by_asc(time_entries::Column::EndTime)
            .all(&self.db)
            .await
            .context("find recent time entries")?;
        Ok(rows
            .into_iter()
            .filter_map(|entry| {
                let end_time = entry.end_time?;
                Some(RecentTimeEntry {
                    id: TimeEntryId(entry.id),
                    description: entry.description,
                    start_time: entry.start_time,
                    end_time,
                })
            })
            .collect())
    }
}

fn client_contact(model: Option<clients::Model>) -> ClientContact {
    match model {
        Some(client) => ClientContact::new(client.name, &client.email),
        None => ClientContact::new("", ""),
    }
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn exists_for_key(
        &self,
        recipient: &str,
        subject: &str,
        entity: EntityRef,
        created_on: NaiveDate,
    ) -> Result<bool, OpsServiceError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::Recipient.eq(recipient))
            .filter(notifications::Column::Subject.eq(subject))
            .filter(notifications::Column::EntityKind.eq(entity.kind().as_str()))
            .filter(notifications::Column::EntityId.eq(entity.raw_id()))
            .filter(notifications::Column::CreatedOn.eq(created_on))
            .count(&self.db)
            .await
            .context("check notification dedup key")?;
        Ok(count > 0)
    }

    async fn exists_for_entity(&self, entity: EntityRef) -> Result<bool, OpsServiceError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::EntityKind.eq(entity.kind().as_str()))
            .filter(notifications::Column::EntityId.eq(entity.raw_id()))
            .count(&self.db)
            .await
            .context("check notifications for entity")?;
        Ok(count > 0)
    }

    async fn insert_pending(&self, notification: &Notification) -> Result<bool, OpsServiceError> {
        let am = notifications::ActiveModel {
            id: Set(notification.id),
            recipient: Set(notification.recipient.clone()),
            subject: Set(notification.subject.clone()),
            message: Set(notification.message.clone()),
            status: Set(notification.status.as_str().to_owned()),
            sent_at: Set(notification.sent_at),
            entity_kind: Set(notification.entity.map(|e| e.kind().as_str().to_owned())),
            entity_id: Set(notification.entity.map(|e| e.raw_id())),
            created_at: Set(notification.created_at),
            created_on: Set(notification.created_on),
            updated_at: Set(notification.updated_at),
        };
        let result = notifications::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    notifications::Column::Recipient,
                    notifications::Column::Subject,
                    notifications::Column::EntityKind,
                    notifications::Column::EntityId,
                    notifications::Column::CreatedOn,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;
        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e)
                .context("insert pending notification")
                .into()),
        }
    }

    async fn update_delivery(&self, notification: &Notification) -> Result<(), OpsServiceError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            status: Set(notification.status.as_str().to_owned()),
            sent_at: Set(notification.sent_at),
            updated_at: Set(notification.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update notification delivery")?;
        Ok(())
    }

    async fn count_by_status(&self) -> Result<NotificationCounts, OpsServiceError> {
        let rows: Vec<(String, i64)> = notifications::Entity::find()
            .select_only()
            .column(notifications::Column::Status)
            .column_as(notifications::Column::Id.count(), "count")
            .group_by(notifications::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count notifications by status")?;

        let mut counts = NotificationCounts::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or(0);
            match status.parse::<NotificationStatus>() {
                Ok(NotificationStatus::Pending) => counts.pending += count,
                Ok(NotificationStatus::Sent) => counts.sent += count,
                Ok(NotificationStatus::Failed) => counts.failed += count,
                Err(e) => tracing::warn!(error = %e, "skipping unknown notification status"),
            }
        }
        Ok(counts)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Notification>, OpsServiceError> {
        let models = notifications::Entity::find()
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent notifications")?;
        models.into_iter().map(notification_from_model).collect()
    }
}

fn notification_from_model(model: notifications::Model) -> Result<Notification, OpsServiceError> {
    let entity = match (model.entity_kind.as_deref(), model.entity_id) {
        (Some(kind), Some(id)) => Some(EntityRef::from_parts(
            kind.parse::<EntityKind>().context("parse notification entity kind")?,
            id,
        )),
        _ => None,
    };
    Ok(Notification {
        id: model.id,
        recipient: model.recipient,
        subject: model.subject,
        message: model.message,
        status: model
            .status
            .parse::<NotificationStatus>()
            .context("parse notification status")?,
        sent_at: model.sent_at,
        entity,
        created_at: model.created_at,
        created_on: model.created_on,
        updated_at: model.updated_at,
    })
}

// ── Recipient directory ──────────────────────────────────────────────────────

/// Configured administrators backed by the accounts table for the fallback.
#[derive(Clone)]
pub struct DbRecipientDirectory {
    pub db: DatabaseConnection,
    pub admins: Vec<AdminContact>,
}

impl RecipientDirectory for DbRecipientDirectory {
    async fn configured_admins(&self) -> Result<Vec<AdminContact>, OpsServiceError> {
        Ok(self.admins.clone())
    }

    async fn superuser_emails(&self) -> Result<Vec<String>, OpsServiceError> {
        let emails: Vec<String> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Email)
            .filter(accounts::Column::IsSuperuser.eq(true))
            .order_by_asc(accounts::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list superuser emails")?;
        Ok(emails)
    }
}

// ── Client repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClientRepository {
    pub db: DatabaseConnection,
}

impl ClientRepository for DbClientRepository {
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, OpsServiceError> {
        let model = clients::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find client by id")?;
        Ok(model.map(client_from_model))
    }

    async fn short_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OpsServiceError> {
        let codes: Vec<String> = clients::Entity::find()
            .select_only()
            .column(clients::Column::ShortCode)
            .filter(clients::Column::ShortCode.starts_with(prefix))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list client short codes")?;
        Ok(codes)
    }

    async fn insert(
        &self,
        client: &NewClient,
        short_code: &str,
    ) -> Result<Option<Client>, OpsServiceError> {
        let now = Utc::now();
        let am = clients::ActiveModel {
            name: Set(client.name.clone()),
            short_code: Set(short_code.to_owned()),
            email: Set(client.email.trim().to_owned()),
            phone: Set(client.phone.clone()),
            address: Set(client.address.clone()),
            company_name: Set(client.company_name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = clients::Entity::insert(am)
            .on_conflict(
                OnConflict::column(clients::Column::ShortCode)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;
        match result {
            Ok(res) => Ok(Some(Client {
                id: ClientId(res.last_insert_id),
                name: client.name.clone(),
                short_code: short_code.to_owned(),
                email: client.email.trim().to_owned(),
                phone: client.phone.clone(),
                address: client.address.clone(),
                company_name: client.company_name.clone(),
                created_at: now,
            })),
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("insert client").into()),
        }
    }
}

fn client_from_model(model: clients::Model) -> Client {
    Client {
        id: ClientId(model.id),
        name: model.name,
        short_code: model.short_code,
        email: model.email,
        phone: model.phone,
        address: model.address,
        company_name: model.company_name,
        created_at: model.created_at,
    }
}

// ── Project repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProjectRepository {
    pub db: DatabaseConnection,
}

impl ProjectRepository for DbProjectRepository {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, OpsServiceError> {
        let model = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find project by id")?;
        model.map(project_from_model).transpose()
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, OpsServiceError> {
        let now = Utc::now();
        let model = projects::ActiveModel {
            client_id: Set(project.client_id.0),
            name: Set(project.name.clone()),
            description: Set(project.description.clone()),
            start_date: Set(project.start_date),
            deadline: Set(project.deadline),
            status: Set(project.status.as_str().to_owned()),
            budget_cents: Set(project.budget.map(|b| b.cents())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create project")?;
        project_from_model(model)
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Task, OpsServiceError> {
        let now = Utc::now();
        let model = tasks::ActiveModel {
            project_id: Set(task.project_id.0),
            title: Set(task.title.clone()),
            description: Set(task.description.clone()),
            status: Set(task.status.as_str().to_owned()),
            due_date: Set(task.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create task")?;
        task_from_model(model)
    }

    async fn insert_milestone(
        &self,
        milestone: &NewMilestone,
    ) -> Result<Milestone, OpsServiceError> {
        let now = Utc::now();
        let model = milestones::ActiveModel {
            project_id: Set(milestone.project_id.0),
            title: Set(milestone.title.clone()),
            due_date: Set(milestone.due_date),
            is_completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create milestone")?;
        Ok(milestone_from_model(model))
    }

    async fn set_milestone_completed(
        &self,
        id: MilestoneId,
        completed: bool,
    ) -> Result<Option<Milestone>, OpsServiceError> {
        let Some(model) = milestones::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find milestone by id")?
        else {
            return Ok(None);
        };
        let mut am: milestones::ActiveModel = model.into();
        am.is_completed = Set(completed);
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update milestone")?;
        Ok(Some(milestone_from_model(model)))
    }

    async fn set_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, OpsServiceError> {
        let Some(model) = tasks::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find task by id")?
        else {
            return Ok(None);
        };
        let mut am: tasks::ActiveModel = model.into();
        am.status = Set(status.as_str().to_owned());
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update task status")?;
        task_from_model(model).map(Some)
    }
}

fn task_from_model(model: tasks::Model) -> Result<Task, OpsServiceError> {
    Ok(Task {
        id: TaskId(model.id),
        project_id: ProjectId(model.project_id),
        title: model.title,
        description: model.description,
        status: model.status.parse::<TaskStatus>().context("parse task status")?,
        due_date: model.due_date,
    })
}

fn milestone_from_model(model: milestones::Model) -> Milestone {
    Milestone {
        id: MilestoneId(model.id),
        project_id: ProjectId(model.project_id),
        title: model.title,
        due_date: model.due_date,
        is_completed: model.is_completed,
    }
}

fn project_from_model(model: projects::Model) -> Result<Project, OpsServiceError> {
    Ok(Project {
        id: ProjectId(model.id),
        client_id: ClientId(model.client_id),
        name: model.name,
        description: model.description,
        start_date: model.start_date,
        deadline: model.deadline,
        status: model
            .status
            .parse::<ProjectStatus>()
            .context("parse project status")?,
        budget: model.budget_cents.map(Money),
    })
}

// ── Service repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbServiceRepository {
    pub db: DatabaseConnection,
}

impl ServiceRepository for DbServiceRepository {
    async fn find_by_id(&self, id: ServiceId) -> Result<Option<Service>, OpsServiceError> {
        let model = services::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find service by id")?;
        model.map(service_from_model).transpose()
    }

    async fn insert(&self, service: &NewService) -> Result<Service, OpsServiceError> {
        let now = Utc::now();
        let model = services::ActiveModel {
            client_id: Set(service.client_id.0),
            service_type: Set(service.service_type.as_str().to_owned()),
            name: Set(service.name.clone()),
            provider: Set(service.provider.clone()),
            cost_cents: Set(service.cost.cents()),
            renewal_price_cents: Set(service.renewal_price.cents()),
            start_date: Set(service.start_date),
            expiry_date: Set(service.expiry_date),
            auto_renew: Set(service.auto_renew),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create service")?;
        service_from_model(model)
    }

    async fn insert_credential(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, OpsServiceError> {
        let model = credentials::ActiveModel {
            service_id: Set(credential.service_id.0),
            url: Set(credential.url.clone()),
            username: Set(credential.username.clone()),
            password: Set(credential.password.clone()),
            notes: Set(credential.notes.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create credential")?;
        Ok(Credential {
            id: CredentialId(model.id),
            service_id: ServiceId(model.service_id),
            url: model.url,
            username: model.username,
            password: model.password,
            notes: model.notes,
        })
    }
}

fn service_from_model(model: services::Model) -> Result<Service, OpsServiceError> {
    Ok(Service {
        id: ServiceId(model.id),
        client_id: ClientId(model.client_id),
        service_type: model
            .service_type
            .parse::<ServiceType>()
            .context("parse service type")?,
        name: model.name,
        provider: model.provider,
        cost: Money(model.cost_cents),
        renewal_price: Money(model.renewal_price_cents),
        start_date: model.start_date,
        expiry_date: model.expiry_date,
        auto_renew: model.auto_renew,
    })
}

// ── Invoice repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInvoiceRepository {
    pub db: DatabaseConnection,
}

impl InvoiceRepository for DbInvoiceRepository {
    async fn invoice_numbers_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, OpsServiceError> {
        let numbers: Vec<String> = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::InvoiceNumber)
            .filter(invoices::Column::InvoiceNumber.starts_with(prefix))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list invoice numbers")?;
        Ok(numbers)
    }

    async fn insert(
        &self,
        invoice: &NewInvoice,
        invoice_number: &str,
        date_issued: NaiveDate,
    ) -> Result<Option<Invoice>, OpsServiceError> {
        let now = Utc::now();
        let am = invoices::ActiveModel {
            client_id: Set(invoice.client_id.0),
            project_id: Set(invoice.project_id.0),
            invoice_number: Set(invoice_number.to_owned()),
            amount_cents: Set(invoice.amount.cents()),
            date_issued: Set(date_issued),
            due_date: Set(invoice.due_date),
            status: Set(invoice.status.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = invoices::Entity::insert(am)
            .on_conflict(
                OnConflict::column(invoices::Column::InvoiceNumber)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;
        match result {
            Ok(res) => Ok(Some(Invoice {
                id: InvoiceId(res.last_insert_id),
                client_id: invoice.client_id,
                project_id: invoice.project_id,
                invoice_number: invoice_number.to_owned(),
                amount: invoice.amount,
                date_issued,
                due_date: invoice.due_date,
                status: invoice.status,
            })),
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("insert invoice").into()),
        }
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, OpsServiceError> {
        let model = invoices::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find invoice by id")?;
        model.map(invoice_from_model).transpose()
    }

    async fn set_status(
        &self,
        id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, OpsServiceError> {
        let Some(model) = invoices::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find invoice by id")?
        else {
            return Ok(None);
        };
        let mut am: invoices::ActiveModel = model.into();
        am.status = Set(status.as_str().to_owned());
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update invoice status")?;
        invoice_from_model(model).map(Some)
    }

    async fn insert_payment(
        &self,
        payment: &NewPayment,
        date: NaiveDate,
    ) -> Result<Payment, OpsServiceError> {
        let model = payments::ActiveModel {
            invoice_id: Set(payment.invoice_id.0),
            amount_cents: Set(payment.amount.cents()),
            date: Set(date),
            method: Set(payment.method.clone()),
            transaction_id: Set(payment.transaction_id.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create payment")?;
        Ok(Payment {
            id: PaymentId(model.id),
            invoice_id: InvoiceId(model.invoice_id),
            amount: Money(model.amount_cents),
            date: model.date,
            method: model.method,
            transaction_id: model.transaction_id,
        })
    }

    async fn totals_by_status(&self) -> Result<Vec<(InvoiceStatus, Money)>, OpsServiceError> {
        let rows: Vec<(String, i64)> = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Status)
            .column_as(sum_cents(invoices::Column::AmountCents), "total")
            .group_by(invoices::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("sum invoices by status")?;
        rows.into_iter()
            .map(|(status, total)| -> Result<(InvoiceStatus, Money), OpsServiceError> {
                let status = status
                    .parse::<InvoiceStatus>()
                    .context("parse invoice status")?;
                Ok((status, Money(total)))
            })
            .collect()
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Invoice>, OpsServiceError> {
        let models = invoices::Entity::find()
            .order_by_desc(invoices::Column::DateIssued)
            .order_by_desc(invoices::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent invoices")?;
        models.into_iter().map(invoice_from_model).collect()
    }
}

fn invoice_from_model(model: invoices::Model) -> Result<Invoice, OpsServiceError> {
    Ok(Invoice {
        id: InvoiceId(model.id),
        client_id: ClientId(model.client_id),
        project_id: ProjectId(model.project_id),
        invoice_number: model.invoice_number,
        amount: Money(model.amount_cents),
        date_issued: model.date_issued,
        due_date: model.due_date,
        status: model
            .status
            .parse::<InvoiceStatus>()
            .context("parse invoice status")?,
    })
}

/// `SUM(col)` cast back to `bigint`; Postgres widens sums of `bigint` to `numeric`.
fn sum_cents(column: impl sea_orm::sea_query::IntoColumnRef) -> SimpleExpr {
    Expr::expr(Func::sum(Expr::col(column))).cast_as(Alias::new("bigint"))
}

// ── Expense repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbExpenseRepository {
    pub db: DatabaseConnection,
}

impl ExpenseRepository for DbExpenseRepository {
    async fn insert(
        &self,
        expense: &NewExpense,
        date: NaiveDate,
    ) -> Result<Expense, OpsServiceError> {
        let model = expenses::ActiveModel {
            service_id: Set(expense.service_id.map(|id| id.0)),
            description: Set(expense.description.clone()),
            amount_cents: Set(expense.amount.cents()),
            date: Set(date),
            category: Set(expense.category.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create expense")?;
        Ok(expense_from_model(model))
    }

    async fn total(&self) -> Result<Money, OpsServiceError> {
        let total: Option<Option<i64>> = expenses::Entity::find()
            .select_only()
            .column_as(sum_cents(expenses::Column::AmountCents), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .context("sum expenses")?;
        Ok(Money(total.flatten().unwrap_or(0)))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Expense>, OpsServiceError> {
        let models = expenses::Entity::find()
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent expenses")?;
        Ok(models.into_iter().map(expense_from_model).collect())
    }
}

fn expense_from_model(model: expenses::Model) -> Expense {
    Expense {
        id: ExpenseId(model.id),
        service_id: model.service_id.map(ServiceId),
        description: model.description,
        amount: Money(model.amount_cents),
        date: model.date,
        category: model.category,
        created_at: model.created_at,
    }
}

// ── Note repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNoteRepository {
    pub db: DatabaseConnection,
}

impl NoteRepository for DbNoteRepository {
    async fn insert(&self, note: &NewNote) -> Result<Note, OpsServiceError> {
        let now = Utc::now();
        let model = notes::ActiveModel {
            title: Set(note.title.clone()),
            content: Set(note.content.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create note")?;
        Ok(Note {
            id: NoteId(model.id),
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

// ── Time entry repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTimeEntryRepository {
    pub db: DatabaseConnection,
}

impl TimeEntryRepository for DbTimeEntryRepository {
    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, OpsServiceError> {
        let duration = time_entry_duration(entry.start_time, entry.end_time)?;
        let model = time_entries::ActiveModel {
            project_id: Set(entry.project_id.map(|id| id.0)),
            task_id: Set(entry.task_id.map(|id| id.0)),
            description: Set(entry.description.clone()),
            start_time: Set(entry.start_time),
            end_time: Set(entry.end_time),
            duration_secs: Set(duration.map(|d| d.num_seconds())),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create time entry")?;
        Ok(TimeEntry {
            id: TimeEntryId(model.id),
            project_id: model.project_id.map(ProjectId),
            task_id: model.task_id.map(TaskId),
            description: model.description,
            start_time: model.start_time,
            end_time: model.end_time,
            duration: model.duration_secs.map(TimeDelta::seconds),
        })
    }
}
