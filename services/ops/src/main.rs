use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use devsuite_core::config::Config as _;
use devsuite_core::tracing::{DEFAULT_FILTER, init_tracing};
use devsuite_domain::calendar::DayBoundary;

use devsuite_ops::cli::{
    AddCommand, Cli, Command, UpdateCommand, render_dashboard, render_finance, render_report,
};
use devsuite_ops::config::OpsConfig;
use devsuite_ops::infra::db::{
    DbClientRepository, DbExpenseRepository, DbInvoiceRepository, DbNoteRepository,
    DbNotificationRepository, DbProjectRepository, DbRecipientDirectory, DbReminderSource,
    DbServiceRepository, DbTimeEntryRepository,
};
use devsuite_ops::infra::mail::ConfiguredMailer;
use devsuite_ops::usecase::dashboard::NotificationDashboardUseCase;
use devsuite_ops::usecase::finance::FinanceSummaryUseCase;
use devsuite_ops::usecase::progress::{
    CompleteMilestoneUseCase, SetInvoiceStatusUseCase, UpdateTaskStatusUseCase,
};
use devsuite_ops::usecase::records::{
    CreateClientUseCase, CreateCredentialUseCase, CreateInvoiceUseCase, CreateMilestoneUseCase,
    CreateNoteUseCase, CreateProjectUseCase, CreateServiceUseCase, CreateTaskUseCase,
    LogExpenseUseCase, LogTimeEntryUseCase, RecordPaymentUseCase,
};
use devsuite_ops::usecase::reminder::SendRemindersUseCase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(DEFAULT_FILTER);

    let cli = Cli::parse();
    let config = OpsConfig::from_env()?;
    config.validate()?;
    let calendar = config.day_boundary()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Command::SendNotifications => send_notifications(&config, calendar, db).await,
        Command::Notifications { limit } => {
            let uc = NotificationDashboardUseCase {
                repo: DbNotificationRepository { db },
            };
            let summary = uc.execute(limit).await?;
            print!("{}", render_dashboard(&summary));
            Ok(())
        }
        Command::Finance { limit } => {
            let uc = FinanceSummaryUseCase {
                invoices: DbInvoiceRepository { db: db.clone() },
                expenses: DbExpenseRepository { db },
            };
            let summary = uc.execute(limit).await?;
            print!("{}", render_finance(&summary));
            Ok(())
        }
        Command::Add(add) => add_record(add, calendar, db).await,
        Command::Update(update) => update_record(update, db).await,
    }
}

async fn send_notifications(
    config: &OpsConfig,
    calendar: DayBoundary,
    db: DatabaseConnection,
) -> anyhow::Result<()> {
    let uc = SendRemindersUseCase {
        source: DbReminderSource { db: db.clone() },
        notifications: DbNotificationRepository { db: db.clone() },
        directory: DbRecipientDirectory {
            db,
            admins: config.admin_contacts()?,
        },
        mailer: ConfiguredMailer::from_config(config)?,
        from_email: config.default_from_email.clone(),
        calendar,
    };
    let report = uc.execute(Utc::now()).await?;
    println!("{}", render_report(&report));
    Ok(())
}

async fn add_record(
    command: AddCommand,
    calendar: DayBoundary,
    db: DatabaseConnection,
) -> anyhow::Result<()> {
    let today = calendar.local_date(Utc::now());
    match command {
        AddCommand::Client(args) => {
            let uc = CreateClientUseCase {
                repo: DbClientRepository { db },
            };
            let client = uc.execute(args.into()).await?;
            println!("Created client {} ({})", client.name, client.short_code);
        }
        AddCommand::Project(args) => {
            let uc = CreateProjectUseCase {
                clients: DbClientRepository { db: db.clone() },
                projects: DbProjectRepository { db },
            };
            let project = uc.execute(args.into()).await?;
            println!("Created project #{} {}", project.id, project.name);
        }
        AddCommand::Task(args) => {
            let uc = CreateTaskUseCase {
                projects: DbProjectRepository { db },
            };
            let task = uc.execute(args.into(), today).await?;
            println!("Created task #{} {}", task.id, task.title);
        }
        AddCommand::Milestone(args) => {
            let uc = CreateMilestoneUseCase {
                projects: DbProjectRepository { db },
            };
            let milestone = uc.execute(args.into()).await?;
            println!("Created milestone #{} {}", milestone.id, milestone.title);
        }
        AddCommand::Service(args) => {
            let uc = CreateServiceUseCase {
                clients: DbClientRepository { db: db.clone() },
                services: DbServiceRepository { db },
            };
            let service = uc.execute(args.into(), today).await?;
            println!(
                "Created service #{} {} - {}",
                service.id, service.service_type, service.name
            );
        }
        AddCommand::Invoice(args) => {
            let uc = CreateInvoiceUseCase {
                clients: DbClientRepository { db: db.clone() },
                projects: DbProjectRepository { db: db.clone() },
                invoices: DbInvoiceRepository { db },
            };
            let invoice = uc.execute(args.into(), today).await?;
            println!(
                "Created invoice {} for {} due {}",
                invoice.invoice_number, invoice.amount, invoice.due_date
            );
        }
        AddCommand::Payment(args) => {
            let uc = RecordPaymentUseCase {
                invoices: DbInvoiceRepository { db },
            };
            let payment = uc.execute(args.into(), today).await?;
            println!("Recorded {payment} on {}", payment.date);
        }
        AddCommand::Expense(args) => {
            let uc = LogExpenseUseCase {
                services: DbServiceRepository { db: db.clone() },
                expenses: DbExpenseRepository { db },
            };
            let expense = uc.execute(args.into(), today).await?;
            println!("Logged expense #{} {expense}", expense.id);
        }
        AddCommand::Credential(args) => {
            let uc = CreateCredentialUseCase {
                services: DbServiceRepository { db },
            };
            let credential = uc.execute(args.into()).await?;
            println!("Stored {credential}");
        }
        AddCommand::Note(args) => {
            let uc = CreateNoteUseCase {
                notes: DbNoteRepository { db },
            };
            let note = uc.execute(args.into()).await?;
            println!("Created note #{} {note}", note.id);
        }
        AddCommand::TimeEntry(args) => {
            let uc = LogTimeEntryUseCase {
                entries: DbTimeEntryRepository { db },
            };
            let entry = uc.execute(args.into()).await?;
            info!(time_entry_id = %entry.id, "time entry logged");
            println!("Logged time entry #{} {}", entry.id, entry.description);
        }
    }
    Ok(())
}

async fn update_record(command: UpdateCommand, db: DatabaseConnection) -> anyhow::Result<()> {
    match command {
        UpdateCommand::Milestone { id, reopen } => {
            let uc = CompleteMilestoneUseCase {
                projects: DbProjectRepository { db },
            };
            let milestone = uc.execute(id, !reopen).await?;
            println!("Milestone #{} {milestone}", milestone.id);
        }
        UpdateCommand::Task { id, status } => {
            let uc = UpdateTaskStatusUseCase {
                projects: DbProjectRepository { db },
            };
            let task = uc.execute(id, status).await?;
            println!("Task #{} {} is now {}", task.id, task.title, task.status.label());
        }
        UpdateCommand::Invoice { id, status } => {
            let uc = SetInvoiceStatusUseCase {
                invoices: DbInvoiceRepository { db },
            };
            let invoice = uc.execute(id, status).await?;
            println!("Invoice {} is now {}", invoice.invoice_number, invoice.status.label());
        }
    }
    Ok(())
}
