use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};

use devsuite_domain::calendar::DayBoundary;
use devsuite_domain::entity::EntityRef;
use devsuite_domain::id::{InvoiceId, MilestoneId, ServiceId, TaskId, TimeEntryId};
use devsuite_domain::money::Money;
use devsuite_domain::status::{InvoiceStatus, NotificationStatus, ServiceType, TaskStatus};
use devsuite_ops::domain::types::{
    ClientContact, InvoiceDue, MilestoneDue, Notification, NotificationRequest, RecentTimeEntry,
    ServiceExpiring, TaskDue,
};
use devsuite_ops::error::OpsServiceError;
use devsuite_ops::usecase::reminder::SendRemindersUseCase;

use crate::helpers::{
    FailingReminderSource, MockDirectory, MockNotificationRepo, MockReminderSource,
    RecordingMailer, acme, now, project_due, today, tomorrow,
};

const ADMIN: &str = "admin@devsuite.test";

fn sweep<S: devsuite_ops::domain::repository::ReminderSource>(
    source: S,
    notifications: MockNotificationRepo,
    directory: MockDirectory,
    mailer: RecordingMailer,
) -> SendRemindersUseCase<S, MockNotificationRepo, MockDirectory, RecordingMailer> {
    SendRemindersUseCase {
        source,
        notifications,
        directory,
        mailer,
        from_email: "noreply@devsuite.test".to_owned(),
        calendar: DayBoundary::utc(),
    }
}

fn invoice(id: i32, status: InvoiceStatus) -> InvoiceDue {
    InvoiceDue {
        id: InvoiceId(id),
        invoice_number: format!("ACM001-{id:04}"),
        amount: Money(150_000),
        due_date: tomorrow(),
        status,
        client: acme(),
    }
}

fn task(id: i32, status: TaskStatus) -> TaskDue {
    TaskDue {
        id: TaskId(id),
        title: format!("Task {id}"),
        due_date: tomorrow(),
        status,
        project_name: "Acme Launch".to_owned(),
    }
}

fn milestone(id: i32, is_completed: bool) -> MilestoneDue {
    MilestoneDue {
        id: MilestoneId(id),
        title: "Beta".to_owned(),
        due_date: tomorrow(),
        is_completed,
        project_name: "Acme Launch".to_owned(),
        client: acme(),
    }
}

fn time_entry(id: i32, ended_hours_ago: i64) -> RecentTimeEntry {
    let end_time = now() - TimeDelta::hours(ended_hours_ago);
    RecentTimeEntry {
        id: TimeEntryId(id),
        description: "Fix login".to_owned(),
        start_time: end_time - TimeDelta::minutes(90),
        end_time,
    }
}

// ── Projects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_notify_client_and_admin_for_project_due_tomorrow() {
    let source = MockReminderSource {
        projects: vec![project_due(1, "Acme Launch", tomorrow(), acme())],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();
    let mailer = RecordingMailer::new();
    let sent = mailer.sent_handle();

    let report = sweep(source, repo, MockDirectory::admins(&[ADMIN]), mailer)
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 0);

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 2);
    let client = stored.iter().find(|n| n.recipient == "ops@acme.test").unwrap();
    assert_eq!(client.subject, "Project Deadline Reminder: Acme Launch");
    let admin = stored.iter().find(|n| n.recipient == ADMIN).unwrap();
    assert_eq!(admin.subject, "Admin Alert: Project Deadline - Acme Launch");
    for n in stored.iter() {
        assert_eq!(n.status, NotificationStatus::Sent);
        assert_eq!(n.sent_at, Some(now()));
        assert_eq!(n.updated_at, n.created_at);
        assert_eq!(n.created_on, today());
        assert_eq!(n.entity, Some(EntityRef::Project(devsuite_domain::id::ProjectId(1))));
    }

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.from == "noreply@devsuite.test"));
}

#[tokio::test]
async fn should_ignore_projects_not_due_tomorrow() {
    let later = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
    let source = MockReminderSource {
        projects: vec![
            project_due(1, "Today", today(), acme()),
            project_due(2, "Later", later, acme()),
        ],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    let report = sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 0);
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_create_nothing_new_when_run_twice_on_the_same_day() {
    let source = MockReminderSource {
        projects: vec![project_due(1, "Acme Launch", tomorrow(), acme())],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();
    let mailer = RecordingMailer::new();
    let sent = mailer.sent_handle();
    let uc = sweep(source, repo, MockDirectory::admins(&[ADMIN]), mailer);

    uc.execute(now()).await.unwrap();
    let second = uc.execute(now() + TimeDelta::hours(3)).await.unwrap();

    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(stored.lock().unwrap().len(), 2);
    assert_eq!(sent.lock().unwrap().len(), 2, "each recipient emailed exactly once");
}

#[tokio::test]
async fn should_still_notify_admin_when_client_email_is_blank() {
    let source = MockReminderSource {
        projects: vec![project_due(
            1,
            "Acme Launch",
            tomorrow(),
            ClientContact::new("Acme", ""),
        )],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    let report = sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 1);
    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].recipient, ADMIN);
}

// ── Milestones ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_notify_open_milestone_to_client_and_admin() {
    let source = MockReminderSource {
        milestones: vec![milestone(4, false)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 2);
    let client = stored.iter().find(|n| n.recipient == "ops@acme.test").unwrap();
    assert_eq!(client.subject, "Milestone Due: Beta");
    assert!(
        client
            .message
            .contains("The milestone 'Beta' for project 'Acme Launch' is due on 2026-05-11.")
    );
    let admin = stored.iter().find(|n| n.recipient == ADMIN).unwrap();
    assert_eq!(admin.subject, "Admin Alert: Milestone Due - Beta");
    assert_eq!(admin.entity, Some(EntityRef::Milestone(MilestoneId(4))));
}

#[tokio::test]
async fn should_skip_completed_milestone() {
    let source = MockReminderSource {
        milestones: vec![milestone(4, true)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert!(stored.lock().unwrap().is_empty());
}

// ── Tasks ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_notify_every_admin_for_open_task_only() {
    let source = MockReminderSource {
        tasks: vec![task(1, TaskStatus::InProgress), task(2, TaskStatus::Done)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    let report = sweep(
        source,
        repo,
        MockDirectory::admins(&[ADMIN, "lead@devsuite.test"]),
        RecordingMailer::new(),
    )
    .execute(now())
    .await
    .unwrap();

    assert_eq!(report.created, 2);
    let stored = stored.lock().unwrap();
    assert!(stored.iter().all(|n| n.subject == "Task Due: Task 1"));
    assert!(stored.iter().all(|n| n.entity == Some(EntityRef::Task(TaskId(1)))));
    assert!(stored.iter().any(|n| n.recipient == "lead@devsuite.test"));
}

// ── Services ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_warn_client_only_about_expiring_service() {
    let source = MockReminderSource {
        services: vec![ServiceExpiring {
            id: ServiceId(2),
            name: "acme.test".to_owned(),
            service_type: ServiceType::Domain,
            expiry_date: tomorrow(),
            client: acme(),
        }],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipient, "ops@acme.test");
    assert_eq!(stored[0].subject, "Service Expiry Warning: acme.test");
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_notify_client_for_sent_invoice() {
    let source = MockReminderSource {
        invoices: vec![invoice(1, InvoiceStatus::Sent)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipient, "ops@acme.test");
    assert_eq!(stored[0].subject, "Invoice Due: ACM001-0001");
}

#[tokio::test]
async fn should_only_notify_invoices_awaiting_payment() {
    let source = MockReminderSource {
        invoices: vec![
            invoice(1, InvoiceStatus::Draft),
            invoice(2, InvoiceStatus::Paid),
            invoice(3, InvoiceStatus::Cancelled),
            invoice(4, InvoiceStatus::Overdue),
        ],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].entity, Some(EntityRef::Invoice(InvoiceId(4))));
}

#[tokio::test]
async fn should_send_nothing_for_draft_invoice() {
    let source = MockReminderSource {
        invoices: vec![invoice(1, InvoiceStatus::Draft)],
        ..Default::default()
    };
    let mailer = RecordingMailer::new();
    let sent = mailer.sent_handle();

    let report = sweep(
        source,
        MockNotificationRepo::empty(),
        MockDirectory::admins(&[ADMIN]),
        mailer,
    )
    .execute(now())
    .await
    .unwrap();

    assert_eq!(report.created, 0);
    assert!(sent.lock().unwrap().is_empty());
}

// ── Time entries ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_notify_admins_once_for_recent_time_entry() {
    let source = MockReminderSource {
        time_entries: vec![time_entry(9, 2)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();
    let uc = sweep(
        source,
        repo,
        MockDirectory::admins(&[ADMIN, "lead@devsuite.test"]),
        RecordingMailer::new(),
    );

    let first = uc.execute(now()).await.unwrap();
    assert_eq!(first.created, 2, "one notification per admin");

    // Next day the entry is still inside the 24h window.
    let second = uc.execute(now() + TimeDelta::hours(20)).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 2, "one skip per admin, like every other class");

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|n| n.subject == "Time Entry Logged: Fix login"));
    assert!(stored[0].message.contains("Duration: 1:30:00"));
}

#[tokio::test]
async fn should_never_renotify_time_entry_seen_on_an_earlier_day() {
    let earlier = Notification::pending(
        NotificationRequest::new(
            "someone-else@devsuite.test",
            "Time Entry Logged: Fix login",
            "",
            Some(EntityRef::TimeEntry(TimeEntryId(9))),
        ),
        now() - TimeDelta::days(1),
        today().pred_opt().unwrap(),
    );
    let source = MockReminderSource {
        time_entries: vec![time_entry(9, 1)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::new(vec![earlier]);
    let stored = repo.handle();

    let report = sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_ignore_time_entries_outside_last_24_hours() {
    let source = MockReminderSource {
        time_entries: vec![time_entry(1, 25)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, MockDirectory::admins(&[ADMIN]), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert!(stored.lock().unwrap().is_empty());
}

// ── Delivery and recipients ──────────────────────────────────────────────────

#[tokio::test]
async fn should_record_failed_delivery_and_keep_going() {
    let source = MockReminderSource {
        projects: vec![project_due(1, "Acme Launch", tomorrow(), acme())],
        invoices: vec![invoice(2, InvoiceStatus::Sent)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    let report = sweep(
        source,
        repo,
        MockDirectory::admins(&[ADMIN]),
        RecordingMailer::failing_for(&["ops@acme.test"]),
    )
    .execute(now())
    .await
    .unwrap();

    assert_eq!(report.created, 3);
    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 2);

    let stored = stored.lock().unwrap();
    for n in stored.iter().filter(|n| n.recipient == "ops@acme.test") {
        assert_eq!(n.status, NotificationStatus::Failed);
        assert!(n.sent_at.is_none());
        assert_eq!(n.updated_at, now());
    }
    let admin = stored.iter().find(|n| n.recipient == ADMIN).unwrap();
    assert_eq!(admin.status, NotificationStatus::Sent);
}

#[tokio::test]
async fn should_not_retry_failed_delivery_on_same_day() {
    let source = MockReminderSource {
        invoices: vec![invoice(2, InvoiceStatus::Sent)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();
    let uc = sweep(
        source,
        repo,
        MockDirectory::none(),
        RecordingMailer::failing_for(&["ops@acme.test"]),
    );

    uc.execute(now()).await.unwrap();
    let second = uc.execute(now()).await.unwrap();

    assert_eq!(second.created, 0);
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_proceed_without_admins() {
    let source = MockReminderSource {
        projects: vec![project_due(1, "Acme Launch", tomorrow(), acme())],
        tasks: vec![task(1, TaskStatus::Todo)],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    let report = sweep(source, repo, MockDirectory::none(), RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(stored.lock().unwrap()[0].recipient, "ops@acme.test");
}

#[tokio::test]
async fn should_fall_back_to_superusers_when_no_admins_configured() {
    let source = MockReminderSource {
        tasks: vec![task(1, TaskStatus::Todo)],
        ..Default::default()
    };
    let directory = MockDirectory {
        admins: vec![],
        superusers: vec!["root@devsuite.test".to_owned(), "  ".to_owned()],
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, directory, RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipient, "root@devsuite.test");
}

#[tokio::test]
async fn should_prefer_configured_admins_over_superusers() {
    let source = MockReminderSource {
        tasks: vec![task(1, TaskStatus::Todo)],
        ..Default::default()
    };
    let directory = MockDirectory {
        admins: vec![crate::helpers::admin(ADMIN)],
        superusers: vec!["root@devsuite.test".to_owned()],
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();

    sweep(source, repo, directory, RecordingMailer::new())
        .execute(now())
        .await
        .unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipient, ADMIN);
}

#[tokio::test]
async fn should_skip_without_sending_when_concurrent_sweep_claimed_key() {
    let winner = Notification::pending(
        NotificationRequest::new(
            "ops@acme.test",
            "Invoice Due: ACM001-0002",
            "",
            Some(EntityRef::Invoice(InvoiceId(2))),
        ),
        now(),
        today(),
    );
    let source = MockReminderSource {
        invoices: vec![invoice(2, InvoiceStatus::Sent)],
        ..Default::default()
    };
    let mut repo = MockNotificationRepo::new(vec![winner]);
    repo.blind_key_check = true;
    let stored = repo.handle();
    let mailer = RecordingMailer::new();
    let sent = mailer.sent_handle();

    let report = sweep(source, repo, MockDirectory::none(), mailer)
        .execute(now())
        .await
        .unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 1);
    assert!(sent.lock().unwrap().is_empty());
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_use_configured_day_boundary_for_tomorrow() {
    // 23:30 UTC on the 10th is already the 11th at UTC+05:45.
    let late = Utc.with_ymd_and_hms(2026, 5, 10, 23, 30, 0).unwrap();
    let the_12th = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
    let source = MockReminderSource {
        projects: vec![
            project_due(1, "Utc Tomorrow", tomorrow(), acme()),
            project_due(2, "Local Tomorrow", the_12th, acme()),
        ],
        ..Default::default()
    };
    let repo = MockNotificationRepo::empty();
    let stored = repo.handle();
    let mut uc = sweep(source, repo, MockDirectory::none(), RecordingMailer::new());
    uc.calendar = DayBoundary::from_offset_minutes(345).unwrap();

    uc.execute(late).await.unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subject, "Project Deadline Reminder: Local Tomorrow");
    assert_eq!(stored[0].created_on, tomorrow());
}

#[tokio::test]
async fn should_propagate_store_errors() {
    let result = sweep(
        FailingReminderSource,
        MockNotificationRepo::empty(),
        MockDirectory::admins(&[ADMIN]),
        RecordingMailer::new(),
    )
    .execute(now())
    .await;

    assert!(
        matches!(result, Err(OpsServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}
