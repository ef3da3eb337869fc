use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::{debug, info, warn};

use devsuite_domain::calendar::DayBoundary;
use devsuite_domain::entity::EntityRef;

use crate::domain::message;
use crate::domain::repository::{
    MailTransport, NotificationRepository, RecipientDirectory, ReminderSource,
};
use crate::domain::types::{Notification, NotificationRequest, OutgoingMail, SweepReport};
use crate::error::OpsServiceError;
use crate::usecase::admins::resolve_admin_emails;

/// How far back a finished time entry still counts as recent.
pub const TIME_ENTRY_WINDOW_HOURS: i64 = 24;

// ── SendReminders ────────────────────────────────────────────────────────────

/// Emails reminders for everything falling due tomorrow.
///
/// Each record class is scanned independently and candidates are dispatched
/// one at a time. A failed delivery is recorded and the sweep moves on; a
/// store error aborts it.
pub struct SendRemindersUseCase<S, N, D, M>
where
    S: ReminderSource,
    N: NotificationRepository,
    D: RecipientDirectory,
    M: MailTransport,
{
    pub source: S,
    pub notifications: N,
    pub directory: D,
    pub mailer: M,
    pub from_email: String,
    pub calendar: DayBoundary,
}

impl<S, N, D, M> SendRemindersUseCase<S, N, D, M>
where
    S: ReminderSource,
    N: NotificationRepository,
    D: RecipientDirectory,
    M: MailTransport,
{
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<SweepReport, OpsServiceError> {
        let today = self.calendar.local_date(now);
        let tomorrow = self.calendar.tomorrow(now);
        info!(%today, %tomorrow, "reminder sweep started");

        let admins = resolve_admin_emails(&self.directory).await?;
        if admins.is_empty() {
            warn!("no admin emails found; admin alerts will not be sent");
        }

        let mut sweep = Sweep {
            today,
            report: SweepReport::default(),
        };

        // Projects: client and admins.
        for project in self.source.projects_due_on(tomorrow).await? {
            if let Some(email) = &project.client.email {
                let request = message::project_deadline_for_client(&project, email);
                self.dispatch(&mut sweep, request, now).await?;
            }
            for admin in &admins {
                self.dispatch(&mut sweep, message::project_deadline_for_admin(&project, admin), now)
                    .await?;
            }
        }

        // Milestones: open ones only, client and admins.
        for milestone in self.source.milestones_due_on(tomorrow).await? {
            if milestone.is_completed {
                continue;
            }
            if let Some(email) = &milestone.client.email {
                self.dispatch(&mut sweep, message::milestone_due_for_client(&milestone, email), now)
                    .await?;
            }
            for admin in &admins {
                self.dispatch(&mut sweep, message::milestone_due_for_admin(&milestone, admin), now)
                    .await?;
            }
        }

        // Tasks: admins only, unless done.
        for task in self.source.tasks_due_on(tomorrow).await? {
            if task.status.is_done() {
                continue;
            }
            for admin in &admins {
                self.dispatch(&mut sweep, message::task_due_for_admin(&task, admin), now)
                    .await?;
            }
        }

        // Services: client only.
        for service in self.source.services_expiring_on(tomorrow).await? {
            if let Some(email) = &service.client.email {
                self.dispatch(&mut sweep, message::service_expiry_for_client(&service, email), now)
                    .await?;
            }
        }

        // Invoices: client only, while awaiting payment.
        for invoice in self.source.invoices_due_on(tomorrow).await? {
            if !invoice.status.awaits_payment() {
                continue;
            }
            if let Some(email) = &invoice.client.email {
                self.dispatch(&mut sweep, message::invoice_due_for_client(&invoice, email), now)
                    .await?;
            }
        }

        // Time entries: admins only, once per entry ever.
        let entries = self
            .source
            .time_entries_ended_between(now - TimeDelta::hours(TIME_ENTRY_WINDOW_HOURS), now)
            .await?;
        for entry in entries {
            let entity = EntityRef::TimeEntry(entry.id);
            if self.notifications.exists_for_entity(entity).await? {
                debug!(%entity, "time entry already notified");
                sweep.report.skipped += admins.len() as u32;
                continue;
            }
            for admin in &admins {
                self.dispatch(&mut sweep, message::time_entry_logged_for_admin(&entry, admin), now)
                    .await?;
            }
        }

        let report = sweep.report;
        info!(
            created = report.created,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "reminder sweep finished"
        );
        Ok(report)
    }

    /// Create, deliver and record one notification unless an identical one
    /// already went out today.
    async fn dispatch(
        &self,
        sweep: &mut Sweep,
        request: NotificationRequest,
        now: DateTime<Utc>,
    ) -> Result<(), OpsServiceError> {
        if let Some(entity) = request.entity {
            let exists = self
                .notifications
                .exists_for_key(&request.recipient, &request.subject, entity, sweep.today)
                .await?;
            if exists {
                debug!(recipient = %request.recipient, subject = %request.subject, %entity, "already notified today");
                sweep.report.skipped += 1;
                return Ok(());
            }
        }

        let mut notification = Notification::pending(request, now, sweep.today);
        if !self.notifications.insert_pending(&notification).await? {
            // Another sweep claimed the same key between the check and the insert.
            debug!(recipient = %notification.recipient, subject = %notification.subject, "dedup key taken");
            sweep.report.skipped += 1;
            return Ok(());
        }
        sweep.report.created += 1;

        let mail = OutgoingMail {
            from: self.from_email.clone(),
            to: notification.recipient.clone(),
            subject: notification.subject.clone(),
            body: notification.message.clone(),
        };
        match self.mailer.send(&mail).await {
            Ok(()) => {
                notification.mark_sent(now);
                sweep.report.sent += 1;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    notification_id = %notification.id,
                    recipient = %notification.recipient,
                    "failed to send notification"
                );
                notification.mark_failed(now);
                sweep.report.failed += 1;
            }
        }

        self.notifications.update_delivery(&notification).await
    }
}

struct Sweep {
    today: NaiveDate,
    report: SweepReport,
}
