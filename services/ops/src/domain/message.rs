//! Subjects and bodies of reminder emails.

use devsuite_domain::entity::EntityRef;
use devsuite_domain::validation::format_duration;

use crate::domain::types::{
    InvoiceDue, MilestoneDue, NotificationRequest, ProjectDue, RecentTimeEntry, ServiceExpiring,
    TaskDue,
};

const SIGNATURE: &str = "Regards,\nDevSuite";

fn client_letter(client_name: &str, lines: &str) -> String {
    format!("Dear {client_name},\n\n{lines}\n\n{SIGNATURE}")
}

// ── Project ──────────────────────────────────────────────────────────────────

pub fn project_deadline_for_client(project: &ProjectDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Project Deadline Reminder: {}", project.name),
        client_letter(
            &project.client.name,
            &format!("The project '{}' is due on {}.", project.name, project.deadline),
        ),
        Some(EntityRef::Project(project.id)),
    )
}

pub fn project_deadline_for_admin(project: &ProjectDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Admin Alert: Project Deadline - {}", project.name),
        format!(
            "Project '{}' for client {} is due on {}.",
            project.name, project.client.name, project.deadline
        ),
        Some(EntityRef::Project(project.id)),
    )
}

// ── Milestone ────────────────────────────────────────────────────────────────

pub fn milestone_due_for_client(milestone: &MilestoneDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Milestone Due: {}", milestone.title),
        client_letter(
            &milestone.client.name,
            &format!(
                "The milestone '{}' for project '{}' is due on {}.",
                milestone.title, milestone.project_name, milestone.due_date
            ),
        ),
        Some(EntityRef::Milestone(milestone.id)),
    )
}

pub fn milestone_due_for_admin(milestone: &MilestoneDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Admin Alert: Milestone Due - {}", milestone.title),
        format!(
            "Milestone '{}' (Project: {}) is due on {}.",
            milestone.title, milestone.project_name, milestone.due_date
        ),
        Some(EntityRef::Milestone(milestone.id)),
    )
}

// ── Task ─────────────────────────────────────────────────────────────────────

pub fn task_due_for_admin(task: &TaskDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Task Due: {}", task.title),
        format!(
            "Task '{}' (Project: {}) is due on {}.",
            task.title, task.project_name, task.due_date
        ),
        Some(EntityRef::Task(task.id)),
    )
}

// ── Service ──────────────────────────────────────────────────────────────────

pub fn service_expiry_for_client(
    service: &ServiceExpiring,
    recipient: &str,
) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Service Expiry Warning: {}", service.name),
        client_letter(
            &service.client.name,
            &format!(
                "Your service '{}' ({}) expires on {}.\nPlease renew it soon.",
                service.name, service.service_type, service.expiry_date
            ),
        ),
        Some(EntityRef::Service(service.id)),
    )
}

// ── Invoice ──────────────────────────────────────────────────────────────────

pub fn invoice_due_for_client(invoice: &InvoiceDue, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Invoice Due: {}", invoice.invoice_number),
        client_letter(
            &invoice.client.name,
            &format!(
                "Invoice {} for {} is due on {}.\nPlease make payment.",
                invoice.invoice_number, invoice.amount, invoice.due_date
            ),
        ),
        Some(EntityRef::Invoice(invoice.id)),
    )
}

// ── Time entry ───────────────────────────────────────────────────────────────

pub fn time_entry_logged_for_admin(
    entry: &RecentTimeEntry,
    recipient: &str,
) -> NotificationRequest {
    NotificationRequest::new(
        recipient,
        format!("Time Entry Logged: {}", entry.description),
        format!(
            "User logged time for '{}'.\nDuration: {}\nEnd Time: {}",
            entry.description,
            format_duration(entry.duration()),
            entry.end_time
        ),
        Some(EntityRef::TimeEntry(entry.id)),
    )
}
