use sea_orm_migration::prelude::*;

mod m20260101_000001_create_accounts;
mod m20260101_000002_create_clients;
mod m20260101_000003_create_projects;
mod m20260101_000004_create_milestones;
mod m20260101_000005_create_tasks;
mod m20260101_000006_create_services;
mod m20260101_000007_create_invoices;
mod m20260101_000008_create_time_entries;
mod m20260101_000009_create_notifications;
mod m20260101_000010_create_payments;
mod m20260101_000011_create_expenses;
mod m20260101_000012_create_credentials;
mod m20260101_000013_create_notes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_accounts::Migration),
            Box::new(m20260101_000002_create_clients::Migration),
            Box::new(m20260101_000003_create_projects::Migration),
            Box::new(m20260101_000004_create_milestones::Migration),
            Box::new(m20260101_000005_create_tasks::Migration),
            Box::new(m20260101_000006_create_services::Migration),
            Box::new(m20260101_000007_create_invoices::Migration),
            Box::new(m20260101_000008_create_time_entries::Migration),
            Box::new(m20260101_000009_create_notifications::Migration),
            Box::new(m20260101_000010_create_payments::Migration),
            Box::new(m20260101_000011_create_expenses::Migration),
            Box::new(m20260101_000012_create_credentials::Migration),
            Box::new(m20260101_000013_create_notes::Migration),
        ]
    }
}
