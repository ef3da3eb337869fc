//! sea-orm entities for the operations database.

pub mod accounts;
pub mod clients;
pub mod credentials;
pub mod expenses;
pub mod invoices;
pub mod milestones;
pub mod notes;
pub mod notifications;
pub mod payments;
pub mod projects;
pub mod services;
pub mod tasks;
pub mod time_entries;
