pub mod admins;
pub mod dashboard;
pub mod finance;
pub mod progress;
pub mod records;
pub mod reminder;
