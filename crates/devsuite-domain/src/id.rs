//! Newtype wrappers for record identifiers.
//!
//! Every record owned by the operations database uses a serial integer key;
//! the wrappers keep a `ProjectId` from being passed where a `TaskId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }
    };
}

serial_id!(
    /// Identifies a client.
    ClientId
);
serial_id!(
    /// Identifies a project.
    ProjectId
);
serial_id!(
    /// Identifies a project milestone.
    MilestoneId
);
serial_id!(
    /// Identifies a project task.
    TaskId
);
serial_id!(
    /// Identifies a recurring service (domain, hosting, ...).
    ServiceId
);
serial_id!(
    /// Identifies an invoice.
    InvoiceId
);
serial_id!(
    /// Identifies a logged time entry.
    TimeEntryId
);
serial_id!(
    /// Identifies a payment received against an invoice.
    PaymentId
);
serial_id!(
    /// Identifies a business expense.
    ExpenseId
);
serial_id!(
    /// Identifies a login stored for a service.
    CredentialId
);
serial_id!(NoteId);
