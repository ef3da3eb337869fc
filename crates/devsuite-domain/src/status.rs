//! Status and category enums stored as upper-case text columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field}: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

/// Declares a text-backed enum with its column value and display label.
///
/// Parsing is case-insensitive and treats `-` as `_`, so `in-progress` and
/// `IN_PROGRESS` both parse.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Value stored in the database column.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Human-readable label used in message bodies.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
                match normalized.as_str() {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        field: $field,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// Delivery state of a notification.
    NotificationStatus, "notification status" {
        Pending => ("PENDING", "Pending"),
        Sent => ("SENT", "Sent"),
        Failed => ("FAILED", "Failed"),
    }
);

text_enum!(
    ProjectStatus, "project status" {
        Planning => ("PLANNING", "Planning"),
        InProgress => ("IN_PROGRESS", "In Progress"),
        OnHold => ("ON_HOLD", "On Hold"),
        Completed => ("COMPLETED", "Completed"),
        Cancelled => ("CANCELLED", "Cancelled"),
    }
);

text_enum!(
    TaskStatus, "task status" {
        Todo => ("TODO", "To Do"),
        InProgress => ("IN_PROGRESS", "In Progress"),
        Review => ("REVIEW", "Review"),
        Done => ("DONE", "Done"),
    }
);

text_enum!(
    InvoiceStatus, "invoice status" {
        Draft => ("DRAFT", "Draft"),
        Sent => ("SENT", "Sent"),
        Paid => ("PAID", "Paid"),
        Overdue => ("OVERDUE", "Overdue"),
        Cancelled => ("CANCELLED", "Cancelled"),
    }
);

text_enum!(
    ServiceType, "service type" {
        Domain => ("DOMAIN", "Domain"),
        Hosting => ("HOSTING", "Hosting"),
        Vps => ("VPS", "VPS"),
        Ssl => ("SSL", "SSL"),
        Other => ("OTHER", "Other"),
    }
);

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl InvoiceStatus {
    /// Invoices the client still has to pay: sent out, or already overdue.
    pub fn awaits_payment(&self) -> bool {
        matches!(self, Self::Sent | Self::Overdue)
    }
}
