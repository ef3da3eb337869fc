use devsuite_domain::code::CodeError;
use devsuite_domain::validation::ValidationError;

/// Ops service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum OpsServiceError {
    #[error("client not found")]
    ClientNotFound,
    #[error("project not found")]
    ProjectNotFound,
    #[error("milestone not found")]
    MilestoneNotFound,
    #[error("task not found")]
    TaskNotFound,
    #[error("service not found")]
    ServiceNotFound,
    #[error("invoice not found")]
    InvoiceNotFound,
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("short code already taken")]
    ShortCodeTaken,
    #[error("no free short codes for prefix {0}")]
    CodeSpaceExhausted(String),
    #[error("could not allocate a unique code")]
    CodeConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OpsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::MilestoneNotFound => "MILESTONE_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ServiceNotFound => "SERVICE_NOT_FOUND",
            Self::InvoiceNotFound => "INVOICE_NOT_FOUND",
            Self::Invalid(_) => "INVALID",
            Self::ShortCodeTaken => "SHORT_CODE_TAKEN",
            Self::CodeSpaceExhausted(_) => "CODE_SPACE_EXHAUSTED",
            Self::CodeConflict => "CODE_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<CodeError> for OpsServiceError {
    fn from(err: CodeError) -> Self {
        match err {
            CodeError::ShortCodesExhausted(prefix) => Self::CodeSpaceExhausted(prefix),
            CodeError::EmptyName => Self::Invalid(ValidationError::Blank("name")),
        }
    }
}

/// Failure to hand a message to the mail transport.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
}
