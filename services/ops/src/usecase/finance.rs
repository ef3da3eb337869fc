use devsuite_domain::money::Money;
use devsuite_domain::status::InvoiceStatus;

use crate::domain::repository::{ExpenseRepository, InvoiceRepository};
use crate::domain::types::FinanceSummary;
use crate::error::OpsServiceError;

pub const DEFAULT_FINANCE_RECENT_LIMIT: u64 = 5;

// ── FinanceSummary ───────────────────────────────────────────────────────────

pub struct FinanceSummaryUseCase<I: InvoiceRepository, E: ExpenseRepository> {
    pub invoices: I,
    pub expenses: E,
}

impl<I: InvoiceRepository, E: ExpenseRepository> FinanceSummaryUseCase<I, E> {
    /// Income counts paid invoices only; pending income is what is sent or
    /// overdue. Drafts and cancelled invoices count toward neither.
    pub async fn execute(&self, limit: Option<u64>) -> Result<FinanceSummary, OpsServiceError> {
        let limit = limit.unwrap_or(DEFAULT_FINANCE_RECENT_LIMIT);

        let mut total_income = 0;
        let mut pending_income = 0;
        for (status, amount) in self.invoices.totals_by_status().await? {
            if status == InvoiceStatus::Paid {
                total_income += amount.cents();
            } else if status.awaits_payment() {
                pending_income += amount.cents();
            }
        }

        Ok(FinanceSummary {
            total_income: Money(total_income),
            total_expenses: self.expenses.total().await?,
            pending_income: Money(pending_income),
            recent_invoices: self.invoices.list_recent(limit).await?,
            recent_expenses: self.expenses.list_recent(limit).await?,
        })
    }
}
