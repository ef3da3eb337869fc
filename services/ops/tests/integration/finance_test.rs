use chrono::NaiveDate;

use devsuite_domain::money::Money;
use devsuite_domain::status::InvoiceStatus;
use devsuite_ops::usecase::finance::{DEFAULT_FINANCE_RECENT_LIMIT, FinanceSummaryUseCase};

use crate::helpers::{MockExpenseRepo, MockInvoiceRepo, test_expense, test_invoice};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
}

#[tokio::test]
async fn should_split_invoice_totals_by_payment_state() {
    let uc = FinanceSummaryUseCase {
        invoices: MockInvoiceRepo::new(vec![
            test_invoice(1, Money(100_000), InvoiceStatus::Paid, day(1)),
            test_invoice(2, Money(25_000), InvoiceStatus::Paid, day(2)),
            test_invoice(3, Money(40_000), InvoiceStatus::Sent, day(3)),
            test_invoice(4, Money(10_000), InvoiceStatus::Overdue, day(4)),
            test_invoice(5, Money(99_000), InvoiceStatus::Draft, day(5)),
            test_invoice(6, Money(77_000), InvoiceStatus::Cancelled, day(6)),
        ]),
        expenses: MockExpenseRepo::new(vec![
            test_expense(1, Money(20_000), day(1)),
            test_expense(2, Money(5_000), day(2)),
        ]),
    };

    let summary = uc.execute(None).await.unwrap();

    assert_eq!(summary.total_income, Money(125_000));
    assert_eq!(summary.pending_income, Money(50_000));
    assert_eq!(summary.total_expenses, Money(25_000));
    assert_eq!(summary.net_profit(), Money(100_000));
}

#[tokio::test]
async fn should_list_five_newest_records_by_default() {
    let invoices = (1..=7)
        .map(|i| test_invoice(i, Money(1_000), InvoiceStatus::Sent, day(i as u32)))
        .collect();
    let expenses = (1..=7)
        .map(|i| test_expense(i, Money(100), day(i as u32)))
        .collect();
    let uc = FinanceSummaryUseCase {
        invoices: MockInvoiceRepo::new(invoices),
        expenses: MockExpenseRepo::new(expenses),
    };

    let summary = uc.execute(None).await.unwrap();

    assert_eq!(summary.recent_invoices.len(), DEFAULT_FINANCE_RECENT_LIMIT as usize);
    assert_eq!(summary.recent_invoices[0].date_issued, day(7));
    assert_eq!(summary.recent_expenses.len(), DEFAULT_FINANCE_RECENT_LIMIT as usize);
    assert_eq!(summary.recent_expenses[0].date, day(7));
}

#[tokio::test]
async fn should_report_zero_totals_without_records() {
    let uc = FinanceSummaryUseCase {
        invoices: MockInvoiceRepo::default(),
        expenses: MockExpenseRepo::default(),
    };

    let summary = uc.execute(Some(10)).await.unwrap();

    assert_eq!(summary.total_income, Money(0));
    assert_eq!(summary.net_profit(), Money(0));
    assert!(summary.recent_invoices.is_empty());
    assert!(summary.recent_expenses.is_empty());
}
