//! Records a small year of activity for one member and prints their
//! statement as JSON.
//!
//! Run with `cargo run --example member_statement [settings.toml]`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use njangi_core::utils::{init_tracing, MemoryStorage};
use njangi_core::{
    BankAccount, BankTransaction, Contribution, JsonStatementRenderer, Loan, LoanStatus, Meeting,
    Member, Njangi, NjangiError, NjangiResult, NjangiSettings, Repayment,
};

fn day(month: u32, day: u32) -> NjangiResult<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, month, day)
        .ok_or_else(|| NjangiError::Validation(format!("invalid date 2024-{}-{}", month, day)))
}

#[tokio::main]
async fn main() -> NjangiResult<()> {
    let path = std::env::args().nth(1);
    let settings = NjangiSettings::load(path.as_deref())?;
    init_tracing(&settings.log_filter);

    let mut njangi = Njangi::with_settings(MemoryStorage::new(), settings);

    let group = njangi
        .create_group("Buea Traders".to_string(), "buea-traders".to_string())
        .await?;
    let member = njangi
        .create_member(Member::new(
            "Ngozi".to_string(),
            "Tabe".to_string(),
            Some(group.id),
        ))
        .await?;
    let meeting = njangi
        .create_meeting(Meeting::new("Main".to_string(), 2024, Some(group.id)))
        .await?;
    let membership = njangi
        .join_meeting(&member.id, &meeting.id, BigDecimal::from(25))
        .await?;

    for month in 1..=4 {
        njangi
            .record_contribution(Contribution::new(
                membership.id,
                BigDecimal::from(25),
                day(month, 5)?,
            ))
            .await?;
    }

    let loan = njangi
        .create_loan(Loan::new(
            membership.id,
            BigDecimal::from(120),
            BigDecimal::from(10),
        ))
        .await?;
    njangi
        .set_loan_status(&loan.id, LoanStatus::Approved)
        .await?;
    njangi
        .record_repayment(Repayment::new(loan.id, BigDecimal::from(50), day(3, 20)?))
        .await?;

    let account = njangi
        .open_bank_account(BankAccount::new(
            "Union Bank".to_string(),
            BigDecimal::from(300),
            Some(group.id),
        ))
        .await?;
    njangi
        .record_bank_transaction(BankTransaction::credit(
            account.id,
            BigDecimal::from(100),
            day(4, 6)?,
        ))
        .await?;

    let rendered = njangi
        .export_statement(&member.id, None, &JsonStatementRenderer::pretty())
        .await?;
    println!("{} ({})", rendered.filename, rendered.content_type);
    println!("{}", String::from_utf8_lossy(&rendered.body));

    let dashboard = njangi.dashboard(Some(&group.id)).await?;
    println!(
        "bank balance {} / estimated cash {}",
        dashboard.bank_balance, dashboard.estimated_cash_position
    );

    Ok(())
}
