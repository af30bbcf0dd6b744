//! Assembly of a member's exportable statement
//!
//! The result is plain data. Renderers (PDF, CSV, XLSX, JSON) read it
//! without needing anything else from storage.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::settings::StatementSettings;
use crate::summary::{LoanRecord, MemberSnapshot, MemberStatement};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: LoanId,
    pub principal: BigDecimal,
    pub interest_rate: BigDecimal,
    pub status: LoanStatus,
    pub due_date: Option<NaiveDate>,
    pub outstanding: BigDecimal,
}

impl From<&LoanRecord> for LoanRow {
    fn from(record: &LoanRecord) -> Self {
        Self {
            id: record.loan.id,
            principal: record.loan.principal.clone(),
            interest_rate: record.loan.interest_rate.clone(),
            status: record.loan.status,
            due_date: record.loan.due_date,
            outstanding: record.outstanding(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentRow {
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub loan_id: LoanId,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Contribution,
    Repayment,
}

/// One line of the merged contribution/repayment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub kind: HistoryKind,
    pub amount: BigDecimal,
    /// Meeting label for contributions, `Loan <id>` for repayments
    pub related: String,
}

/// Everything a statement renderer needs, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementReport {
    pub summary: MemberStatement,
    pub loans: Vec<LoanRow>,
    pub repayments: Vec<RepaymentRow>,
    pub history: Vec<HistoryEntry>,
}

/// Stable sort, latest date first. Equal dates keep their given order.
fn newest_first<T>(items: &mut [&T], date: impl Fn(&T) -> NaiveDate) {
    items.sort_by(|a, b| date(*b).cmp(&date(*a)));
}

/// Build the statement for a member. `meeting` scopes the summary block;
/// the tables always cover every membership.
pub fn assemble_statement(
    snapshot: &MemberSnapshot,
    meeting: Option<&MeetingId>,
    eligibility_factor: &BigDecimal,
    limits: &StatementSettings,
) -> StatementReport {
    let report = StatementReport {
        summary: snapshot.statement(meeting, eligibility_factor),
        loans: loan_rows(snapshot),
        repayments: repayment_rows(snapshot, limits.repayments_per_loan),
        history: merged_history(snapshot, limits),
    };
    tracing::debug!(
        member = %snapshot.member.id,
        loans = report.loans.len(),
        repayments = report.repayments.len(),
        history = report.history.len(),
        "assembled statement"
    );
    report
}

/// Every loan of the member, most recently created first
pub fn loan_rows(snapshot: &MemberSnapshot) -> Vec<LoanRow> {
    let mut loans: Vec<&LoanRecord> = snapshot.loans_in(None).collect();
    // latest insertion wins a created_at tie
    loans.reverse();
    loans.sort_by(|a, b| b.loan.created_at.cmp(&a.loan.created_at));
    loans.into_iter().map(LoanRow::from).collect()
}

/// Up to `per_loan` most recent repayments of each loan, latest first
pub fn repayment_rows(snapshot: &MemberSnapshot, per_loan: usize) -> Vec<RepaymentRow> {
    let mut rows = Vec::new();
    for record in snapshot.loans_in(None) {
        let mut repayments: Vec<&Repayment> = record.repayments.iter().collect();
        newest_first(&mut repayments, |r| r.date);
        rows.extend(repayments.into_iter().take(per_loan).map(|r| RepaymentRow {
            date: r.date,
            amount: r.amount.clone(),
            loan_id: record.loan.id,
            note: r.note.clone(),
        }));
    }
    rows
}

/// Contributions and repayments interleaved, latest first
///
/// Entries are gathered per membership (its contributions, then each loan's
/// repayments) and stable-sorted by date, so on equal dates a contribution
/// precedes the repayments of the same membership.
pub fn merged_history(snapshot: &MemberSnapshot, limits: &StatementSettings) -> Vec<HistoryEntry> {
    let per_source = limits.history_per_source_limit.unwrap_or(usize::MAX);
    let mut entries = Vec::new();

    for record in &snapshot.memberships {
        let related = record.meeting.label();
        let mut contributions: Vec<&Contribution> = record.contributions.iter().collect();
        newest_first(&mut contributions, |c| c.date);
        entries.extend(contributions.into_iter().take(per_source).map(|c| HistoryEntry {
            date: c.date,
            kind: HistoryKind::Contribution,
            amount: c.amount.clone(),
            related: related.clone(),
        }));

        for loan in &record.loans {
            let related = format!("Loan {}", loan.loan.id);
            let mut repayments: Vec<&Repayment> = loan.repayments.iter().collect();
            newest_first(&mut repayments, |r| r.date);
            entries.extend(repayments.into_iter().take(per_source).map(|r| HistoryEntry {
                date: r.date,
                kind: HistoryKind::Repayment,
                amount: r.amount.clone(),
                related: related.clone(),
            }));
        }
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limits.history_limit);
    entries
}
