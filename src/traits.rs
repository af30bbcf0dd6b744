//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::report::StatementReport;
use crate::types::*;

/// Storage abstraction for Njangi records
///
/// Any backend (PostgreSQL, SQLite, in-memory, ...) can drive the core by
/// implementing these methods. `list_*` methods must return records in the
/// order they were saved; report ordering breaks date ties on it.
///
/// Scoped listings take `Option<&GroupId>`: `None` means every record,
/// `Some(group)` only the records owned by that group.
#[async_trait]
pub trait NjangiStorage: Send + Sync {
    async fn save_group(&mut self, group: &Group) -> NjangiResult<()>;

    async fn get_group(&self, group_id: &GroupId) -> NjangiResult<Option<Group>>;

    async fn list_groups(&self) -> NjangiResult<Vec<Group>>;

    async fn save_member(&mut self, member: &Member) -> NjangiResult<()>;

    async fn get_member(&self, member_id: &MemberId) -> NjangiResult<Option<Member>>;

    async fn list_members(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Member>>;

    async fn save_meeting(&mut self, meeting: &Meeting) -> NjangiResult<()>;

    async fn get_meeting(&self, meeting_id: &MeetingId) -> NjangiResult<Option<Meeting>>;

    async fn list_meetings(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Meeting>>;

    async fn save_membership(&mut self, membership: &Membership) -> NjangiResult<()>;

    async fn get_membership(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Option<Membership>>;

    /// Memberships held by one member, across meetings
    async fn list_member_memberships(&self, member_id: &MemberId)
        -> NjangiResult<Vec<Membership>>;

    /// Memberships attached to one meeting
    async fn list_meeting_memberships(
        &self,
        meeting_id: &MeetingId,
    ) -> NjangiResult<Vec<Membership>>;

    async fn save_contribution(&mut self, contribution: &Contribution) -> NjangiResult<()>;

    async fn list_contributions(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Vec<Contribution>>;

    async fn save_loan(&mut self, loan: &Loan) -> NjangiResult<()>;

    async fn get_loan(&self, loan_id: &LoanId) -> NjangiResult<Option<Loan>>;

    async fn update_loan(&mut self, loan: &Loan) -> NjangiResult<()>;

    async fn list_loans(&self, membership_id: &MembershipId) -> NjangiResult<Vec<Loan>>;

    async fn save_repayment(&mut self, repayment: &Repayment) -> NjangiResult<()>;

    async fn list_repayments(&self, loan_id: &LoanId) -> NjangiResult<Vec<Repayment>>;

    async fn save_expense(&mut self, expense: &Expense) -> NjangiResult<()>;

    async fn list_expenses(&self, meeting_id: &MeetingId) -> NjangiResult<Vec<Expense>>;

    async fn save_bank_account(&mut self, account: &BankAccount) -> NjangiResult<()>;

    async fn get_bank_account(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Option<BankAccount>>;

    async fn list_bank_accounts(&self, group: Option<&GroupId>)
        -> NjangiResult<Vec<BankAccount>>;

    async fn save_bank_transaction(&mut self, transaction: &BankTransaction) -> NjangiResult<()>;

    async fn list_bank_transactions(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Vec<BankTransaction>>;
}

/// Trait for implementing custom validation rules on incoming records
pub trait RecordValidator: Send + Sync {
    fn validate_group(&self, group: &Group) -> NjangiResult<()>;

    fn validate_member(&self, member: &Member) -> NjangiResult<()>;

    fn validate_meeting(&self, meeting: &Meeting) -> NjangiResult<()>;

    fn validate_membership(&self, membership: &Membership) -> NjangiResult<()>;

    fn validate_contribution(&self, contribution: &Contribution) -> NjangiResult<()>;

    /// Loan terms only. Eligibility is advisory and never checked here.
    fn validate_loan(&self, loan: &Loan) -> NjangiResult<()>;

    fn validate_repayment(&self, repayment: &Repayment) -> NjangiResult<()>;

    fn validate_expense(&self, expense: &Expense) -> NjangiResult<()>;

    fn validate_bank_account(&self, account: &BankAccount) -> NjangiResult<()>;

    fn validate_bank_transaction(&self, transaction: &BankTransaction) -> NjangiResult<()>;
}

fn require_text(value: &str, what: &str) -> NjangiResult<()> {
    if value.trim().is_empty() {
        return Err(NjangiError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

fn require_positive(amount: &BigDecimal, what: &str) -> NjangiResult<()> {
    if *amount <= BigDecimal::from(0) {
        return Err(NjangiError::Validation(format!("{} must be positive", what)));
    }
    Ok(())
}

fn require_non_negative(amount: &BigDecimal, what: &str) -> NjangiResult<()> {
    if *amount < BigDecimal::from(0) {
        return Err(NjangiError::Validation(format!(
            "{} cannot be negative",
            what
        )));
    }
    Ok(())
}

/// Default validator with the basic record rules
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_group(&self, group: &Group) -> NjangiResult<()> {
        require_text(&group.name, "Group name")?;
        require_text(&group.slug, "Group slug")
    }

    fn validate_member(&self, member: &Member) -> NjangiResult<()> {
        require_text(&member.first_name, "Member first name")
    }

    fn validate_meeting(&self, meeting: &Meeting) -> NjangiResult<()> {
        require_text(&meeting.name, "Meeting name")?;
        if let Some(end_date) = meeting.end_date {
            if end_date < meeting.start_date {
                return Err(NjangiError::Validation(
                    "Meeting cannot end before it starts".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn validate_membership(&self, membership: &Membership) -> NjangiResult<()> {
        require_non_negative(&membership.monthly_due, "Monthly due")
    }

    fn validate_contribution(&self, contribution: &Contribution) -> NjangiResult<()> {
        require_positive(&contribution.amount, "Contribution amount")
    }

    fn validate_loan(&self, loan: &Loan) -> NjangiResult<()> {
        require_positive(&loan.principal, "Loan principal")?;
        require_non_negative(&loan.interest_rate, "Interest rate")
    }

    fn validate_repayment(&self, repayment: &Repayment) -> NjangiResult<()> {
        require_positive(&repayment.amount, "Repayment amount")
    }

    fn validate_expense(&self, expense: &Expense) -> NjangiResult<()> {
        require_positive(&expense.amount, "Expense amount")
    }

    fn validate_bank_account(&self, account: &BankAccount) -> NjangiResult<()> {
        require_text(&account.name, "Bank account name")
    }

    fn validate_bank_transaction(&self, transaction: &BankTransaction) -> NjangiResult<()> {
        // sign lives in `kind`
        require_non_negative(&transaction.amount, "Transaction amount")
    }
}

/// Turns an assembled member statement into a downloadable document
///
/// Implementations own every formatting decision (CSV, XLSX, PDF, JSON).
/// The report they receive is read-only.
pub trait StatementRenderer: Send + Sync {
    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, report: &StatementReport) -> NjangiResult<Vec<u8>>;
}
