//! Core records of a Njangi: members, meetings, memberships, contributions,
//! loans, repayments, expenses and bank ledgers

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type GroupId = Uuid;
pub type MemberId = Uuid;
pub type MeetingId = Uuid;
pub type MembershipId = Uuid;
pub type ContributionId = Uuid;
pub type LoanId = Uuid;
pub type RepaymentId = Uuid;
pub type ExpenseId = Uuid;
pub type BankAccountId = Uuid;
pub type BankTransactionId = Uuid;

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Tenant boundary. Members, meetings and bank accounts may be scoped to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Unique, URL friendly handle
    pub slug: String,
    pub created_at: NaiveDateTime,
}

impl Group {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            created_at: now(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A person participating in one or more meetings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub group_id: Option<GroupId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub joined_at: NaiveDate,
}

impl Member {
    /// Create a member who joined today
    pub fn new(first_name: String, last_name: String, group_id: Option<GroupId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            first_name,
            last_name,
            phone: String::new(),
            email: String::new(),
            joined_at: today(),
        }
    }

    pub fn with_contact(mut self, phone: String, email: String) -> Self {
        self.phone = phone;
        self.email = email;
        self
    }

    pub fn with_joined_at(mut self, joined_at: NaiveDate) -> Self {
        self.joined_at = joined_at;
        self
    }

    /// Label used on statements: first and last name, trimmed
    pub fn label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A yearly Njangi cycle, unique by (name, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub group_id: Option<GroupId>,
    pub name: String,
    pub year: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Meeting {
    pub fn new(name: String, year: u32, group_id: Option<GroupId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name,
            year,
            start_date: today(),
            end_date: None,
            created_at: now(),
        }
    }

    pub fn with_dates(mut self, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.year)
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Links a member to a meeting and carries the member's settings for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub member_id: MemberId,
    pub meeting_id: MeetingId,
    pub monthly_due: BigDecimal,
    pub is_active: bool,
}

impl Membership {
    pub fn new(member_id: MemberId, meeting_id: MeetingId, monthly_due: BigDecimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            meeting_id,
            monthly_due,
            is_active: true,
        }
    }
}

/// Savings paid in by a member for one meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub membership_id: MembershipId,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub note: String,
}

impl Contribution {
    pub fn new(membership_id: MembershipId, amount: BigDecimal, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            membership_id,
            amount,
            date,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Lifecycle of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan issued against a membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub membership_id: MembershipId,
    pub principal: BigDecimal,
    /// Flat percentage for whatever period the group agreed on
    pub interest_rate: BigDecimal,
    pub status: LoanStatus,
    pub due_date: Option<NaiveDate>,
    pub approved_at: Option<NaiveDateTime>,
    pub note: String,
    pub created_at: NaiveDateTime,
}

impl Loan {
    /// Create a pending loan
    pub fn new(membership_id: MembershipId, principal: BigDecimal, interest_rate: BigDecimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            membership_id,
            principal,
            interest_rate,
            status: LoanStatus::Pending,
            due_date: None,
            approved_at: None,
            note: String::new(),
            created_at: now(),
        }
    }

    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Simple interest on the principal
    pub fn interest_amount(&self) -> BigDecimal {
        crate::ledger::arithmetic::interest_amount(&self.principal, &self.interest_rate)
    }

    /// Amount still owed given the loan's repayments
    pub fn outstanding(&self, repayments: &[Repayment]) -> BigDecimal {
        crate::ledger::arithmetic::outstanding(self, repayments)
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loan {} ({})", self.id, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    pub id: RepaymentId,
    pub loan_id: LoanId,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub note: String,
}

impl Repayment {
    pub fn new(loan_id: LoanId, amount: BigDecimal, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            date,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Operational expense of a meeting (bank fees, transport, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub meeting_id: MeetingId,
    pub group_id: Option<GroupId>,
    pub amount: BigDecimal,
    pub description: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(meeting_id: MeetingId, amount: BigDecimal, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            meeting_id,
            group_id: None,
            amount,
            description: String::new(),
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    pub group_id: Option<GroupId>,
    pub name: String,
    pub account_number: String,
    pub starting_balance: BigDecimal,
    pub created_at: NaiveDateTime,
}

impl BankAccount {
    pub fn new(name: String, starting_balance: BigDecimal, group_id: Option<GroupId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name,
            account_number: String::new(),
            starting_balance,
            created_at: now(),
        }
    }

    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = account_number.into();
        self
    }
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.account_number.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({})", self.name, self.account_number)
        }
    }
}

/// Direction of a bank transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money into the account
    Credit,
    /// Money out of the account
    Debit,
}

/// One line of a bank account ledger. `amount` is always a magnitude; the
/// sign comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: BankTransactionId,
    pub account_id: BankAccountId,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub kind: TransactionKind,
    pub category: String,
    pub reference: String,
    pub note: String,
    pub created_at: NaiveDateTime,
}

impl BankTransaction {
    pub fn new(
        account_id: BankAccountId,
        kind: TransactionKind,
        amount: BigDecimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            date,
            amount,
            kind,
            category: String::new(),
            reference: String::new(),
            note: String::new(),
            created_at: now(),
        }
    }

    pub fn credit(account_id: BankAccountId, amount: BigDecimal, date: NaiveDate) -> Self {
        Self::new(account_id, TransactionKind::Credit, amount, date)
    }

    pub fn debit(account_id: BankAccountId, amount: BigDecimal, date: NaiveDate) -> Self {
        Self::new(account_id, TransactionKind::Debit, amount, date)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Amount with the sign implied by `kind`
    pub fn signed_amount(&self) -> BigDecimal {
        crate::ledger::arithmetic::signed_amount(self)
    }
}

/// Errors that can occur while keeping Njangi records
#[derive(Debug, thiserror::Error)]
pub enum NjangiError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),
    #[error("Meeting not found: {0}")]
    MeetingNotFound(MeetingId),
    #[error("Membership not found: {0}")]
    MembershipNotFound(MembershipId),
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type for Njangi operations
pub type NjangiResult<T> = Result<T, NjangiError>;
