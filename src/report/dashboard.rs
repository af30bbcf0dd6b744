//! Group-wide totals shown on the dashboard

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::arithmetic::bank_balance;
use crate::summary::LoanRecord;
use crate::traits::NjangiStorage;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub group_id: Option<GroupId>,
    pub total_members: usize,
    pub total_contributions: BigDecimal,
    pub total_loan_principal: BigDecimal,
    pub outstanding_loans: BigDecimal,
    /// Starting balances plus signed bank transactions
    pub bank_balance: BigDecimal,
    /// Cash position derived from the Njangi's own books: starting balances
    /// + contributions + repayments − approved loan principal − expenses
    pub estimated_cash_position: BigDecimal,
}

/// Records in one tenant scope. Contributions and loans are reached through
/// the scope's meetings, expenses through their own group (falling back to
/// the meeting's), bank data through the scope's accounts.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub group_id: Option<GroupId>,
    pub total_members: usize,
    pub contributions: Vec<Contribution>,
    pub loans: Vec<LoanRecord>,
    pub expenses: Vec<Expense>,
    pub bank_accounts: Vec<BankAccount>,
    pub bank_transactions: Vec<BankTransaction>,
}

impl DashboardInputs {
    pub async fn load<S: NjangiStorage + ?Sized>(
        storage: &S,
        group: Option<&GroupId>,
    ) -> NjangiResult<Self> {
        let mut inputs = Self {
            group_id: group.copied(),
            total_members: storage.list_members(group).await?.len(),
            ..Self::default()
        };

        for meeting in storage.list_meetings(group).await? {
            for membership in storage.list_meeting_memberships(&meeting.id).await? {
                inputs
                    .contributions
                    .extend(storage.list_contributions(&membership.id).await?);
                for loan in storage.list_loans(&membership.id).await? {
                    let repayments = storage.list_repayments(&loan.id).await?;
                    inputs.loans.push(LoanRecord { loan, repayments });
                }
            }
        }

        // an expense's own group wins over its meeting's
        for meeting in storage.list_meetings(None).await? {
            for expense in storage.list_expenses(&meeting.id).await? {
                let owner = expense.group_id.or(meeting.group_id);
                if group.is_none_or(|g| owner.as_ref() == Some(g)) {
                    inputs.expenses.push(expense);
                }
            }
        }

        for account in storage.list_bank_accounts(group).await? {
            inputs
                .bank_transactions
                .extend(storage.list_bank_transactions(&account.id).await?);
            inputs.bank_accounts.push(account);
        }

        Ok(inputs)
    }

    pub fn summarize(&self) -> DashboardSummary {
        let total_contributions: BigDecimal = self.contributions.iter().map(|c| &c.amount).sum();
        let total_loan_principal: BigDecimal =
            self.loans.iter().map(|l| &l.loan.principal).sum();
        let outstanding_loans: BigDecimal = self.loans.iter().map(|l| l.outstanding()).sum();
        let total_repaid: BigDecimal = self.loans.iter().map(|l| l.total_repaid()).sum();
        let disbursed: BigDecimal = self
            .loans
            .iter()
            .filter(|l| l.loan.status == LoanStatus::Approved)
            .map(|l| &l.loan.principal)
            .sum();
        let total_expenses: BigDecimal = self.expenses.iter().map(|e| &e.amount).sum();
        let starting: BigDecimal = self.bank_accounts.iter().map(|a| &a.starting_balance).sum();

        let estimated_cash_position =
            starting + &total_contributions + total_repaid - disbursed - total_expenses;

        DashboardSummary {
            group_id: self.group_id,
            total_members: self.total_members,
            total_contributions,
            total_loan_principal,
            outstanding_loans,
            bank_balance: bank_balance(&self.bank_accounts, &self.bank_transactions),
            estimated_cash_position,
        }
    }
}
