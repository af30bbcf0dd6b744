//! Loan and bank arithmetic over records already loaded from storage
//!
//! Nothing in here fails: an empty set of repayments or transactions sums
//! to zero, and an overpaid loan simply has a negative outstanding amount.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::*;

/// Simple, non-compounding interest: `principal × rate / 100`
///
/// The rate is a flat percentage for whatever period the caller agreed on.
pub fn interest_amount(principal: &BigDecimal, interest_rate: &BigDecimal) -> BigDecimal {
    (principal * interest_rate) / BigDecimal::from(100)
}

/// `principal + interest − Σ repayments`
///
/// Repayments belonging to other loans are ignored. A negative result means
/// the loan was overpaid.
pub fn outstanding(loan: &Loan, repayments: &[Repayment]) -> BigDecimal {
    let paid: BigDecimal = repayments
        .iter()
        .filter(|r| r.loan_id == loan.id)
        .map(|r| &r.amount)
        .sum();
    &loan.principal + interest_amount(&loan.principal, &loan.interest_rate) - paid
}

/// Positive for credits, negative for debits
pub fn signed_amount(transaction: &BankTransaction) -> BigDecimal {
    match transaction.kind {
        TransactionKind::Credit => transaction.amount.clone(),
        TransactionKind::Debit => -transaction.amount.clone(),
    }
}

/// Starting balances of `accounts` plus the signed amounts of their
/// transactions. Transactions on accounts outside `accounts` are skipped.
pub fn bank_balance<'a>(
    accounts: impl IntoIterator<Item = &'a BankAccount>,
    transactions: impl IntoIterator<Item = &'a BankTransaction>,
) -> BigDecimal {
    let mut in_scope = HashSet::new();
    let mut balance = BigDecimal::from(0);
    for account in accounts {
        in_scope.insert(account.id);
        balance += &account.starting_balance;
    }
    for transaction in transactions {
        if in_scope.contains(&transaction.account_id) {
            balance += signed_amount(transaction);
        }
    }
    balance
}

/// A single bank account with its transactions in posting order
/// (ascending date, then creation time, then the order they were given in)
#[derive(Debug, Clone)]
pub struct AccountLedger<'a> {
    account: &'a BankAccount,
    transactions: Vec<&'a BankTransaction>,
}

impl<'a> AccountLedger<'a> {
    pub fn new(account: &'a BankAccount, transactions: &'a [BankTransaction]) -> Self {
        let mut transactions: Vec<&BankTransaction> = transactions
            .iter()
            .filter(|t| t.account_id == account.id)
            .collect();
        // stable: equal (date, created_at) keep their given order
        transactions.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Self {
            account,
            transactions,
        }
    }

    pub fn account(&self) -> &'a BankAccount {
        self.account
    }

    pub fn transactions(&self) -> &[&'a BankTransaction] {
        &self.transactions
    }

    /// Walk the ledger from the starting balance. Each call starts over.
    pub fn running_balance(&self) -> RunningBalance<'_, 'a> {
        RunningBalance {
            transactions: self.transactions.iter(),
            balance: self.account.starting_balance.clone(),
        }
    }

    /// Current balance of the account
    pub fn balance(&self) -> BigDecimal {
        bank_balance([self.account], self.transactions.iter().copied())
    }
}

/// Iterator of `(transaction, balance after it)` pairs
#[derive(Debug, Clone)]
pub struct RunningBalance<'l, 'a> {
    transactions: std::slice::Iter<'l, &'a BankTransaction>,
    balance: BigDecimal,
}

impl<'a> Iterator for RunningBalance<'_, 'a> {
    type Item = (&'a BankTransaction, BigDecimal);

    fn next(&mut self) -> Option<Self::Item> {
        let transaction = *self.transactions.next()?;
        self.balance += signed_amount(transaction);
        Some((transaction, self.balance.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.transactions.size_hint()
    }
}

impl ExactSizeIterator for RunningBalance<'_, '_> {}

/// Owned line of a running balance, for handing to callers outside the
/// borrow of an [`AccountLedger`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub transaction: BankTransaction,
    pub balance_after: BigDecimal,
}

impl From<(&BankTransaction, BigDecimal)> for BalanceLine {
    fn from((transaction, balance_after): (&BankTransaction, BigDecimal)) -> Self {
        Self {
            transaction: transaction.clone(),
            balance_after,
        }
    }
}
