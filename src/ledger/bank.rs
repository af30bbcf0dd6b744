//! Bank account ledgers

use bigdecimal::BigDecimal;

use crate::ledger::arithmetic::{bank_balance, AccountLedger, BalanceLine};
use crate::traits::*;
use crate::types::*;

/// Bank manager for accounts and their transactions
pub struct BankManager<S: NjangiStorage> {
    storage: S,
    validator: Box<dyn RecordValidator>,
}

impl<S: NjangiStorage> BankManager<S> {
    /// Create a new bank manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultRecordValidator),
        }
    }

    /// Create a new bank manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn RecordValidator>) -> Self {
        Self { storage, validator }
    }

    /// Open a bank account
    pub async fn open_account(&mut self, account: BankAccount) -> NjangiResult<BankAccount> {
        self.validator.validate_bank_account(&account)?;

        if let Some(group_id) = account.group_id {
            if self.storage.get_group(&group_id).await?.is_none() {
                return Err(NjangiError::GroupNotFound(group_id));
            }
        }

        self.storage.save_bank_account(&account).await?;
        tracing::info!(account = %account.id, name = %account.name, "opened bank account");
        Ok(account)
    }

    pub async fn get_account_required(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<BankAccount> {
        self.storage
            .get_bank_account(account_id)
            .await?
            .ok_or(NjangiError::BankAccountNotFound(*account_id))
    }

    pub async fn list_accounts(&self, group: Option<&GroupId>) -> NjangiResult<Vec<BankAccount>> {
        self.storage.list_bank_accounts(group).await
    }

    /// Record a credit or debit on an existing account
    pub async fn record_transaction(
        &mut self,
        transaction: BankTransaction,
    ) -> NjangiResult<BankTransaction> {
        self.validator.validate_bank_transaction(&transaction)?;
        self.get_account_required(&transaction.account_id).await?;

        self.storage.save_bank_transaction(&transaction).await?;
        tracing::info!(
            account = %transaction.account_id,
            kind = ?transaction.kind,
            amount = %transaction.amount,
            "recorded bank transaction"
        );
        Ok(transaction)
    }

    pub async fn list_transactions(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Vec<BankTransaction>> {
        self.storage.list_bank_transactions(account_id).await
    }

    async fn load(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<(BankAccount, Vec<BankTransaction>)> {
        let account = self.get_account_required(account_id).await?;
        let transactions = self.storage.list_bank_transactions(account_id).await?;
        Ok((account, transactions))
    }

    /// Current balance of a single account
    pub async fn account_balance(&self, account_id: &BankAccountId) -> NjangiResult<BigDecimal> {
        let (account, transactions) = self.load(account_id).await?;
        Ok(AccountLedger::new(&account, &transactions).balance())
    }

    /// The account's transactions in posting order with the balance after
    /// each one
    pub async fn running_balance(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Vec<BalanceLine>> {
        let (account, transactions) = self.load(account_id).await?;
        let ledger = AccountLedger::new(&account, &transactions);
        Ok(ledger.running_balance().map(BalanceLine::from).collect())
    }

    /// Combined balance of every account in scope
    pub async fn bank_balance(&self, group: Option<&GroupId>) -> NjangiResult<BigDecimal> {
        let accounts = self.storage.list_bank_accounts(group).await?;
        let mut transactions = Vec::new();
        for account in &accounts {
            transactions.extend(self.storage.list_bank_transactions(&account.id).await?);
        }

        let balance = bank_balance(&accounts, &transactions);
        tracing::debug!(
            accounts = accounts.len(),
            transactions = transactions.len(),
            balance = %balance,
            "computed bank balance"
        );
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[tokio::test]
    async fn test_running_balance_matches_account_balance() {
        let mut bank = BankManager::new(MemoryStorage::new());
        let account = bank
            .open_account(BankAccount::new("Main".to_string(), dec("250.00"), None))
            .await
            .unwrap();

        bank.record_transaction(BankTransaction::credit(account.id, dec("100"), day(3)))
            .await
            .unwrap();
        bank.record_transaction(BankTransaction::debit(account.id, dec("40.50"), day(1)))
            .await
            .unwrap();

        let lines = bank.running_balance(&account.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].balance_after, dec("209.50"));
        assert_eq!(lines[1].balance_after, dec("309.50"));

        let balance = bank.account_balance(&account.id).await.unwrap();
        assert_eq!(balance, lines[1].balance_after);
        assert_eq!(bank.bank_balance(None).await.unwrap(), balance);
    }

    #[tokio::test]
    async fn test_transaction_needs_account() {
        let mut bank = BankManager::new(MemoryStorage::new());
        let orphan = BankTransaction::credit(uuid::Uuid::new_v4(), dec("5"), day(1));
        assert!(matches!(
            bank.record_transaction(orphan).await,
            Err(NjangiError::BankAccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let mut bank = BankManager::new(MemoryStorage::new());
        let account = bank
            .open_account(BankAccount::new("Main".to_string(), dec("0"), None))
            .await
            .unwrap();
        let negative = BankTransaction::debit(account.id, dec("-5"), day(1));
        assert!(matches!(
            bank.record_transaction(negative).await,
            Err(NjangiError::Validation(_))
        ));
        assert!(bank.list_transactions(&account.id).await.unwrap().is_empty());
    }
}
