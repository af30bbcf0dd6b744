//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Tables {
    groups: Vec<Group>,
    members: Vec<Member>,
    meetings: Vec<Meeting>,
    memberships: Vec<Membership>,
    contributions: Vec<Contribution>,
    loans: Vec<Loan>,
    repayments: Vec<Repayment>,
    expenses: Vec<Expense>,
    bank_accounts: Vec<BankAccount>,
    bank_transactions: Vec<BankTransaction>,
}

/// In-memory storage implementation for testing and development
///
/// Clones share the same tables. Rows are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> NjangiResult<()> {
        *self.write()? = Tables::default();
        Ok(())
    }

    fn read(&self) -> NjangiResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| NjangiError::Storage("memory storage lock poisoned".to_string()))
    }

    fn write(&self) -> NjangiResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| NjangiError::Storage("memory storage lock poisoned".to_string()))
    }
}

/// Insert `row`, or replace the row with the same id in place
fn upsert<T: Clone, K: PartialEq>(rows: &mut Vec<T>, row: &T, key: impl Fn(&T) -> K) {
    let id = key(row);
    match rows.iter_mut().find(|r| key(r) == id) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
    }
}

fn in_scope(owner: Option<&GroupId>, scope: Option<&GroupId>) -> bool {
    scope.is_none_or(|group| owner == Some(group))
}

#[async_trait]
impl NjangiStorage for MemoryStorage {
    async fn save_group(&mut self, group: &Group) -> NjangiResult<()> {
        upsert(&mut self.write()?.groups, group, |g| g.id);
        Ok(())
    }

    async fn get_group(&self, group_id: &GroupId) -> NjangiResult<Option<Group>> {
        Ok(self.read()?.groups.iter().find(|g| g.id == *group_id).cloned())
    }

    async fn list_groups(&self) -> NjangiResult<Vec<Group>> {
        Ok(self.read()?.groups.clone())
    }

    async fn save_member(&mut self, member: &Member) -> NjangiResult<()> {
        upsert(&mut self.write()?.members, member, |m| m.id);
        Ok(())
    }

    async fn get_member(&self, member_id: &MemberId) -> NjangiResult<Option<Member>> {
        Ok(self
            .read()?
            .members
            .iter()
            .find(|m| m.id == *member_id)
            .cloned())
    }

    async fn list_members(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Member>> {
        Ok(self
            .read()?
            .members
            .iter()
            .filter(|m| in_scope(m.group_id.as_ref(), group))
            .cloned()
            .collect())
    }

    async fn save_meeting(&mut self, meeting: &Meeting) -> NjangiResult<()> {
        upsert(&mut self.write()?.meetings, meeting, |m| m.id);
        Ok(())
    }

    async fn get_meeting(&self, meeting_id: &MeetingId) -> NjangiResult<Option<Meeting>> {
        Ok(self
            .read()?
            .meetings
            .iter()
            .find(|m| m.id == *meeting_id)
            .cloned())
    }

    async fn list_meetings(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Meeting>> {
        Ok(self
            .read()?
            .meetings
            .iter()
            .filter(|m| in_scope(m.group_id.as_ref(), group))
            .cloned()
            .collect())
    }

    async fn save_membership(&mut self, membership: &Membership) -> NjangiResult<()> {
        upsert(&mut self.write()?.memberships, membership, |m| m.id);
        Ok(())
    }

    async fn get_membership(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Option<Membership>> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .find(|m| m.id == *membership_id)
            .cloned())
    }

    async fn list_member_memberships(
        &self,
        member_id: &MemberId,
    ) -> NjangiResult<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .filter(|m| m.member_id == *member_id)
            .cloned()
            .collect())
    }

    async fn list_meeting_memberships(
        &self,
        meeting_id: &MeetingId,
    ) -> NjangiResult<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .filter(|m| m.meeting_id == *meeting_id)
            .cloned()
            .collect())
    }

    async fn save_contribution(&mut self, contribution: &Contribution) -> NjangiResult<()> {
        upsert(&mut self.write()?.contributions, contribution, |c| c.id);
        Ok(())
    }

    async fn list_contributions(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Vec<Contribution>> {
        Ok(self
            .read()?
            .contributions
            .iter()
            .filter(|c| c.membership_id == *membership_id)
            .cloned()
            .collect())
    }

    async fn save_loan(&mut self, loan: &Loan) -> NjangiResult<()> {
        upsert(&mut self.write()?.loans, loan, |l| l.id);
        Ok(())
    }

    async fn get_loan(&self, loan_id: &LoanId) -> NjangiResult<Option<Loan>> {
        Ok(self.read()?.loans.iter().find(|l| l.id == *loan_id).cloned())
    }

    async fn update_loan(&mut self, loan: &Loan) -> NjangiResult<()> {
        let mut tables = self.write()?;
        match tables.loans.iter_mut().find(|l| l.id == loan.id) {
            Some(existing) => {
                *existing = loan.clone();
                Ok(())
            }
            None => Err(NjangiError::LoanNotFound(loan.id)),
        }
    }

    async fn list_loans(&self, membership_id: &MembershipId) -> NjangiResult<Vec<Loan>> {
        Ok(self
            .read()?
            .loans
            .iter()
            .filter(|l| l.membership_id == *membership_id)
            .cloned()
            .collect())
    }

    async fn save_repayment(&mut self, repayment: &Repayment) -> NjangiResult<()> {
        upsert(&mut self.write()?.repayments, repayment, |r| r.id);
        Ok(())
    }

    async fn list_repayments(&self, loan_id: &LoanId) -> NjangiResult<Vec<Repayment>> {
        Ok(self
            .read()?
            .repayments
            .iter()
            .filter(|r| r.loan_id == *loan_id)
            .cloned()
            .collect())
    }

    async fn save_expense(&mut self, expense: &Expense) -> NjangiResult<()> {
        upsert(&mut self.write()?.expenses, expense, |e| e.id);
        Ok(())
    }

    async fn list_expenses(&self, meeting_id: &MeetingId) -> NjangiResult<Vec<Expense>> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .filter(|e| e.meeting_id == *meeting_id)
            .cloned()
            .collect())
    }

    async fn save_bank_account(&mut self, account: &BankAccount) -> NjangiResult<()> {
        upsert(&mut self.write()?.bank_accounts, account, |a| a.id);
        Ok(())
    }

    async fn get_bank_account(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Option<BankAccount>> {
        Ok(self
            .read()?
            .bank_accounts
            .iter()
            .find(|a| a.id == *account_id)
            .cloned())
    }

    async fn list_bank_accounts(
        &self,
        group: Option<&GroupId>,
    ) -> NjangiResult<Vec<BankAccount>> {
        Ok(self
            .read()?
            .bank_accounts
            .iter()
            .filter(|a| in_scope(a.group_id.as_ref(), group))
            .cloned()
            .collect())
    }

    async fn save_bank_transaction(&mut self, transaction: &BankTransaction) -> NjangiResult<()> {
        upsert(&mut self.write()?.bank_transactions, transaction, |t| t.id);
        Ok(())
    }

    async fn list_bank_transactions(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Vec<BankTransaction>> {
        Ok(self
            .read()?
            .bank_transactions
            .iter()
            .filter(|t| t.account_id == *account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_scoped_listing() {
        let mut storage = MemoryStorage::new();
        let group = Group::new("Buea".to_string(), "buea".to_string());
        storage.save_group(&group).await.unwrap();

        let scoped = Member::new("Ade".to_string(), String::new(), Some(group.id));
        let unscoped = Member::new("Bih".to_string(), String::new(), None);
        storage.save_member(&scoped).await.unwrap();
        storage.save_member(&unscoped).await.unwrap();

        assert_eq!(storage.list_members(None).await.unwrap().len(), 2);
        let in_group = storage.list_members(Some(&group.id)).await.unwrap();
        assert_eq!(in_group.len(), 1);
        assert_eq!(in_group[0].id, scoped.id);
    }

    #[tokio::test]
    async fn test_save_replaces_in_place() {
        let mut storage = MemoryStorage::new();
        let first = Member::new("Ade".to_string(), String::new(), None);
        let second = Member::new("Bih".to_string(), String::new(), None);
        storage.save_member(&first).await.unwrap();
        storage.save_member(&second).await.unwrap();

        let renamed = Member {
            first_name: "Adeola".to_string(),
            ..first.clone()
        };
        storage.save_member(&renamed).await.unwrap();

        let members = storage.list_members(None).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].first_name, "Adeola");
        assert_eq!(members[1].id, second.id);
    }

    #[tokio::test]
    async fn test_update_missing_loan() {
        let mut storage = MemoryStorage::new();
        let loan = Loan::new(uuid::Uuid::new_v4(), BigDecimal::from(10), BigDecimal::from(1));
        assert!(matches!(
            storage.update_loan(&loan).await,
            Err(NjangiError::LoanNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_tables_and_clear() {
        let mut storage = MemoryStorage::new();
        let other = storage.clone();
        let account = BankAccount::new("Main".to_string(), BigDecimal::from(0), None);
        storage.save_bank_account(&account).await.unwrap();

        assert!(other.get_bank_account(&account.id).await.unwrap().is_some());
        other.clear().unwrap();
        assert!(storage.list_bank_accounts(None).await.unwrap().is_empty());
    }
}
