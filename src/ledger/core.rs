//! Main orchestrator that coordinates the register, the bank and reporting

use bigdecimal::BigDecimal;

use crate::ledger::arithmetic::BalanceLine;
use crate::ledger::{BankManager, RegisterManager};
use crate::report::{
    assemble_statement, statement_filename, DashboardInputs, DashboardSummary, GroupRoster,
    RenderedStatement, StatementReport,
};
use crate::settings::NjangiSettings;
use crate::summary::{MemberSnapshot, MemberStatement};
use crate::traits::*;
use crate::types::*;

/// Main Njangi system that orchestrates all bookkeeping and reporting
pub struct Njangi<S: NjangiStorage> {
    register: RegisterManager<S>,
    bank: BankManager<S>,
    settings: NjangiSettings,
}

impl<S: NjangiStorage + Clone> Njangi<S> {
    /// Create a new Njangi with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, NjangiSettings::default())
    }

    pub fn with_settings(storage: S, settings: NjangiSettings) -> Self {
        Self {
            register: RegisterManager::new(storage.clone()),
            bank: BankManager::new(storage),
            settings,
        }
    }

    /// Create a new Njangi with a custom validator for every write
    pub fn with_validator<V>(storage: S, validator: V, settings: NjangiSettings) -> Self
    where
        V: RecordValidator + Clone + 'static,
    {
        Self {
            register: RegisterManager::with_validator(storage.clone(), Box::new(validator.clone())),
            bank: BankManager::with_validator(storage, Box::new(validator)),
            settings,
        }
    }

    pub fn settings(&self) -> &NjangiSettings {
        &self.settings
    }

    fn storage(&self) -> &S {
        &self.register.storage
    }

    // Register operations
    pub async fn create_group(&mut self, name: String, slug: String) -> NjangiResult<Group> {
        self.register.create_group(name, slug).await
    }

    pub async fn create_member(&mut self, member: Member) -> NjangiResult<Member> {
        self.register.create_member(member).await
    }

    pub async fn update_member(&mut self, member: &Member) -> NjangiResult<()> {
        self.register.update_member(member).await
    }

    pub async fn get_member(&self, member_id: &MemberId) -> NjangiResult<Option<Member>> {
        self.register.get_member(member_id).await
    }

    pub async fn list_members(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Member>> {
        self.register.list_members(group).await
    }

    pub async fn create_meeting(&mut self, meeting: Meeting) -> NjangiResult<Meeting> {
        self.register.create_meeting(meeting).await
    }

    pub async fn list_meetings(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Meeting>> {
        self.register.list_meetings(group).await
    }

    pub async fn join_meeting(
        &mut self,
        member_id: &MemberId,
        meeting_id: &MeetingId,
        monthly_due: BigDecimal,
    ) -> NjangiResult<Membership> {
        self.register
            .join_meeting(member_id, meeting_id, monthly_due)
            .await
    }

    pub async fn set_membership_active(
        &mut self,
        membership_id: &MembershipId,
        is_active: bool,
    ) -> NjangiResult<Membership> {
        self.register
            .set_membership_active(membership_id, is_active)
            .await
    }

    pub async fn record_contribution(
        &mut self,
        contribution: Contribution,
    ) -> NjangiResult<Contribution> {
        self.register.record_contribution(contribution).await
    }

    pub async fn create_loan(&mut self, loan: Loan) -> NjangiResult<Loan> {
        self.register.create_loan(loan).await
    }

    pub async fn set_loan_status(
        &mut self,
        loan_id: &LoanId,
        status: LoanStatus,
    ) -> NjangiResult<Loan> {
        self.register.set_loan_status(loan_id, status).await
    }

    pub async fn record_repayment(&mut self, repayment: Repayment) -> NjangiResult<Repayment> {
        self.register.record_repayment(repayment).await
    }

    pub async fn record_expense(&mut self, expense: Expense) -> NjangiResult<Expense> {
        self.register.record_expense(expense).await
    }

    /// Principal plus interest minus repayments for one loan. Negative when
    /// overpaid.
    pub async fn loan_outstanding(&self, loan_id: &LoanId) -> NjangiResult<BigDecimal> {
        let loan = self.register.get_loan_required(loan_id).await?;
        let repayments = self.register.list_repayments(loan_id).await?;
        Ok(loan.outstanding(&repayments))
    }

    // Bank operations
    pub async fn open_bank_account(&mut self, account: BankAccount) -> NjangiResult<BankAccount> {
        self.bank.open_account(account).await
    }

    pub async fn list_bank_accounts(
        &self,
        group: Option<&GroupId>,
    ) -> NjangiResult<Vec<BankAccount>> {
        self.bank.list_accounts(group).await
    }

    pub async fn record_bank_transaction(
        &mut self,
        transaction: BankTransaction,
    ) -> NjangiResult<BankTransaction> {
        self.bank.record_transaction(transaction).await
    }

    pub async fn account_balance(&self, account_id: &BankAccountId) -> NjangiResult<BigDecimal> {
        self.bank.account_balance(account_id).await
    }

    pub async fn running_balance(
        &self,
        account_id: &BankAccountId,
    ) -> NjangiResult<Vec<BalanceLine>> {
        self.bank.running_balance(account_id).await
    }

    pub async fn bank_balance(&self, group: Option<&GroupId>) -> NjangiResult<BigDecimal> {
        self.bank.bank_balance(group).await
    }

    // Member summary
    /// Load a fresh snapshot of one member's records
    pub async fn member_snapshot(&self, member_id: &MemberId) -> NjangiResult<MemberSnapshot> {
        MemberSnapshot::load(self.storage(), member_id).await
    }

    pub async fn total_savings(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
    ) -> NjangiResult<BigDecimal> {
        Ok(self.member_snapshot(member_id).await?.total_savings(meeting))
    }

    pub async fn outstanding_loans(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
    ) -> NjangiResult<BigDecimal> {
        Ok(self
            .member_snapshot(member_id)
            .await?
            .outstanding_loans(meeting))
    }

    /// Advisory only. Loan creation does not consult it.
    pub async fn eligibility_suggestion(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
    ) -> NjangiResult<BigDecimal> {
        Ok(self
            .member_snapshot(member_id)
            .await?
            .eligibility_suggestion(meeting, &self.settings.eligibility_factor))
    }

    pub async fn member_statement(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
    ) -> NjangiResult<MemberStatement> {
        Ok(self
            .member_snapshot(member_id)
            .await?
            .statement(meeting, &self.settings.eligibility_factor))
    }

    // Reporting
    pub async fn statement_report(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
    ) -> NjangiResult<StatementReport> {
        let snapshot = self.member_snapshot(member_id).await?;
        Ok(assemble_statement(
            &snapshot,
            meeting,
            &self.settings.eligibility_factor,
            &self.settings.statement,
        ))
    }

    /// Assemble and render a member's statement. Renderer failures come back
    /// as [`NjangiError::Export`].
    pub async fn export_statement(
        &self,
        member_id: &MemberId,
        meeting: Option<&MeetingId>,
        renderer: &dyn StatementRenderer,
    ) -> NjangiResult<RenderedStatement> {
        let snapshot = self.member_snapshot(member_id).await?;
        let report = assemble_statement(
            &snapshot,
            meeting,
            &self.settings.eligibility_factor,
            &self.settings.statement,
        );

        let body = renderer.render(&report).map_err(|err| {
            tracing::warn!(
                member = %member_id,
                format = renderer.extension(),
                error = %err,
                "statement export failed"
            );
            match err {
                NjangiError::Export(_) => err,
                other => NjangiError::Export(other.to_string()),
            }
        })?;

        Ok(RenderedStatement {
            filename: statement_filename(&snapshot.member, renderer.extension()),
            content_type: renderer.content_type().to_string(),
            body,
        })
    }

    /// Members of a group with their savings and outstanding loans. `None`
    /// lists every member.
    pub async fn group_roster(&self, group: Option<&GroupId>) -> NjangiResult<GroupRoster> {
        GroupRoster::load(self.storage(), group).await
    }

    /// Group-wide totals. `None` covers every group.
    pub async fn dashboard(&self, group: Option<&GroupId>) -> NjangiResult<DashboardSummary> {
        let summary = DashboardInputs::load(self.storage(), group)
            .await?
            .summarize();
        tracing::debug!(
            group = ?group,
            members = summary.total_members,
            bank_balance = %summary.bank_balance,
            "computed dashboard"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::JsonStatementRenderer;
    use crate::utils::memory_storage::MemoryStorage;
    use chrono::NaiveDate;

    struct BrokenRenderer;

    impl StatementRenderer for BrokenRenderer {
        fn content_type(&self) -> &'static str {
            "application/pdf"
        }

        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn render(&self, _report: &StatementReport) -> NjangiResult<Vec<u8>> {
            Err(NjangiError::Validation("font missing".to_string()))
        }
    }

    async fn member_with_savings(njangi: &mut Njangi<MemoryStorage>) -> (Member, Membership) {
        let member = njangi
            .create_member(Member::new("Ngozi".to_string(), "Tabe".to_string(), None))
            .await
            .unwrap();
        let meeting = njangi
            .create_meeting(Meeting::new("Main".to_string(), 2024, None))
            .await
            .unwrap();
        let membership = njangi
            .join_meeting(&member.id, &meeting.id, BigDecimal::from(25))
            .await
            .unwrap();
        njangi
            .record_contribution(Contribution::new(
                membership.id,
                BigDecimal::from(100),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ))
            .await
            .unwrap();
        (member, membership)
    }

    #[tokio::test]
    async fn test_njangi_basic_operations() {
        let mut njangi = Njangi::new(MemoryStorage::new());
        let (member, membership) = member_with_savings(&mut njangi).await;

        let statement = njangi.member_statement(&member.id, None).await.unwrap();
        assert_eq!(statement.member_label, "Ngozi Tabe");
        assert_eq!(statement.total_savings, BigDecimal::from(100));
        assert_eq!(statement.eligibility_suggestion, BigDecimal::from(150));

        let loan = njangi
            .create_loan(Loan::new(membership.id, BigDecimal::from(1000), BigDecimal::from(10)))
            .await
            .unwrap();
        njangi
            .record_repayment(Repayment::new(
                loan.id,
                BigDecimal::from(300),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(
            njangi.loan_outstanding(&loan.id).await.unwrap(),
            BigDecimal::from(800)
        );
        assert_eq!(
            njangi.outstanding_loans(&member.id, None).await.unwrap(),
            BigDecimal::from(800)
        );
    }

    #[tokio::test]
    async fn test_export_json() {
        let mut njangi = Njangi::new(MemoryStorage::new());
        let (member, _) = member_with_savings(&mut njangi).await;

        let rendered = njangi
            .export_statement(&member.id, None, &JsonStatementRenderer::default())
            .await
            .unwrap();
        assert_eq!(rendered.filename, "statement-ngozi-tabe.json");
        assert_eq!(rendered.content_type, "application/json");

        let value: serde_json::Value = serde_json::from_slice(&rendered.body).unwrap();
        assert_eq!(value["history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_failure_is_export_error() {
        let mut njangi = Njangi::new(MemoryStorage::new());
        let (member, _) = member_with_savings(&mut njangi).await;

        let result = njangi
            .export_statement(&member.id, None, &BrokenRenderer)
            .await;
        match result {
            Err(NjangiError::Export(message)) => assert!(message.contains("font missing")),
            other => panic!("expected export error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_member() {
        let njangi = Njangi::new(MemoryStorage::new());
        let missing = uuid::Uuid::new_v4();
        assert!(matches!(
            njangi.member_statement(&missing, None).await,
            Err(NjangiError::MemberNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_custom_settings_and_validator() {
        let settings = NjangiSettings {
            eligibility_factor: BigDecimal::from(2),
            ..NjangiSettings::default()
        };
        let mut njangi = Njangi::with_validator(
            MemoryStorage::new(),
            crate::utils::validation::StrictRecordValidator,
            settings,
        );
        let (member, _) = member_with_savings(&mut njangi).await;

        assert_eq!(
            njangi.eligibility_suggestion(&member.id, None).await.unwrap(),
            BigDecimal::from(200)
        );
        assert!(njangi
            .create_member(Member::new(String::new(), String::new(), None))
            .await
            .is_err());
    }
}
