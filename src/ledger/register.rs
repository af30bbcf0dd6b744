//! Group, member, meeting and loan book keeping

use chrono::Utc;

use crate::traits::*;
use crate::types::*;

/// Register manager for members, meetings and everything hanging off a
/// membership
pub struct RegisterManager<S: NjangiStorage> {
    pub(crate) storage: S,
    validator: Box<dyn RecordValidator>,
}

impl<S: NjangiStorage> RegisterManager<S> {
    /// Create a new register manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultRecordValidator),
        }
    }

    /// Create a new register manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn RecordValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a tenant group with a unique slug
    pub async fn create_group(&mut self, name: String, slug: String) -> NjangiResult<Group> {
        let group = Group::new(name, slug);
        self.validator.validate_group(&group)?;

        let groups = self.storage.list_groups().await?;
        if groups.iter().any(|g| g.slug == group.slug) {
            return Err(NjangiError::Validation(format!(
                "Group with slug '{}' already exists",
                group.slug
            )));
        }

        self.storage.save_group(&group).await?;
        tracing::info!(group = %group.id, slug = %group.slug, "created group");
        Ok(group)
    }

    pub async fn get_group_required(&self, group_id: &GroupId) -> NjangiResult<Group> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or(NjangiError::GroupNotFound(*group_id))
    }

    async fn ensure_group(&self, group_id: Option<&GroupId>) -> NjangiResult<()> {
        if let Some(group_id) = group_id {
            self.get_group_required(group_id).await?;
        }
        Ok(())
    }

    /// Register a member
    pub async fn create_member(&mut self, member: Member) -> NjangiResult<Member> {
        self.validator.validate_member(&member)?;
        self.ensure_group(member.group_id.as_ref()).await?;

        self.storage.save_member(&member).await?;
        tracing::info!(member = %member.id, "registered member");
        Ok(member)
    }

    /// Update a member's details
    pub async fn update_member(&mut self, member: &Member) -> NjangiResult<()> {
        self.validator.validate_member(member)?;
        self.get_member_required(&member.id).await?;
        self.ensure_group(member.group_id.as_ref()).await?;
        self.storage.save_member(member).await
    }

    pub async fn get_member(&self, member_id: &MemberId) -> NjangiResult<Option<Member>> {
        self.storage.get_member(member_id).await
    }

    pub async fn get_member_required(&self, member_id: &MemberId) -> NjangiResult<Member> {
        self.storage
            .get_member(member_id)
            .await?
            .ok_or(NjangiError::MemberNotFound(*member_id))
    }

    pub async fn list_members(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Member>> {
        self.storage.list_members(group).await
    }

    /// Open a meeting. (name, year) must be unique.
    pub async fn create_meeting(&mut self, meeting: Meeting) -> NjangiResult<Meeting> {
        self.validator.validate_meeting(&meeting)?;
        self.ensure_group(meeting.group_id.as_ref()).await?;

        let meetings = self.storage.list_meetings(None).await?;
        if meetings
            .iter()
            .any(|m| m.name == meeting.name && m.year == meeting.year)
        {
            return Err(NjangiError::Validation(format!(
                "Meeting '{}' already exists",
                meeting.label()
            )));
        }

        self.storage.save_meeting(&meeting).await?;
        tracing::info!(meeting = %meeting.id, label = %meeting.label(), "opened meeting");
        Ok(meeting)
    }

    pub async fn get_meeting_required(&self, meeting_id: &MeetingId) -> NjangiResult<Meeting> {
        self.storage
            .get_meeting(meeting_id)
            .await?
            .ok_or(NjangiError::MeetingNotFound(*meeting_id))
    }

    pub async fn list_meetings(&self, group: Option<&GroupId>) -> NjangiResult<Vec<Meeting>> {
        self.storage.list_meetings(group).await
    }

    /// Enrol a member in a meeting. A member can hold one membership per
    /// meeting.
    pub async fn join_meeting(
        &mut self,
        member_id: &MemberId,
        meeting_id: &MeetingId,
        monthly_due: bigdecimal::BigDecimal,
    ) -> NjangiResult<Membership> {
        self.get_member_required(member_id).await?;
        self.get_meeting_required(meeting_id).await?;

        let membership = Membership::new(*member_id, *meeting_id, monthly_due);
        self.validator.validate_membership(&membership)?;

        let existing = self.storage.list_member_memberships(member_id).await?;
        if existing.iter().any(|m| m.meeting_id == *meeting_id) {
            return Err(NjangiError::Validation(format!(
                "Member {} already belongs to meeting {}",
                member_id, meeting_id
            )));
        }

        self.storage.save_membership(&membership).await?;
        tracing::info!(
            member = %member_id,
            meeting = %meeting_id,
            membership = %membership.id,
            "member joined meeting"
        );
        Ok(membership)
    }

    pub async fn get_membership_required(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Membership> {
        self.storage
            .get_membership(membership_id)
            .await?
            .ok_or(NjangiError::MembershipNotFound(*membership_id))
    }

    /// Turn a membership on or off
    pub async fn set_membership_active(
        &mut self,
        membership_id: &MembershipId,
        is_active: bool,
    ) -> NjangiResult<Membership> {
        let mut membership = self.get_membership_required(membership_id).await?;
        membership.is_active = is_active;
        self.storage.save_membership(&membership).await?;
        Ok(membership)
    }

    pub async fn list_member_memberships(
        &self,
        member_id: &MemberId,
    ) -> NjangiResult<Vec<Membership>> {
        self.storage.list_member_memberships(member_id).await
    }

    /// Record savings paid into a membership
    pub async fn record_contribution(
        &mut self,
        contribution: Contribution,
    ) -> NjangiResult<Contribution> {
        self.validator.validate_contribution(&contribution)?;
        self.get_membership_required(&contribution.membership_id)
            .await?;

        self.storage.save_contribution(&contribution).await?;
        tracing::info!(
            membership = %contribution.membership_id,
            amount = %contribution.amount,
            "recorded contribution"
        );
        Ok(contribution)
    }

    pub async fn list_contributions(
        &self,
        membership_id: &MembershipId,
    ) -> NjangiResult<Vec<Contribution>> {
        self.storage.list_contributions(membership_id).await
    }

    /// Create a loan against a membership. Eligibility is not consulted.
    pub async fn create_loan(&mut self, mut loan: Loan) -> NjangiResult<Loan> {
        self.validator.validate_loan(&loan)?;
        self.get_membership_required(&loan.membership_id).await?;

        if loan.status == LoanStatus::Approved && loan.approved_at.is_none() {
            loan.approved_at = Some(Utc::now().naive_utc());
        }

        self.storage.save_loan(&loan).await?;
        tracing::info!(
            loan = %loan.id,
            membership = %loan.membership_id,
            principal = %loan.principal,
            status = %loan.status,
            "created loan"
        );
        Ok(loan)
    }

    pub async fn get_loan_required(&self, loan_id: &LoanId) -> NjangiResult<Loan> {
        self.storage
            .get_loan(loan_id)
            .await?
            .ok_or(NjangiError::LoanNotFound(*loan_id))
    }

    /// Move a loan to `status`, stamping `approved_at` on first approval
    pub async fn set_loan_status(
        &mut self,
        loan_id: &LoanId,
        status: LoanStatus,
    ) -> NjangiResult<Loan> {
        let mut loan = self.get_loan_required(loan_id).await?;
        if status == LoanStatus::Approved && loan.approved_at.is_none() {
            loan.approved_at = Some(Utc::now().naive_utc());
        }
        let previous = loan.status;
        loan.status = status;

        self.storage.update_loan(&loan).await?;
        tracing::info!(loan = %loan.id, from = %previous, to = %status, "loan status changed");
        Ok(loan)
    }

    pub async fn list_loans(&self, membership_id: &MembershipId) -> NjangiResult<Vec<Loan>> {
        self.storage.list_loans(membership_id).await
    }

    /// Record a repayment against a loan
    pub async fn record_repayment(&mut self, repayment: Repayment) -> NjangiResult<Repayment> {
        self.validator.validate_repayment(&repayment)?;
        self.get_loan_required(&repayment.loan_id).await?;

        self.storage.save_repayment(&repayment).await?;
        tracing::info!(
            loan = %repayment.loan_id,
            amount = %repayment.amount,
            "recorded repayment"
        );
        Ok(repayment)
    }

    pub async fn list_repayments(&self, loan_id: &LoanId) -> NjangiResult<Vec<Repayment>> {
        self.storage.list_repayments(loan_id).await
    }

    /// Record an operational expense. The expense inherits the meeting's
    /// group when none is set.
    pub async fn record_expense(&mut self, mut expense: Expense) -> NjangiResult<Expense> {
        self.validator.validate_expense(&expense)?;
        let meeting = self.get_meeting_required(&expense.meeting_id).await?;
        if expense.group_id.is_none() {
            expense.group_id = meeting.group_id;
        }

        self.storage.save_expense(&expense).await?;
        tracing::info!(
            meeting = %expense.meeting_id,
            amount = %expense.amount,
            "recorded expense"
        );
        Ok(expense)
    }

    pub async fn list_expenses(&self, meeting_id: &MeetingId) -> NjangiResult<Vec<Expense>> {
        self.storage.list_expenses(meeting_id).await
    }
}
