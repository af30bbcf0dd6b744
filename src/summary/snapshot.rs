//! Request-scoped view of everything one member owns
//!
//! A snapshot is loaded fresh for each summary or statement and dropped
//! afterwards, so totals are always recomputed from stored rows.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::traits::NjangiStorage;
use crate::types::*;

/// A loan together with its repayments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan: Loan,
    pub repayments: Vec<Repayment>,
}

impl LoanRecord {
    pub fn outstanding(&self) -> BigDecimal {
        self.loan.outstanding(&self.repayments)
    }

    pub fn total_repaid(&self) -> BigDecimal {
        self.repayments.iter().map(|r| &r.amount).sum()
    }
}

/// A membership with its meeting, contributions and loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub membership: Membership,
    pub meeting: Meeting,
    pub contributions: Vec<Contribution>,
    pub loans: Vec<LoanRecord>,
}

impl MembershipRecord {
    pub fn total_contributions(&self) -> BigDecimal {
        self.contributions.iter().map(|c| &c.amount).sum()
    }
}

/// One member and all of their memberships, in storage order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member: Member,
    pub memberships: Vec<MembershipRecord>,
}

impl MemberSnapshot {
    /// Read a member's records from storage
    pub async fn load<S: NjangiStorage + ?Sized>(
        storage: &S,
        member_id: &MemberId,
    ) -> NjangiResult<Self> {
        let member = storage
            .get_member(member_id)
            .await?
            .ok_or(NjangiError::MemberNotFound(*member_id))?;

        let mut memberships = Vec::new();
        for membership in storage.list_member_memberships(member_id).await? {
            let meeting = storage
                .get_meeting(&membership.meeting_id)
                .await?
                .ok_or(NjangiError::MeetingNotFound(membership.meeting_id))?;
            let contributions = storage.list_contributions(&membership.id).await?;

            let mut loans = Vec::new();
            for loan in storage.list_loans(&membership.id).await? {
                let repayments = storage.list_repayments(&loan.id).await?;
                loans.push(LoanRecord { loan, repayments });
            }

            memberships.push(MembershipRecord {
                membership,
                meeting,
                contributions,
                loans,
            });
        }

        tracing::debug!(
            member = %member_id,
            memberships = memberships.len(),
            "loaded member snapshot"
        );

        Ok(Self {
            member,
            memberships,
        })
    }

    /// Memberships, optionally restricted to one meeting
    pub fn memberships_in<'a>(
        &'a self,
        meeting: Option<&'a MeetingId>,
    ) -> impl Iterator<Item = &'a MembershipRecord> + 'a {
        self.memberships
            .iter()
            .filter(move |m| meeting.is_none_or(|id| m.membership.meeting_id == *id))
    }

    /// Loans, optionally restricted to one meeting
    pub fn loans_in<'a>(
        &'a self,
        meeting: Option<&'a MeetingId>,
    ) -> impl Iterator<Item = &'a LoanRecord> + 'a {
        self.memberships_in(meeting).flat_map(|m| m.loans.iter())
    }
}
