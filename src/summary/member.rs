//! Per-member savings, debt and loan eligibility

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

use crate::summary::MemberSnapshot;
use crate::types::*;

/// Canonical summary of a member's position, consumed by reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatement {
    pub member_label: String,
    pub total_savings: BigDecimal,
    pub outstanding_loans: BigDecimal,
    pub eligibility_suggestion: BigDecimal,
}

/// Round a money amount to cents, half to even
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfEven)
}

impl MemberSnapshot {
    /// Sum of every contribution, optionally for one meeting only
    pub fn total_savings(&self, meeting: Option<&MeetingId>) -> BigDecimal {
        self.memberships_in(meeting)
            .map(|m| m.total_contributions())
            .sum()
    }

    /// Sum of the outstanding amount of every loan. Overpaid loans pull the
    /// total down.
    pub fn outstanding_loans(&self, meeting: Option<&MeetingId>) -> BigDecimal {
        self.loans_in(meeting).map(|l| l.outstanding()).sum()
    }

    /// (total, paid) loan counts
    fn loan_counts(&self, meeting: Option<&MeetingId>) -> (u64, u64) {
        self.loans_in(meeting).fold((0, 0), |(total, paid), l| {
            (total + 1, paid + u64::from(l.loan.status == LoanStatus::Paid))
        })
    }

    /// Share of loans that reached `paid`, for display. A member without
    /// loans is fully trusted.
    pub fn timeliness(&self, meeting: Option<&MeetingId>) -> BigDecimal {
        match self.loan_counts(meeting) {
            (0, _) => BigDecimal::from(1),
            (total, paid) => BigDecimal::from(paid) / BigDecimal::from(total),
        }
    }

    /// Advisory loan ceiling: `savings × factor × paid / total`, rounded half
    /// to even at 2 decimals. Never used to refuse a loan.
    ///
    /// The division by the loan count comes last so an exact half cent is
    /// still exact when it reaches rounding.
    pub fn eligibility_suggestion(
        &self,
        meeting: Option<&MeetingId>,
        factor: &BigDecimal,
    ) -> BigDecimal {
        let base = self.total_savings(meeting) * factor;
        let raw = match self.loan_counts(meeting) {
            (0, _) => base,
            (total, paid) => base * BigDecimal::from(paid) / BigDecimal::from(total),
        };
        round_money(&raw)
    }

    pub fn statement(&self, meeting: Option<&MeetingId>, factor: &BigDecimal) -> MemberStatement {
        let statement = MemberStatement {
            member_label: self.member.label(),
            total_savings: self.total_savings(meeting),
            outstanding_loans: self.outstanding_loans(meeting),
            eligibility_suggestion: self.eligibility_suggestion(meeting, factor),
        };
        tracing::debug!(
            member = %self.member.id,
            savings = %statement.total_savings,
            outstanding = %statement.outstanding_loans,
            "computed member statement"
        );
        statement
    }
}
