//! Per-member roster for a group

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::summary::MemberSnapshot;
use crate::traits::NjangiStorage;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub joined_at: NaiveDate,
    pub total_savings: BigDecimal,
    pub outstanding_loans: BigDecimal,
}

impl From<&MemberSnapshot> for RosterRow {
    fn from(snapshot: &MemberSnapshot) -> Self {
        let member = &snapshot.member;
        Self {
            member_id: member.id,
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone(),
            joined_at: member.joined_at,
            total_savings: snapshot.total_savings(None),
            outstanding_loans: snapshot.outstanding_loans(None),
        }
    }
}

/// Every member in scope with their savings and debt, in storage order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRoster {
    pub group_id: Option<GroupId>,
    pub rows: Vec<RosterRow>,
    pub total_members: usize,
}

impl GroupRoster {
    pub fn from_snapshots(group: Option<&GroupId>, snapshots: &[MemberSnapshot]) -> Self {
        let rows: Vec<RosterRow> = snapshots.iter().map(RosterRow::from).collect();
        Self {
            group_id: group.copied(),
            total_members: rows.len(),
            rows,
        }
    }

    /// Load one snapshot per member of `group` and build the roster
    pub async fn load<S: NjangiStorage + ?Sized>(
        storage: &S,
        group: Option<&GroupId>,
    ) -> NjangiResult<Self> {
        let mut snapshots = Vec::new();
        for member in storage.list_members(group).await? {
            snapshots.push(MemberSnapshot::load(storage, &member.id).await?);
        }

        let roster = Self::from_snapshots(group, &snapshots);
        tracing::debug!(group = ?group, members = roster.total_members, "assembled roster");
        Ok(roster)
    }

    /// Savings across every row
    pub fn total_savings(&self) -> BigDecimal {
        self.rows.iter().map(|r| &r.total_savings).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{LoanRecord, MembershipRecord};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rows_follow_snapshots() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let member = Member::new("Ngozi".to_string(), "Tabe".to_string(), None)
            .with_contact("677000000".to_string(), "ngozi@example.com".to_string())
            .with_joined_at(day);
        let meeting = Meeting::new("Main".to_string(), 2024, None);
        let membership = Membership::new(member.id, meeting.id, dec("10"));
        let loan = Loan::new(membership.id, dec("100"), dec("10"));
        let saver = MemberSnapshot {
            memberships: vec![MembershipRecord {
                contributions: vec![Contribution::new(membership.id, dec("80"), day)],
                loans: vec![LoanRecord {
                    repayments: vec![Repayment::new(loan.id, dec("60"), day)],
                    loan,
                }],
                membership,
                meeting,
            }],
            member,
        };
        let newcomer = MemberSnapshot {
            member: Member::new("Bih".to_string(), String::new(), None),
            memberships: Vec::new(),
        };

        let roster = GroupRoster::from_snapshots(None, &[saver, newcomer]);
        assert_eq!(roster.total_members, 2);
        assert_eq!(roster.rows[0].email, "ngozi@example.com");
        assert_eq!(roster.rows[0].joined_at, day);
        assert_eq!(roster.rows[0].total_savings, dec("80"));
        assert_eq!(roster.rows[0].outstanding_loans, dec("50"));
        assert_eq!(roster.rows[1].first_name, "Bih");
        assert_eq!(roster.rows[1].total_savings, dec("0"));
        assert_eq!(roster.total_savings(), dec("80"));
    }
}
