//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> NjangiResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(NjangiError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount fits the stored precision (at most 2 decimals)
pub fn validate_money_scale(amount: &BigDecimal) -> NjangiResult<()> {
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > 2 {
        return Err(NjangiError::Validation(format!(
            "Amount {} has more than 2 decimal places",
            amount
        )));
    }
    Ok(())
}

/// Validate a person or record name
pub fn validate_name(name: &str, max_len: usize) -> NjangiResult<()> {
    if name.trim().is_empty() {
        return Err(NjangiError::Validation("Name cannot be empty".to_string()));
    }

    if name.chars().count() > max_len {
        return Err(NjangiError::Validation(format!(
            "Name cannot exceed {} characters",
            max_len
        )));
    }

    Ok(())
}

/// Validate a group slug: lowercase alphanumerics and dashes
pub fn validate_slug(slug: &str) -> NjangiResult<()> {
    if slug.is_empty() || slug.len() > 140 {
        return Err(NjangiError::Validation(
            "Slug must be between 1 and 140 characters".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(NjangiError::Validation(
            "Slug can only contain lowercase letters, digits, and dashes".to_string(),
        ));
    }

    Ok(())
}

/// Validate an optional email address (empty is allowed)
pub fn validate_email(email: &str) -> NjangiResult<()> {
    if email.is_empty() {
        return Ok(());
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(NjangiError::Validation(format!(
            "Invalid email address: {}",
            email
        )));
    }

    Ok(())
}

/// Validate an optional phone number (empty is allowed)
pub fn validate_phone(phone: &str) -> NjangiResult<()> {
    if phone.len() > 30 {
        return Err(NjangiError::Validation(
            "Phone number cannot exceed 30 characters".to_string(),
        ));
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
    {
        return Err(NjangiError::Validation(format!(
            "Invalid phone number: {}",
            phone
        )));
    }

    Ok(())
}

/// Validator that layers field formats and money precision over
/// [`DefaultRecordValidator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictRecordValidator;

impl RecordValidator for StrictRecordValidator {
    fn validate_group(&self, group: &Group) -> NjangiResult<()> {
        DefaultRecordValidator.validate_group(group)?;
        validate_name(&group.name, 140)?;
        validate_slug(&group.slug)
    }

    fn validate_member(&self, member: &Member) -> NjangiResult<()> {
        DefaultRecordValidator.validate_member(member)?;
        validate_name(&member.first_name, 80)?;
        if member.last_name.chars().count() > 80 {
            return Err(NjangiError::Validation(
                "Last name cannot exceed 80 characters".to_string(),
            ));
        }
        validate_phone(&member.phone)?;
        validate_email(&member.email)
    }

    fn validate_meeting(&self, meeting: &Meeting) -> NjangiResult<()> {
        DefaultRecordValidator.validate_meeting(meeting)?;
        validate_name(&meeting.name, 120)
    }

    fn validate_membership(&self, membership: &Membership) -> NjangiResult<()> {
        DefaultRecordValidator.validate_membership(membership)?;
        validate_money_scale(&membership.monthly_due)
    }

    fn validate_contribution(&self, contribution: &Contribution) -> NjangiResult<()> {
        DefaultRecordValidator.validate_contribution(contribution)?;
        validate_money_scale(&contribution.amount)
    }

    fn validate_loan(&self, loan: &Loan) -> NjangiResult<()> {
        DefaultRecordValidator.validate_loan(loan)?;
        validate_money_scale(&loan.principal)?;
        validate_money_scale(&loan.interest_rate)?;
        if loan.interest_rate >= BigDecimal::from(1000) {
            return Err(NjangiError::Validation(
                "Interest rate must be below 1000 percent".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_repayment(&self, repayment: &Repayment) -> NjangiResult<()> {
        DefaultRecordValidator.validate_repayment(repayment)?;
        validate_money_scale(&repayment.amount)
    }

    fn validate_expense(&self, expense: &Expense) -> NjangiResult<()> {
        DefaultRecordValidator.validate_expense(expense)?;
        validate_money_scale(&expense.amount)
    }

    fn validate_bank_account(&self, account: &BankAccount) -> NjangiResult<()> {
        DefaultRecordValidator.validate_bank_account(account)?;
        validate_name(&account.name, 140)?;
        validate_money_scale(&account.starting_balance)
    }

    fn validate_bank_transaction(&self, transaction: &BankTransaction) -> NjangiResult<()> {
        DefaultRecordValidator.validate_bank_transaction(transaction)?;
        validate_positive_amount(&transaction.amount)?;
        validate_money_scale(&transaction.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_money_scale() {
        assert!(validate_money_scale(&BigDecimal::from_str("10.25").unwrap()).is_ok());
        assert!(validate_money_scale(&BigDecimal::from_str("10.2500").unwrap()).is_ok());
        assert!(validate_money_scale(&BigDecimal::from_str("10.255").unwrap()).is_err());
    }

    #[test]
    fn test_email_and_phone() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("ngozi@example.cm").is_ok());
        assert!(validate_email("ngozi.example.cm").is_err());
        assert!(validate_email("@example.cm").is_err());

        assert!(validate_phone("+237 6 77 00 00 00").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("bamenda-njangi-2").is_ok());
        assert!(validate_slug("Bamenda Njangi").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_strict_member() {
        let member = Member::new("Ngozi".to_string(), "Tabe".to_string(), None)
            .with_contact("677000000".to_string(), "not-an-email".to_string());
        assert!(StrictRecordValidator.validate_member(&member).is_err());
    }
}
