//! Card validation for the checkout flow.
//!
//! All checks run before any network call. The current date is passed in
//! rather than read from a clock so the expiry rule is testable.

use thiserror::Error;

/// Card details as collected by the pay-by-card form.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

/// Client-side card validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("cardholder name is required")]
    MissingCardholder,
    #[error("invalid card number")]
    InvalidNumber,
    #[error("invalid expiry month")]
    InvalidMonth,
    #[error("invalid expiry year")]
    InvalidYear,
    #[error("card expired")]
    Expired,
    #[error("invalid CVV")]
    InvalidCvv,
}

/// Luhn checksum: double every second digit from the right, subtract 9 when
/// the doubled value exceeds 9, sum all digits; valid if divisible by 10.
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;

    for ch in digits.chars().rev() {
        let Some(d) = ch.to_digit(10) else {
            return false;
        };
        let mut d = d;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }

    sum % 10 == 0
}

/// Strip whitespace from a card number as typed.
#[must_use]
pub fn normalize_card_number(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a card against the current `(year, month)`.
///
/// A card expiring in the current month is still accepted; only an expiry
/// strictly before the current month is rejected. Two-digit years are
/// interpreted as `2000 + YY`, as the original checkout form did.
///
/// # Errors
///
/// Returns the first failing [`CardError`] check.
pub fn validate_card(card: &CardDetails, now_year: i32, now_month: u32) -> Result<(), CardError> {
    if card.cardholder_name.trim().len() < 2 {
        return Err(CardError::MissingCardholder);
    }

    let digits = normalize_card_number(&card.card_number);
    if digits.len() < 13 || digits.len() > 19 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidNumber);
    }
    if !luhn_valid(&digits) {
        return Err(CardError::InvalidNumber);
    }

    let month: u32 = card
        .expiry_month
        .trim()
        .parse()
        .map_err(|_| CardError::InvalidMonth)?;
    if !(1..=12).contains(&month) {
        return Err(CardError::InvalidMonth);
    }

    let raw_year = card.expiry_year.trim();
    let mut year: i32 = raw_year.parse().map_err(|_| CardError::InvalidYear)?;
    if raw_year.len() == 2 {
        year += 2000;
    }
    if year < 1000 {
        return Err(CardError::InvalidYear);
    }

    if (year, month) < (now_year, now_month) {
        return Err(CardError::Expired);
    }

    let cvv = card.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidCvv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // A well-known Luhn-valid test number.
    const VALID_NUMBER: &str = "4242424242424242";

    fn card(number: &str, month: &str, year: &str) -> CardDetails {
        CardDetails {
            cardholder_name: "Iva Petrova".to_string(),
            card_number: number.to_string(),
            expiry_month: month.to_string(),
            expiry_year: year.to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_luhn_accepts_valid_number() {
        assert!(luhn_valid(VALID_NUMBER));
        assert!(luhn_valid("79927398713"));
    }

    #[test]
    fn test_luhn_rejects_invalid_number() {
        assert!(!luhn_valid("4242424242424243"));
        assert!(!luhn_valid("79927398710"));
    }

    #[test]
    fn test_luhn_rejects_non_digits() {
        assert!(!luhn_valid("4242-4242"));
    }

    #[test]
    fn test_valid_card_current_month_accepted() {
        let card = card(VALID_NUMBER, "6", "2030");
        assert_eq!(validate_card(&card, 2030, 6), Ok(()));
    }

    #[test]
    fn test_expiry_before_current_month_rejected() {
        let card = card(VALID_NUMBER, "5", "2030");
        assert_eq!(validate_card(&card, 2030, 6), Err(CardError::Expired));
    }

    #[test]
    fn test_expiry_previous_year_rejected() {
        let card = card(VALID_NUMBER, "12", "2029");
        assert_eq!(validate_card(&card, 2030, 1), Err(CardError::Expired));
    }

    #[test]
    fn test_future_year_accepted() {
        let card = card(VALID_NUMBER, "1", "2031");
        assert_eq!(validate_card(&card, 2030, 6), Ok(()));
    }

    #[test]
    fn test_two_digit_year_expanded() {
        let card = card(VALID_NUMBER, "6", "31");
        assert_eq!(validate_card(&card, 2030, 6), Ok(()));
    }

    #[test]
    fn test_checksum_failure_rejected() {
        let card = card("4242424242424243", "6", "2031");
        assert_eq!(
            validate_card(&card, 2030, 6),
            Err(CardError::InvalidNumber)
        );
    }

    #[test]
    fn test_number_with_spaces_normalized() {
        let card = card("4242 4242 4242 4242", "6", "2031");
        assert_eq!(validate_card(&card, 2030, 6), Ok(()));
    }

    #[test]
    fn test_short_number_rejected() {
        let card = card("4242", "6", "2031");
        assert_eq!(
            validate_card(&card, 2030, 6),
            Err(CardError::InvalidNumber)
        );
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        let card = card(VALID_NUMBER, "13", "2031");
        assert_eq!(validate_card(&card, 2030, 6), Err(CardError::InvalidMonth));
    }

    #[test]
    fn test_bad_cvv_rejected() {
        let mut bad = card(VALID_NUMBER, "6", "2031");
        bad.cvv = "12".to_string();
        assert_eq!(validate_card(&bad, 2030, 6), Err(CardError::InvalidCvv));
    }

    #[test]
    fn test_missing_cardholder_rejected() {
        let mut bad = card(VALID_NUMBER, "6", "2031");
        bad.cardholder_name = " ".to_string();
        assert_eq!(
            validate_card(&bad, 2030, 6),
            Err(CardError::MissingCardholder)
        );
    }
}
