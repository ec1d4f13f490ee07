use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities shared by the request handlers.

// Patterns are hardcoded and always valid.
static DOCUMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{7,8}-[0-9K]$").expect("hardcoded document regex is invalid - fix source code")
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{8,15}$").expect("hardcoded phone regex is invalid - fix source code")
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$")
        .expect("hardcoded time regex is invalid - fix source code")
});

/// Trim and lower-case an email for storage and lookup. Email uniqueness
/// is global and case-insensitive; every read and write goes through this.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Strip dots and spaces from a national-ID document, upper-case the check
/// digit, and make sure the dash separator is present.
pub fn normalize_document(raw: &str) -> String {
    let mut s: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | ' '))
        .collect::<String>()
        .to_ascii_uppercase();
    if !s.contains('-') && s.len() >= 2 {
        s.insert(s.len() - 1, '-');
    }
    s
}

/// Validate a national-ID document with the official modulo-11 check-digit
/// algorithm (weights 2..7 cycling from the least significant digit;
/// remainder 11 maps to '0' and 10 to 'K').
pub fn validate_document(raw: &str) -> bool {
    let s = normalize_document(raw);
    if !DOCUMENT_REGEX.is_match(&s) {
        return false;
    }

    let Some((body, dv)) = s.split_once('-') else {
        return false;
    };

    const FACTORS: [u32; 6] = [2, 3, 4, 5, 6, 7];
    let mut acc = 0u32;
    for (i, c) in body.chars().rev().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        acc += digit * FACTORS[i % FACTORS.len()];
    }

    let expected = match 11 - (acc % 11) {
        11 => "0".to_string(),
        10 => "K".to_string(),
        n => n.to_string(),
    };

    expected == dv
}

/// Phone numbers: optional leading '+', 8-15 digits, spaces tolerated.
pub fn validate_phone(raw: &str) -> bool {
    let compact: String = raw.chars().filter(|c| *c != ' ').collect();
    PHONE_REGEX.is_match(&compact)
}

/// Appointment and schedule times are "HH:MM" 24-hour strings.
pub fn validate_time(raw: &str) -> bool {
    TIME_REGEX.is_match(raw)
}

/// A birth date in the future is always a data-entry error.
pub fn validate_birth_date(date: &NaiveDate) -> bool {
    *date <= Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_valid_documents() {
        assert!(validate_document("12345678-5"));
        assert!(validate_document("11111111-1"));
        assert!(validate_document("1111111-4"));
        assert!(validate_document("9111111-K"));
        assert!(validate_document("3111111-0"));
    }

    #[test]
    fn test_document_normalization_variants() {
        assert!(validate_document("12.345.678-5"));
        assert!(validate_document("12345678 - 5"));
        assert!(validate_document("123456785")); // dash inserted
        assert!(validate_document("9111111-k")); // lowercase check digit
        assert_eq!(normalize_document("12.345.678-5"), "12345678-5");
    }

    #[test]
    fn test_invalid_documents() {
        assert!(!validate_document("12345678-9")); // wrong check digit
        assert!(!validate_document("9111111-1")); // should be K
        assert!(!validate_document("123-5")); // body too short
        assert!(!validate_document("abcdefgh-5"));
        assert!(!validate_document(""));
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("+56912345678"));
        assert!(validate_phone("912345678"));
        assert!(validate_phone("+56 9 1234 5678"));
        assert!(!validate_phone("12345")); // too short
        assert!(!validate_phone("phone-number"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn test_time_validation() {
        assert!(validate_time("09:00"));
        assert!(validate_time("23:59"));
        assert!(!validate_time("24:00"));
        assert!(!validate_time("9:00"));
        assert!(!validate_time("09:60"));
        assert!(!validate_time("morning"));
    }

    #[test]
    fn test_birth_date_bounds() {
        let today = Utc::now().date_naive();
        assert!(validate_birth_date(&today));
        assert!(validate_birth_date(&(today - Duration::days(10_000))));
        assert!(!validate_birth_date(&(today + Duration::days(1))));
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }
}
