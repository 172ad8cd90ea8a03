//! Identifier format validation.
//!
//! Enforced before persistence so the storage constraints only ever see
//! well-formed identifiers.

/// Check email syntax: one `@`, non-empty local part, domain with a dot
/// and no whitespace. Deliberately permissive beyond that; deliverability
/// is established by verification, not syntax.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Check E.164 phone format: `+` followed by 8 to 15 digits, first digit
/// non-zero.
pub fn is_valid_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    if !(8..=15).contains(&digits.len()) {
        return false;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !digits.starts_with('0')
}
