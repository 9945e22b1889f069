use crate::domain::{normalize_digits, CountryRule};

/// Checks an international digit string (calling code included, no `+`).
///
/// A pattern takes precedence over the mask; a rule with neither accepts
/// anything.
pub fn validate(international_digits: &str, rule: &CountryRule) -> bool {
    let digits = normalize_digits(international_digits);

    if let Some(pattern) = rule.pattern() {
        return pattern.is_full_match(&digits);
    }

    if let Some(mask) = rule.mask() {
        let national = match digits.strip_prefix(rule.country_code()) {
            Some(national) => national,
            None => return false,
        };
        return mask.accepts_len(national.len());
    }

    true
}

pub fn validate_with(international_digits: &str, rule: Option<&CountryRule>) -> bool {
    match rule {
        Some(rule) => validate(international_digits, rule),
        None => false,
    }
}
