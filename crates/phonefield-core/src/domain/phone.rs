use serde::{Deserialize, Serialize};

pub fn normalize_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Country and national digits recovered from a raw field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPhone {
    pub selected_country_iso: Option<String>,
    pub national_digits: String,
}

impl ParsedPhone {
    pub fn unassigned(digits: String) -> Self {
        Self {
            selected_country_iso: None,
            national_digits: digits,
        }
    }
}

/// Everything the rendering layer needs after a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneResult {
    pub international_value: String,
    pub display_value: String,
    pub is_valid: bool,
}

#[cfg(test)]
mod tests {
    use super::normalize_digits;

    #[test]
    fn normalize_digits_strips_formatting() {
        assert_eq!(normalize_digits("(11) 9999-8888"), "1199998888");
        assert_eq!(normalize_digits("+1 415.555.1212"), "14155551212");
    }

    #[test]
    fn normalize_digits_ignores_non_ascii_digits() {
        assert_eq!(normalize_digits("٣4５6"), "46");
    }

    #[test]
    fn normalize_digits_empty() {
        assert_eq!(normalize_digits(""), "");
        assert_eq!(normalize_digits("ext. -"), "");
    }

    #[test]
    fn normalize_digits_is_idempotent() {
        for input in ["", "+55 (11) 99999-8888", "abc", "0000", "1-2-3 x4"] {
            let once = normalize_digits(input);
            assert_eq!(normalize_digits(&once), once);
        }
    }
}
