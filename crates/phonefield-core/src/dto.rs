use crate::domain::{CountryRule, ParsedPhone, PhoneResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRuleDto {
    pub country_iso: String,
    pub country_code: String,
    pub mask: Option<String>,
    pub pattern: Option<String>,
}

impl From<&CountryRule> for CountryRuleDto {
    fn from(rule: &CountryRule) -> Self {
        Self {
            country_iso: rule.country_iso().to_string(),
            country_code: rule.country_code().to_string(),
            mask: rule.mask().map(|mask| mask.as_str().to_string()),
            pattern: rule.pattern().map(|pattern| pattern.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutputDto {
    pub input: String,
    pub country_iso: Option<String>,
    pub national_digits: String,
    pub international_value: String,
    pub display_value: String,
    pub is_valid: bool,
}

impl FormatOutputDto {
    pub fn new(input: &str, parsed: &ParsedPhone, result: &PhoneResult) -> Self {
        Self {
            input: input.to_string(),
            country_iso: parsed.selected_country_iso.clone(),
            national_digits: parsed.national_digits.clone(),
            international_value: result.international_value.clone(),
            display_value: result.display_value.clone(),
            is_valid: result.is_valid,
        }
    }
}
