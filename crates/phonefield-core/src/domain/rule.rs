use crate::domain::mask::Mask;
use crate::error::CoreError;
use regex::Regex;
use std::fmt;

const MAX_CALLING_CODE_LEN: usize = 3;

/// Validation expression matched against the whole international digit string.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, CoreError> {
        let anchored = format!("^(?:{})$", source);
        let regex = Regex::new(&anchored).map_err(|err| CoreError::InvalidPattern {
            pattern: source.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, digits: &str) -> bool {
        self.regex.is_match(digits)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRule {
    country_iso: String,
    country_code: String,
    mask: Option<Mask>,
    pattern: Option<Pattern>,
}

impl CountryRule {
    pub fn new(country_iso: &str, country_code: &str) -> Result<Self, CoreError> {
        Ok(Self {
            country_iso: normalize_country_iso(country_iso)?,
            country_code: normalize_calling_code(country_code)?,
            mask: None,
            pattern: None,
        })
    }

    pub fn with_mask(mut self, template: &str) -> Result<Self, CoreError> {
        self.mask = Some(Mask::new(template)?);
        Ok(self)
    }

    pub fn with_pattern(mut self, source: &str) -> Result<Self, CoreError> {
        self.pattern = Some(Pattern::new(source)?);
        Ok(self)
    }

    pub fn country_iso(&self) -> &str {
        &self.country_iso
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Removes the calling code when `digits` begins with it.
    pub fn strip_calling_code<'a>(&self, digits: &'a str) -> &'a str {
        digits
            .strip_prefix(self.country_code.as_str())
            .unwrap_or(digits)
    }

    pub fn international_digits(&self, national_digits: &str) -> String {
        format!("{}{}", self.country_code, national_digits)
    }
}

pub fn normalize_country_iso(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(CoreError::InvalidCountryIso(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

pub fn normalize_calling_code(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty()
        || trimmed.len() > MAX_CALLING_CODE_LEN
        || !trimmed.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(CoreError::InvalidCallingCode(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_calling_code, normalize_country_iso, CountryRule, Pattern};

    #[test]
    fn country_iso_is_upper_cased() {
        assert_eq!(normalize_country_iso(" bra ").unwrap(), "BRA");
    }

    #[test]
    fn country_iso_requires_three_letters() {
        assert!(normalize_country_iso("BR").is_err());
        assert!(normalize_country_iso("BRAZ").is_err());
        assert!(normalize_country_iso("B1A").is_err());
    }

    #[test]
    fn calling_code_accepts_leading_plus() {
        assert_eq!(normalize_calling_code("+55").unwrap(), "55");
        assert_eq!(normalize_calling_code("1").unwrap(), "1");
    }

    #[test]
    fn calling_code_rejects_non_digits_and_long_codes() {
        assert!(normalize_calling_code("").is_err());
        assert!(normalize_calling_code("5a").is_err());
        assert!(normalize_calling_code("1234").is_err());
    }

    #[test]
    fn pattern_is_anchored() {
        let pattern = Pattern::new(r"\d{9}").unwrap();
        assert!(pattern.is_full_match("123456789"));
        assert!(!pattern.is_full_match("1234567890"));
        assert!(!pattern.is_full_match("12345678"));
    }

    #[test]
    fn pattern_alternation_stays_anchored() {
        let pattern = Pattern::new("55|1").unwrap();
        assert!(pattern.is_full_match("55"));
        assert!(!pattern.is_full_match("551"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    fn strip_calling_code_only_at_start() {
        let rule = CountryRule::new("BRA", "55").unwrap();
        assert_eq!(rule.strip_calling_code("5511999998888"), "11999998888");
        assert_eq!(rule.strip_calling_code("11955"), "11955");
        assert_eq!(rule.international_digits("1199"), "551199");
    }
}
