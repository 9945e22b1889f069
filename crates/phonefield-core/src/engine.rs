use crate::domain::{apply_mask, CountryRule, ParsedPhone, PhoneResult};
use crate::error::CoreError;
use crate::rules::{resolve_country, validate, ResolveOptions, RuleTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Masked,
    Digits,
}

/// Resolves, formats and validates a raw field value in one pass.
pub fn compute_phone_result(
    raw_value: &str,
    rules: &RuleTable,
    default_country_iso: &str,
    explicit_country_iso: Option<&str>,
    options: ResolveOptions,
) -> Result<PhoneResult, CoreError> {
    let parsed = resolve_country(
        raw_value,
        rules,
        default_country_iso,
        explicit_country_iso,
        options,
    )?;
    Ok(build_result(&parsed, rules, DisplayMode::Masked))
}

pub fn build_result(parsed: &ParsedPhone, rules: &RuleTable, display: DisplayMode) -> PhoneResult {
    let rule = parsed
        .selected_country_iso
        .as_deref()
        .and_then(|iso| rules.get(iso));

    match rule {
        Some(rule) => result_for_rule(&parsed.national_digits, rule, display),
        None => PhoneResult {
            international_value: format!("+{}", parsed.national_digits),
            display_value: parsed.national_digits.clone(),
            is_valid: false,
        },
    }
}

fn result_for_rule(national_digits: &str, rule: &CountryRule, display: DisplayMode) -> PhoneResult {
    let national = match rule.mask() {
        Some(mask) => mask.clamp(national_digits),
        None => national_digits.to_string(),
    };
    let international_digits = rule.international_digits(&national);
    let display_value = match display {
        DisplayMode::Masked => apply_mask(&national, rule.mask()),
        DisplayMode::Digits => national.clone(),
    };

    PhoneResult {
        is_valid: !national.is_empty() && validate(&international_digits, rule),
        international_value: format!("+{}", international_digits),
        display_value,
    }
}

/// Rule table plus the settings every computation shares.
#[derive(Debug, Clone)]
pub struct PhoneEngine {
    rules: RuleTable,
    default_country_iso: String,
    options: ResolveOptions,
}

impl PhoneEngine {
    pub fn new(
        rules: RuleTable,
        default_country_iso: &str,
        options: ResolveOptions,
    ) -> Result<Self, CoreError> {
        let default_country_iso = rules.require(default_country_iso)?.country_iso().to_string();
        Ok(Self {
            rules,
            default_country_iso,
            options,
        })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn default_country_iso(&self) -> &str {
        &self.default_country_iso
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    pub fn rule(&self, country_iso: &str) -> Option<&CountryRule> {
        self.rules.get(country_iso)
    }

    pub fn parse(
        &self,
        raw_value: &str,
        explicit_country_iso: Option<&str>,
    ) -> Result<ParsedPhone, CoreError> {
        resolve_country(
            raw_value,
            &self.rules,
            &self.default_country_iso,
            explicit_country_iso,
            self.options,
        )
    }

    pub fn compute(
        &self,
        raw_value: &str,
        explicit_country_iso: Option<&str>,
    ) -> Result<PhoneResult, CoreError> {
        self.compute_with(raw_value, explicit_country_iso, DisplayMode::Masked)
    }

    pub fn compute_with(
        &self,
        raw_value: &str,
        explicit_country_iso: Option<&str>,
        display: DisplayMode,
    ) -> Result<PhoneResult, CoreError> {
        let parsed = self.parse(raw_value, explicit_country_iso)?;
        Ok(build_result(&parsed, &self.rules, display))
    }

    pub fn countries(&self) -> Vec<CountryRule> {
        self.rules.sorted_for_display()
    }
}

impl Default for PhoneEngine {
    fn default() -> Self {
        Self {
            rules: RuleTable::builtin(),
            default_country_iso: "BRA".to_string(),
            options: ResolveOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_phone_result, DisplayMode, PhoneEngine};
    use crate::domain::CountryRule;
    use crate::rules::{ResolveOptions, RuleTable, UnmatchedPrefix};

    #[test]
    fn compute_formats_and_clamps_brazilian_number() {
        let result = compute_phone_result(
            "+5511999998888",
            &RuleTable::builtin(),
            "BRA",
            None,
            ResolveOptions::default(),
        )
        .expect("compute");
        assert_eq!(result.display_value, "(11) 9999-9888");
        assert_eq!(result.international_value, "+551199999888");
        assert!(result.is_valid);
    }

    #[test]
    fn compute_with_explicit_country() {
        let engine = PhoneEngine::default();
        let result = engine.compute("11999998888", Some("USA")).expect("compute");
        assert_eq!(result.display_value, "119 9999888");
        assert_eq!(result.international_value, "+11199999888");
        assert!(result.is_valid);
    }

    #[test]
    fn partial_number_is_invalid() {
        let engine = PhoneEngine::default();
        let result = engine.compute("11 9999", None).expect("compute");
        assert_eq!(result.display_value, "(11) 9999");
        assert_eq!(result.international_value, "+55119999");
        assert!(!result.is_valid);
    }

    #[test]
    fn empty_value_is_invalid_even_without_constraints() {
        let rules = RuleTable::new(vec![CountryRule::new("ARG", "54").unwrap()]).unwrap();
        let engine = PhoneEngine::new(rules, "ARG", ResolveOptions::default()).unwrap();

        let empty = engine.compute("", None).expect("compute");
        assert_eq!(empty.international_value, "+54");
        assert_eq!(empty.display_value, "");
        assert!(!empty.is_valid);

        let short = engine.compute("1", None).expect("compute");
        assert!(short.is_valid);
    }

    #[test]
    fn unassigned_digits_are_invalid() {
        let options = ResolveOptions {
            unmatched_prefix: UnmatchedPrefix::Lenient,
            ..ResolveOptions::default()
        };
        let engine = PhoneEngine::new(RuleTable::builtin(), "BRA", options).unwrap();
        let result = engine.compute("+44 20 7946", None).expect("compute");
        assert_eq!(result.international_value, "+44207946");
        assert_eq!(result.display_value, "44207946");
        assert!(!result.is_valid);
    }

    #[test]
    fn digits_display_skips_mask_but_keeps_clamp() {
        let engine = PhoneEngine::default();
        let result = engine
            .compute_with("+5511999998888", None, DisplayMode::Digits)
            .expect("compute");
        assert_eq!(result.display_value, "1199999888");
        assert_eq!(result.international_value, "+551199999888");
    }

    #[test]
    fn engine_rejects_unknown_default_country() {
        assert!(PhoneEngine::new(RuleTable::builtin(), "CHL", ResolveOptions::default()).is_err());
    }

    #[test]
    fn engine_normalizes_default_country() {
        let engine =
            PhoneEngine::new(RuleTable::builtin(), "usa", ResolveOptions::default()).unwrap();
        assert_eq!(engine.default_country_iso(), "USA");
    }

    #[test]
    fn compute_is_idempotent() {
        let engine = PhoneEngine::default();
        let first = engine.compute("+54 9 11 5555-1234", None).expect("compute");
        let second = engine.compute("+54 9 11 5555-1234", None).expect("compute");
        assert_eq!(first, second);
    }
}
