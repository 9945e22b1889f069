use crate::domain::CountryRule;
use crate::error::CoreError;
use crate::rules::resolve::PrefixMatch;
use std::collections::HashSet;

/// Read-only set of country rules, kept in caller order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CountryRule>,
}

impl RuleTable {
    pub fn new<I>(rules: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = CountryRule>,
    {
        let rules: Vec<CountryRule> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(CoreError::EmptyRuleTable);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.country_iso()) {
                return Err(CoreError::DuplicateCountry(rule.country_iso().to_string()));
            }
        }

        Ok(Self { rules })
    }

    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRule> {
        self.rules.iter()
    }

    pub fn get(&self, country_iso: &str) -> Option<&CountryRule> {
        let wanted = country_iso.trim();
        self.rules
            .iter()
            .find(|rule| rule.country_iso().eq_ignore_ascii_case(wanted))
    }

    pub fn require(&self, country_iso: &str) -> Result<&CountryRule, CoreError> {
        self.get(country_iso)
            .ok_or_else(|| CoreError::UnknownCountry(country_iso.trim().to_string()))
    }

    /// Rule whose calling code starts `digits`.
    pub fn match_calling_code(&self, digits: &str, mode: PrefixMatch) -> Option<&CountryRule> {
        let mut candidates = self
            .rules
            .iter()
            .filter(|rule| digits.starts_with(rule.country_code()));

        match mode {
            PrefixMatch::First => candidates.next(),
            // ties keep table order
            PrefixMatch::Longest => candidates.fold(None, |best: Option<&CountryRule>, rule| {
                match best {
                    Some(current) if current.country_code().len() >= rule.country_code().len() => {
                        Some(current)
                    }
                    _ => Some(rule),
                }
            }),
        }
    }

    /// Fresh copy ordered by ISO code for country pickers.
    pub fn sorted_for_display(&self) -> Vec<CountryRule> {
        let mut sorted = self.rules.clone();
        sorted.sort_by(|a, b| a.country_iso().cmp(b.country_iso()));
        sorted
    }

    pub fn into_rules(self) -> Vec<CountryRule> {
        self.rules
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a CountryRule;
    type IntoIter = std::slice::Iter<'a, CountryRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn builtin_rules() -> Vec<CountryRule> {
    const BUILTIN: [(&str, &str, &str); 3] = [
        ("BRA", "55", "(99) 9999-9999"),
        ("ARG", "54", "9 999 999-9999"),
        ("USA", "1", "999 9999999"),
    ];

    BUILTIN
        .iter()
        .map(|(iso, code, mask)| {
            CountryRule::new(iso, code)
                .and_then(|rule| rule.with_mask(mask))
                .unwrap_or_else(|err| panic!("builtin rule {iso} is invalid: {err}"))
        })
        .collect()
}
