use crate::domain::{normalize_digits, ParsedPhone};
use crate::error::CoreError;
use crate::rules::table::RuleTable;
use serde::{Deserialize, Serialize};

/// Tie-break when several calling codes prefix the same digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixMatch {
    #[default]
    Longest,
    First,
}

/// What to do with a `+` value whose digits match no calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedPrefix {
    #[default]
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    pub prefix_match: PrefixMatch,
    pub unmatched_prefix: UnmatchedPrefix,
}

/// Splits a raw value into country and national digits.
///
/// An explicit country always wins. Otherwise a leading `+` triggers a
/// calling-code lookup, and anything else belongs to `default_country_iso`.
pub fn resolve_country(
    raw_value: &str,
    rules: &RuleTable,
    default_country_iso: &str,
    explicit_country_iso: Option<&str>,
    options: ResolveOptions,
) -> Result<ParsedPhone, CoreError> {
    let trimmed = raw_value.trim_start();
    let international = trimmed.starts_with('+');
    let digits = normalize_digits(trimmed);

    if let Some(explicit) = explicit_country_iso {
        let rule = rules.require(explicit)?;
        let national = if international {
            rule.strip_calling_code(&digits)
        } else {
            digits.as_str()
        };
        return Ok(ParsedPhone {
            selected_country_iso: Some(rule.country_iso().to_string()),
            national_digits: national.to_string(),
        });
    }

    if international {
        return match rules.match_calling_code(&digits, options.prefix_match) {
            Some(rule) => Ok(ParsedPhone {
                selected_country_iso: Some(rule.country_iso().to_string()),
                national_digits: rule.strip_calling_code(&digits).to_string(),
            }),
            None => match options.unmatched_prefix {
                UnmatchedPrefix::Strict => Err(CoreError::UnsupportedCountry(digits)),
                UnmatchedPrefix::Lenient => Ok(ParsedPhone::unassigned(digits)),
            },
        };
    }

    let rule = rules.require(default_country_iso)?;
    Ok(ParsedPhone {
        selected_country_iso: Some(rule.country_iso().to_string()),
        national_digits: digits,
    })
}
