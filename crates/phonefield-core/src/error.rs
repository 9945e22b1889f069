use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("no country rule matches calling code of +{0}")]
    UnsupportedCountry(String),
    #[error("unknown country: {0}")]
    UnknownCountry(String),
    #[error("invalid country iso code: {0:?}")]
    InvalidCountryIso(String),
    #[error("invalid calling code: {0:?}")]
    InvalidCallingCode(String),
    #[error("invalid mask {mask:?}: {reason}")]
    InvalidMask { mask: String, reason: String },
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("duplicate country rule: {0}")]
    DuplicateCountry(String),
    #[error("rule table is empty")]
    EmptyRuleTable,
}
