use crate::error::invalid_input;
use anyhow::Result;
use phonefield_core::normalize_country_iso;

pub fn parse_country(raw: &str) -> Result<String> {
    normalize_country_iso(raw)
        .map_err(|_| invalid_input(format!("country must be an ISO3 code, got {:?}", raw.trim())))
}

pub fn validity_label(is_valid: bool) -> &'static str {
    if is_valid {
        "valid"
    } else {
        "invalid"
    }
}

pub fn country_label(country_iso: Option<&str>) -> &str {
    country_iso.unwrap_or("-")
}
