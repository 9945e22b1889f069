pub mod mask;
pub mod phone;
pub mod rule;

pub use mask::{apply_mask, strip_mask, Mask, DIGIT_PLACEHOLDER};
pub use phone::{normalize_digits, ParsedPhone, PhoneResult};
pub use rule::{normalize_calling_code, normalize_country_iso, CountryRule, Pattern};
