pub mod resolve;
pub mod table;
pub mod validation;

pub use resolve::{resolve_country, PrefixMatch, ResolveOptions, UnmatchedPrefix};
pub use table::RuleTable;
pub use validation::{validate, validate_with};
