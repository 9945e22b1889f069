pub mod domain;
pub mod dto;
pub mod engine;
pub mod error;
pub mod field;
pub mod rules;

pub use domain::*;
pub use dto::*;
pub use engine::{build_result, compute_phone_result, DisplayMode, PhoneEngine};
pub use error::CoreError;
pub use field::{
    FieldEvent, FieldEventParseError, FieldOutcome, FieldState, FocusIntent, MaskTiming,
    PhoneField,
};
pub use rules::*;
