use crate::domain::{normalize_digits, normalize_country_iso, ParsedPhone, PhoneResult};
use crate::engine::{build_result, DisplayMode, PhoneEngine};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// When typed digits get run through the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MaskTiming {
    #[default]
    Keystroke,
    Blur,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Input(String),
    SelectCountry(String),
    Focus,
    Blur,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldEventParseError {
    #[error("empty event")]
    Empty,
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    #[error("select needs a country code")]
    MissingCountry,
    #[error("{0} takes no argument")]
    UnexpectedArgument(String),
}

impl FromStr for FieldEvent {
    type Err = FieldEventParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(FieldEventParseError::Empty);
        }
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "input" => Ok(FieldEvent::Input(rest.to_string())),
            "select" => {
                if rest.is_empty() {
                    return Err(FieldEventParseError::MissingCountry);
                }
                Ok(FieldEvent::SelectCountry(rest.to_string()))
            }
            "focus" | "blur" if !rest.is_empty() => {
                Err(FieldEventParseError::UnexpectedArgument(name.to_string()))
            }
            "focus" => Ok(FieldEvent::Focus),
            "blur" => Ok(FieldEvent::Blur),
            _ => Err(FieldEventParseError::UnknownEvent(name.to_string())),
        }
    }
}

impl fmt::Display for FieldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldEvent::Input(text) => write!(f, "input {}", text),
            FieldEvent::SelectCountry(iso) => write!(f, "select {}", iso),
            FieldEvent::Focus => f.write_str("focus"),
            FieldEvent::Blur => f.write_str("blur"),
        }
    }
}

/// Asks the rendering layer to move keyboard focus back to the text input
/// once it has finished handling the country picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusIntent {
    RestoreInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub change: Option<PhoneResult>,
    pub focus: Option<FocusIntent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub value: String,
    pub display_value: String,
    pub country_iso: Option<String>,
    pub national_digits: String,
    pub is_valid: bool,
    pub focused: bool,
}

/// Controlled-value loop of a phone input, without any rendering.
#[derive(Debug)]
pub struct PhoneField<'a> {
    engine: &'a PhoneEngine,
    timing: MaskTiming,
    state: FieldState,
}

impl<'a> PhoneField<'a> {
    pub fn new(
        engine: &'a PhoneEngine,
        timing: MaskTiming,
        initial_value: &str,
    ) -> Result<Self, CoreError> {
        let parsed = engine.parse(initial_value, None)?;
        let result = build_result(&parsed, engine.rules(), DisplayMode::Masked);
        let clamped = ParsedPhone {
            national_digits: clamp_to_rule(engine, &parsed),
            ..parsed
        };
        let state = state_from(&clamped, result, false);
        Ok(Self {
            engine,
            timing,
            state,
        })
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn timing(&self) -> MaskTiming {
        self.timing
    }

    pub fn handle(&mut self, event: FieldEvent) -> Result<FieldOutcome, CoreError> {
        match event {
            FieldEvent::Input(text) => Ok(self.input(&text)),
            FieldEvent::SelectCountry(iso) => self.select_country(&iso),
            FieldEvent::Focus => {
                self.state.focused = true;
                Ok(FieldOutcome::default())
            }
            FieldEvent::Blur => {
                self.state.focused = false;
                Ok(self.blur())
            }
        }
    }

    fn display_mode(&self) -> DisplayMode {
        match (self.timing, self.state.focused) {
            (MaskTiming::Blur, true) => DisplayMode::Digits,
            _ => DisplayMode::Masked,
        }
    }

    fn input(&mut self, text: &str) -> FieldOutcome {
        let Some(country) = self.state.country_iso.clone() else {
            return FieldOutcome::default();
        };

        let mut digits = normalize_digits(text);
        if let Some(mask) = self.engine.rule(&country).and_then(|rule| rule.mask()) {
            digits = mask.clamp(&digits);
        }
        if digits == self.state.national_digits {
            return FieldOutcome::default();
        }

        let parsed = ParsedPhone {
            selected_country_iso: Some(country),
            national_digits: digits,
        };
        FieldOutcome {
            change: Some(self.commit(parsed)),
            focus: None,
        }
    }

    fn select_country(&mut self, iso: &str) -> Result<FieldOutcome, CoreError> {
        let iso = normalize_country_iso(iso)?;
        let rule = self.engine.rules().require(&iso)?;
        let parsed = ParsedPhone {
            selected_country_iso: Some(rule.country_iso().to_string()),
            national_digits: self.state.national_digits.clone(),
        };
        Ok(FieldOutcome {
            change: Some(self.commit(parsed)),
            focus: Some(FocusIntent::RestoreInput),
        })
    }

    fn blur(&mut self) -> FieldOutcome {
        if self.timing != MaskTiming::Blur || self.state.country_iso.is_none() {
            return FieldOutcome::default();
        }
        let parsed = ParsedPhone {
            selected_country_iso: self.state.country_iso.clone(),
            national_digits: self.state.national_digits.clone(),
        };
        FieldOutcome {
            change: Some(self.commit(parsed)),
            focus: None,
        }
    }

    fn commit(&mut self, parsed: ParsedPhone) -> PhoneResult {
        let result = build_result(&parsed, self.engine.rules(), self.display_mode());
        let focused = self.state.focused;
        let clamped = ParsedPhone {
            national_digits: clamp_to_rule(self.engine, &parsed),
            ..parsed
        };
        self.state = state_from(&clamped, result.clone(), focused);
        result
    }
}

fn clamp_to_rule(engine: &PhoneEngine, parsed: &ParsedPhone) -> String {
    parsed
        .selected_country_iso
        .as_deref()
        .and_then(|iso| engine.rule(iso))
        .and_then(|rule| rule.mask())
        .map(|mask| mask.clamp(&parsed.national_digits))
        .unwrap_or_else(|| parsed.national_digits.clone())
}

fn state_from(parsed: &ParsedPhone, result: PhoneResult, focused: bool) -> FieldState {
    FieldState {
        value: result.international_value,
        display_value: result.display_value,
        country_iso: parsed.selected_country_iso.clone(),
        national_digits: parsed.national_digits.clone(),
        is_valid: result.is_valid,
        focused,
    }
}
