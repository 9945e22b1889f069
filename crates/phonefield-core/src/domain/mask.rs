use crate::domain::phone::normalize_digits;
use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

pub const DIGIT_PLACEHOLDER: char = '9';
const OPTIONAL_OPEN: char = '[';
const OPTIONAL_CLOSE: char = ']';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Digit,
    Literal(char),
}

/// Positional digit template such as `(99) 9999-9999[9]`.
///
/// `9` marks a digit slot and every other character is emitted verbatim.
/// A single bracketed tail segment holds optional slots; the brackets
/// themselves never appear in formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    template: String,
    slots: Vec<Slot>,
    required: usize,
    capacity: usize,
}

impl Mask {
    pub fn new(template: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidMask {
            mask: template.to_string(),
            reason: reason.to_string(),
        };

        let mut slots = Vec::with_capacity(template.len());
        let mut required = 0;
        let mut capacity = 0;
        let mut in_optional = false;
        let mut optional_slots = 0;
        let mut closed = false;

        for ch in template.chars() {
            if closed {
                return Err(invalid("optional segment must end the mask"));
            }
            match ch {
                DIGIT_PLACEHOLDER => {
                    slots.push(Slot::Digit);
                    capacity += 1;
                    if in_optional {
                        optional_slots += 1;
                    } else {
                        required += 1;
                    }
                }
                OPTIONAL_OPEN => {
                    if in_optional {
                        return Err(invalid("nested optional segment"));
                    }
                    in_optional = true;
                }
                OPTIONAL_CLOSE => {
                    if !in_optional {
                        return Err(invalid("unbalanced ']'"));
                    }
                    if optional_slots == 0 {
                        return Err(invalid("optional segment has no digit slot"));
                    }
                    in_optional = false;
                    closed = true;
                }
                ch if ch.is_ascii_digit() => {
                    return Err(invalid("only '9' may appear as a digit"));
                }
                ch => slots.push(Slot::Literal(ch)),
            }
        }

        if in_optional {
            return Err(invalid("unbalanced '['"));
        }
        if capacity == 0 {
            return Err(invalid("mask has no digit slot"));
        }

        Ok(Self {
            template: template.to_string(),
            slots,
            required,
            capacity,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Number of digits the mask can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of digits needed before the optional segment.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Length of a completely filled display value, in characters.
    pub fn display_len(&self) -> usize {
        self.slots.len()
    }

    pub fn accepts_len(&self, len: usize) -> bool {
        len >= self.required && len <= self.capacity
    }

    /// Keeps the leading digits that fit; anything past capacity is dropped.
    pub fn clamp(&self, digits: &str) -> String {
        normalize_digits(digits).chars().take(self.capacity).collect()
    }

    pub fn apply(&self, digits: &str) -> String {
        let digits = normalize_digits(digits);
        let mut remaining = digits.chars().peekable();
        let mut out = String::with_capacity(self.slots.len());

        for slot in &self.slots {
            if remaining.peek().is_none() {
                break;
            }
            match slot {
                Slot::Digit => {
                    if let Some(digit) = remaining.next() {
                        out.push(digit);
                    }
                }
                Slot::Literal(ch) => out.push(*ch),
            }
        }

        out
    }
}

impl FromStr for Mask {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Mask::new(value)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

pub fn apply_mask(digits: &str, mask: Option<&Mask>) -> String {
    match mask {
        Some(mask) => mask.apply(digits),
        None => digits.to_string(),
    }
}

pub fn strip_mask(masked: &str) -> String {
    normalize_digits(masked)
}
