use serde::{Deserialize, Serialize};

use super::error::NumberingError;

/// A parsed document number template.
///
/// Templates are plain text with two kinds of placeholder:
///
/// - `YYYY` renders the full year, `YY` the last two digits. Any other
///   run of `Y`s stays literal.
/// - A run of 2 to 4 `N`s is the sequence placeholder, zero-padded to the
///   run width. Exactly one such run is required; longer runs are
///   rejected. A single `N` stays literal, so prefixes like `INV` keep
///   their letters.
///
/// `"INV-YYYY-NNN"` with year 2025 and sequence 6 renders `"INV-2025-006"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberTemplate {
    raw: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    YearFull,
    YearShort,
    Sequence { width: usize },
}

/// Fields recovered from a formatted number by [`NumberTemplate::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberParts {
    /// Present when the template carries a year placeholder. Two-digit
    /// years are mapped into 2000..=2099.
    pub year: Option<i32>,
    pub sequence: u32,
}

impl NumberTemplate {
    /// Parse and validate a template string.
    pub fn parse(template: impl Into<String>) -> Result<Self, NumberingError> {
        let raw = template.into();
        if raw.trim().is_empty() {
            return Err(invalid(&raw, "template is empty"));
        }

        let mut tokens: Vec<Token> = Vec::new();
        let mut literal = String::new();
        let mut placeholder_seen = false;

        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c != 'N' && c != 'Y' {
                literal.push(c);
                i += 1;
                continue;
            }

            let mut j = i;
            while j < chars.len() && chars[j] == c {
                j += 1;
            }
            let run = j - i;

            if c == 'N' {
                match run {
                    1 => literal.push('N'),
                    2..=4 => {
                        if placeholder_seen {
                            return Err(invalid(&raw, "more than one sequence placeholder"));
                        }
                        placeholder_seen = true;
                        flush(&mut tokens, &mut literal);
                        tokens.push(Token::Sequence { width: run });
                    }
                    _ => {
                        return Err(invalid(
                            &raw,
                            "sequence placeholder longer than 4 digits",
                        ));
                    }
                }
            } else {
                match run {
                    4 => {
                        flush(&mut tokens, &mut literal);
                        tokens.push(Token::YearFull);
                    }
                    2 => {
                        flush(&mut tokens, &mut literal);
                        tokens.push(Token::YearShort);
                    }
                    _ => literal.push_str(&"Y".repeat(run)),
                }
            }
            i = j;
        }
        flush(&mut tokens, &mut literal);

        if !placeholder_seen {
            return Err(invalid(
                &raw,
                "missing sequence placeholder (a run of 2 to 4 'N's)",
            ));
        }

        Ok(Self { raw, tokens })
    }

    /// The template text as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Width of the sequence placeholder in digits.
    pub fn sequence_width(&self) -> usize {
        self.tokens
            .iter()
            .find_map(|t| match t {
                Token::Sequence { width } => Some(*width),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Whether the template renders a four-digit year.
    pub fn has_full_year(&self) -> bool {
        self.tokens.contains(&Token::YearFull)
    }

    /// Render a number for the given year and sequence value. Sequences
    /// wider than the placeholder print in full rather than truncating.
    pub fn render(&self, year: i32, sequence: u32) -> String {
        use std::fmt::Write;

        let mut out = String::with_capacity(self.raw.len() + 4);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::YearFull => {
                    let _ = write!(out, "{year:04}");
                }
                Token::YearShort => {
                    let _ = write!(out, "{:02}", year.rem_euclid(100));
                }
                Token::Sequence { width } => {
                    let _ = write!(out, "{:0w$}", sequence, w = *width);
                }
            }
        }
        out
    }

    /// Parse a formatted number back to its year and sequence.
    ///
    /// Returns `None` when the number does not conform to this template.
    /// The sequence field consumes a maximal digit run of at least the
    /// placeholder width, so templates where the sequence placeholder
    /// directly precedes another numeric field are not extractable.
    pub fn extract(&self, number: &str) -> Option<NumberParts> {
        let mut rest = number;
        let mut year = None;
        let mut sequence = None;

        for token in &self.tokens {
            match token {
                Token::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                Token::YearFull => {
                    let (digits, tail) = split_digits(rest, 4)?;
                    year = Some(digits.parse::<i32>().ok()?);
                    rest = tail;
                }
                Token::YearShort => {
                    let (digits, tail) = split_digits(rest, 2)?;
                    year = Some(2000 + digits.parse::<i32>().ok()?);
                    rest = tail;
                }
                Token::Sequence { width } => {
                    let end = rest
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(rest.len());
                    if end < *width {
                        return None;
                    }
                    sequence = Some(rest[..end].parse::<u32>().ok()?);
                    rest = &rest[end..];
                }
            }
        }

        if !rest.is_empty() {
            return None;
        }
        Some(NumberParts {
            year,
            sequence: sequence?,
        })
    }
}

fn flush(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn invalid(template: &str, reason: &str) -> NumberingError {
    NumberingError::InvalidFormat {
        template: template.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Split exactly `len` ASCII digits off the front of `input`. The byte
/// check keeps `split_at` on a char boundary for arbitrary input.
fn split_digits(input: &str, len: usize) -> Option<(&str, &str)> {
    if input.len() < len || !input.as_bytes()[..len].iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(input.split_at(len))
}
