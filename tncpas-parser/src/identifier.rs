//! Staff and edition identifier value objects.
//!
//! A staff identifier packs `YYMMMS` (two-digit year, month abbreviation,
//! sequence letter) followed by a 3-character edition code and a 6-character
//! user id, e.g. `23NOVCABCX1Y2Z3`. An edition identifier is the short
//! `YYMMS` form, e.g. `2311C`. Both parse eagerly through [`FromStr`]; a
//! value that does not match the pattern keeps its raw form in the output
//! model instead of failing the parse.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::error::Error;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_from_abbreviation(abbreviation: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|month| abbreviation.eq_ignore_ascii_case(month))
        .and_then(|index| u32::try_from(index + 1).ok())
}

// Two-digit years pivot the way strptime's %y does: 00-68 is this century,
// 69-99 the last one.
fn resolve_two_digit_year(digits: &str) -> Option<i32> {
    let year: i32 = digits.parse().ok()?;
    Some(if year < 69 { 2000 + year } else { 1900 + year })
}

// Sequence letters map A-Z to 1-26, case-folded.
fn sequence_from_letter(letter: char) -> u32 {
    u32::from(letter.to_ascii_uppercase()) - u32::from('A') + 1
}

fn sequence_letter(sequence: u32) -> char {
    char::from_u32(u32::from('A') + sequence - 1).unwrap_or('A')
}

/// A staff identifier, e.g. `23NOVCABCX1Y2Z3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffIdentifier {
    value: String,
    year: i32,
    month: u32,
    sequence: u32,
    edition_code: String,
    user_id: String,
}

impl StaffIdentifier {
    /// Four-digit year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 to 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Sequence number, 1 to 26.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The 3-character edition code embedded in the identifier.
    #[must_use]
    pub fn edition_code(&self) -> &str {
        &self.edition_code
    }

    /// The user id part of the identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The edition identifier derived from the year, month and sequence.
    #[must_use]
    pub fn edition_id(&self) -> EditionIdentifier {
        EditionIdentifier::from_parts(self.year, self.month, self.sequence)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl FromStr for StaffIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidStaffIdentifier(s.to_string());
        if s.len() != 15 || !s.is_ascii() {
            return Err(invalid());
        }
        let (year_part, rest) = s.split_at(2);
        let (month_part, rest) = rest.split_at(3);
        let (sequence_part, rest) = rest.split_at(1);
        let (edition_code, user_id) = rest.split_at(3);

        if !year_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence_char = sequence_part
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?;
        if !rest.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid());
        }

        let year = resolve_two_digit_year(year_part).ok_or_else(invalid)?;
        let month = month_from_abbreviation(month_part).ok_or_else(invalid)?;

        Ok(Self {
            value: s.to_string(),
            year,
            month,
            sequence: sequence_from_letter(sequence_char),
            edition_code: edition_code.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

impl fmt::Display for StaffIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for StaffIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

/// An edition identifier, e.g. `2311C`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditionIdentifier {
    value: String,
    year: i32,
    month: u32,
    sequence: u32,
}

impl EditionIdentifier {
    /// Four-digit year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 to 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Sequence number, 1 to 26.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub(crate) fn from_parts(year: i32, month: u32, sequence: u32) -> Self {
        let letter = sequence_letter(sequence);
        Self {
            value: format!("{:02}{month:02}{letter}", year.rem_euclid(100)),
            year,
            month,
            sequence,
        }
    }
}

impl FromStr for EditionIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidEditionIdentifier(s.to_string());
        if s.len() != 5 || !s.is_ascii() {
            return Err(invalid());
        }
        let (year_part, rest) = s.split_at(2);
        let (month_part, sequence_part) = rest.split_at(2);

        if !year_part.bytes().all(|b| b.is_ascii_digit())
            || !month_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let sequence_char = sequence_part
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?;

        let year = resolve_two_digit_year(year_part).ok_or_else(invalid)?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self {
            value: s.to_string(),
            year,
            month,
            sequence: sequence_from_letter(sequence_char),
        })
    }
}

impl fmt::Display for EditionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for EditionIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}
