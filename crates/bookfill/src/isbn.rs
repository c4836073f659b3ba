//! ISBN-10 and ISBN-13 validation.
//!
//! Raw input is normalized by dropping everything that is not a decimal digit or the `X` check
//! letter (in either case). A normalized candidate is only a usable identifier when it is 10 or 13
//! characters long and its check digit matches.

use std::{fmt, str::FromStr};

use crate::{Error, ErrorKind};

/// The check letter standing in for the value 10 in an ISBN-10.
const CHECK_LETTER: char = 'X';

/// Removes every character that is not a decimal digit or the check letter.
///
/// The case of the check letter is kept as is, so `normalize` is idempotent.
///
/// ```
/// assert_eq!("097522980x", bookfill::isbn::normalize("0-9752298-0-x"));
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || c.eq_ignore_ascii_case(&CHECK_LETTER))
        .collect()
}

/// Returns true when `raw` normalizes to a 10 or 13 character ISBN with a valid check digit.
///
/// ```
/// assert!(bookfill::isbn::is_isbn("978-0-306-40615-7"));
/// assert!(!bookfill::isbn::is_isbn("978-0-306-40615-8"));
/// ```
#[must_use]
pub fn is_isbn(raw: &str) -> bool {
    let candidate = normalize(raw);
    match candidate.len() {
        10 => isbn10_checksum(&candidate),
        13 => isbn13_checksum(&candidate),
        _ => false,
    }
}

fn digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

/// Weighted mod-10: digits at odd positions count three times.
fn isbn13_checksum(candidate: &str) -> bool {
    let (body, check) = candidate.split_at(12);
    let Some(body) = digits(body) else {
        return false;
    };

    let sum: u32 = body.iter().zip([1, 3].iter().cycle()).map(|(d, w)| d * w).sum();
    let expected = (10 - sum % 10) % 10;

    check.chars().next().and_then(|c| c.to_digit(10)) == Some(expected)
}

/// Mod-11 with weights 10 down to 2, where a check value of 10 is written as `X`.
fn isbn10_checksum(candidate: &str) -> bool {
    let (body, check) = candidate.split_at(9);
    let Some(body) = digits(body) else {
        return false;
    };

    let sum: u32 = body.iter().zip((2..=10).rev()).map(|(d, w)| d * w).sum();
    let expected = match (11 - sum % 11) % 11 {
        10 => CHECK_LETTER,
        n => char::from_digit(n, 10).unwrap_or(CHECK_LETTER),
    };

    check
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
}

/// The two supported ISBN layouts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IsbnFormat {
    /// Ten characters, mod-11 check digit.
    Isbn10,
    /// Thirteen digits, weighted mod-10 check digit.
    Isbn13,
}

/// A normalized ISBN whose check digit has been verified.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Isbn(String);

impl Isbn {
    /// Normalizes `raw` and keeps it only when the checksum passes.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::InvalidIsbn`] is returned when the normalized input is not 10
    /// or 13 characters long or when its check digit does not match.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if is_isbn(raw) {
            Ok(Self(normalize(raw)))
        } else {
            Err(Error::new(
                ErrorKind::InvalidIsbn,
                format!("'{raw}' is not a valid ISBN-10 or ISBN-13"),
            ))
        }
    }

    /// The normalized identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Which of the two layouts this identifier uses.
    #[must_use]
    pub fn format(&self) -> IsbnFormat {
        if self.0.len() == 10 {
            IsbnFormat::Isbn10
        } else {
            IsbnFormat::Isbn13
        }
    }
}

impl FromStr for Isbn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
