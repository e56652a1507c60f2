use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{CrackError, Result};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Ordered, duplicate-free set of symbols a candidate position can take.
///
/// Symbol order is significant: it is the order in which one odometer wheel
/// turns, so it fixes the enumeration order of every generator built on it.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: String,
    symbols: Arc<[char]>,
}

impl Alphabet {
    pub fn lowercase() -> Self {
        Self::builtin("lowercase", LOWERCASE)
    }

    pub fn uppercase() -> Self {
        Self::builtin("uppercase", UPPERCASE)
    }

    pub fn digits() -> Self {
        Self::builtin("digits", DIGITS)
    }

    /// Lowercase letters followed by digits, 36 symbols.
    pub fn alphanumeric() -> Self {
        Self::builtin("alphanumeric", &format!("{LOWERCASE}{DIGITS}"))
    }

    /// Build an alphabet from arbitrary symbols, rejecting empty or repeated input.
    pub fn custom(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(CrackError::InvalidPlan(
                "custom alphabet must contain at least one symbol".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = symbols.chars().find(|c| !seen.insert(*c)) {
            return Err(CrackError::InvalidPlan(format!(
                "custom alphabet repeats symbol '{dup}'"
            )));
        }

        Ok(Self {
            name: format!("custom({symbols})"),
            symbols: symbols.chars().collect(),
        })
    }

    fn builtin(name: &str, symbols: &str) -> Self {
        Self {
            name: name.to_string(),
            symbols: symbols.chars().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub(crate) fn shared_symbols(&self) -> Arc<[char]> {
        self.symbols.clone()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Wheel position of `symbol`, if it belongs to this alphabet.
    pub fn position(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&c| c == symbol)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({}, {} symbols)", self.name, self.symbols.len())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Alphabet as it appears in configuration files.
///
/// ```toml
/// segments = [{ alphabet = "lowercase", length = 3 }, { alphabet = { custom = "!@#" }, length = 1 }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetSpec {
    Lowercase,
    Uppercase,
    Digits,
    Alphanumeric,
    Custom(String),
}

impl AlphabetSpec {
    pub fn resolve(&self) -> Result<Alphabet> {
        match self {
            AlphabetSpec::Lowercase => Ok(Alphabet::lowercase()),
            AlphabetSpec::Uppercase => Ok(Alphabet::uppercase()),
            AlphabetSpec::Digits => Ok(Alphabet::digits()),
            AlphabetSpec::Alphanumeric => Ok(Alphabet::alphanumeric()),
            AlphabetSpec::Custom(symbols) => Alphabet::custom(symbols),
        }
    }
}
