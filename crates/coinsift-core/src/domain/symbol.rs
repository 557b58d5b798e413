use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 20;

/// Normalized trading-pair symbol (e.g. `BTCUSDT`).
///
/// Venue pair symbols are plain concatenations of base and quote asset and
/// may start with a digit (`1INCHUSDT`), so only the character set and
/// length are constrained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a pair symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the pair settles in the given quote asset (by suffix).
    pub fn has_quote_suffix(&self, quote_asset: &str) -> bool {
        self.0.ends_with(&quote_asset.trim().to_ascii_uppercase())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" btcusdt ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BTCUSDT");
    }

    #[test]
    fn accepts_digit_prefixed_pairs() {
        let parsed = Symbol::parse("1INCHUSDT").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "1INCHUSDT");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("BTC/USDT").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { .. }));
    }

    #[test]
    fn matches_quote_suffix() {
        let parsed = Symbol::parse("ETHUSDT").expect("symbol should parse");
        assert!(parsed.has_quote_suffix("usdt"));
        assert!(!parsed.has_quote_suffix("BTC"));
    }
}
