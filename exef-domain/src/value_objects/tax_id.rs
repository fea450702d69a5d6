//! NIP — the ten-digit Polish tax identifier, with its checksum formula.

use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated ten-digit NIP.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

const NIP_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

impl TaxId {
    /// Strips a leading two-letter country prefix and all separators, then
    /// validates length and the mod-11 checksum.
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        let normalized = normalize_nip(raw);
        if normalized.len() != 10 || !normalized.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FlowError::validation(format!("NIP must be 10 digits, got {:?}", raw)));
        }
        if !Self::checksum_valid(&normalized) {
            return Err(FlowError::validation(format!("NIP checksum invalid for {:?}", raw)));
        }
        Ok(Self(normalized))
    }

    fn checksum_valid(digits: &str) -> bool {
        let d: Vec<u32> = digits.bytes().map(|b| (b - b'0') as u32).collect();
        let sum: u32 = NIP_WEIGHTS.iter().zip(&d[..9]).map(|(w, v)| w * v).sum();
        sum % 11 == d[9]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uppercases, strips a leading two-letter country prefix, and removes
/// whitespace, dashes and dots. Does not validate length or checksum —
/// used both by [`TaxId::parse`] and by the document-identity normalizer,
/// which accepts malformed NIPs as opaque strings.
pub fn normalize_nip(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let upper = raw.to_uppercase();
    let stripped = if upper.len() >= 2 && upper.as_bytes()[0].is_ascii_alphabetic() && upper.as_bytes()[1].is_ascii_alphabetic()
    {
        &upper[2..]
    } else {
        &upper[..]
    };
    stripped.chars().filter(|c| !matches!(c, ' ' | '-' | '.')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_nip() {
        assert!(TaxId::parse("5213003700").is_ok());
    }

    #[test]
    fn accepts_with_country_prefix_and_separators() {
        let a = TaxId::parse("5213003700").unwrap();
        let b = TaxId::parse("PL5213003700").unwrap();
        let c = TaxId::parse(" 521-300-37-00 ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn rejects_bad_checksum() {
        assert!(TaxId::parse("5213003701").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(TaxId::parse("123").is_err());
    }
}
