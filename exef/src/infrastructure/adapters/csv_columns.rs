// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared CSV column-alias lookup used by the `csv` import adapter, the
//! bank-statement adapters, and the CSV upload path — all three match
//! header names case-insensitively against a bilingual (Polish/English)
//! alias table rather than a fixed column order (spec.md §4.3).

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Auto-detects the delimiter by comparing semicolon and comma counts on
/// the header line (spec.md §4.3 `csv` adapter).
pub fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons >= commas {
        b';'
    } else {
        b','
    }
}

/// Builds a lowercase-header -> column-index map for case-insensitive
/// alias lookups.
pub fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers.iter().enumerate().map(|(i, h)| (h.trim().to_lowercase(), i)).collect()
}

/// Returns the first field in `record` whose header matches any of
/// `aliases` (already lowercase), trimmed.
pub fn field_by_alias<'a>(record: &'a csv::StringRecord, index: &HashMap<String, usize>, aliases: &[&str]) -> Option<&'a str> {
    for alias in aliases {
        if let Some(&i) = index.get(*alias) {
            if let Some(v) = record.get(i) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
        }
    }
    None
}

pub const NUMBER_ALIASES: &[&str] = &["number", "numer", "nr", "nr_dokumentu", "numer_faktury"];
pub const GROSS_ALIASES: &[&str] = &["amount_gross", "brutto", "kwota_brutto", "kwota", "gross", "amount"];
pub const NET_ALIASES: &[&str] = &["amount_net", "netto", "kwota_netto", "net"];
pub const VAT_ALIASES: &[&str] = &["amount_vat", "vat", "kwota_vat"];
pub const CONTRACTOR_NAME_ALIASES: &[&str] = &["contractor_name", "kontrahent", "nazwa", "sprzedawca"];
pub const CONTRACTOR_TAX_ID_ALIASES: &[&str] = &["contractor_tax_id", "nip", "tax_id"];
pub const DATE_ALIASES: &[&str] = &["document_date", "data", "date", "data_wystawienia"];
pub const CURRENCY_ALIASES: &[&str] = &["currency", "waluta"];
pub const CATEGORY_ALIASES: &[&str] = &["category", "kategoria"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "opis", "tytul", "title"];

/// Parses a Polish-formatted decimal amount: comma decimal separator,
/// optional space thousands separators, optional trailing currency marker.
pub fn parse_polish_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches("PLN")
        .trim_end_matches("zł")
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let normalized = cleaned.replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
