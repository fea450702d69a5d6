// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `csv` import adapter (spec.md §4.3) and the row-level parser it
//! shares with the bare CSV-upload path (`UploadCsvUseCase`), since both
//! apply the same bilingual column-alias mapping to a decoded CSV body.

use super::csv_columns::{
    detect_delimiter, field_by_alias, header_index, parse_polish_amount, CATEGORY_ALIASES, CONTRACTOR_NAME_ALIASES,
    CONTRACTOR_TAX_ID_ALIASES, CURRENCY_ALIASES, DATE_ALIASES, DESCRIPTION_ALIASES, GROSS_ALIASES, NET_ALIASES, NUMBER_ALIASES,
    VAT_ALIASES,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::services::adapter_contract::{config_str, AdapterConfig, ImportAdapter, ImportResult, TestConnectionResult};
use exef_domain::FlowError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];

fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parses already-decoded CSV text into [`ImportResult`]s, skipping rows
/// with no number, no gross amount, and no contractor name (spec.md §4.3).
pub fn parse_csv_text(text: &str, source_id_prefix: &str) -> Result<Vec<ImportResult>, FlowError> {
    let first_line = text.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);
    let mut reader = csv::ReaderBuilder::new().delimiter(delimiter).has_headers(true).from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| FlowError::adapter_parse(0, format!("reading CSV header: {e}")))?
        .clone();
    let index = header_index(&headers);

    let mut results = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(|e| FlowError::adapter_parse(row_no + 1, e.to_string()))?;

        let number = field_by_alias(&record, &index, NUMBER_ALIASES);
        let gross = field_by_alias(&record, &index, GROSS_ALIASES);
        let contractor_name = field_by_alias(&record, &index, CONTRACTOR_NAME_ALIASES);
        if number.is_none() && gross.is_none() && contractor_name.is_none() {
            continue;
        }

        let mut result = ImportResult::new(format!("{source_id_prefix}-{row_no}"));
        result.number = number.map(str::to_string);
        result.amount_gross = gross.and_then(parse_polish_amount);
        result.amount_net = field_by_alias(&record, &index, NET_ALIASES).and_then(parse_polish_amount);
        result.amount_vat = field_by_alias(&record, &index, VAT_ALIASES).and_then(parse_polish_amount);
        result.contractor_name = contractor_name.map(str::to_string);
        result.contractor_tax_id = field_by_alias(&record, &index, CONTRACTOR_TAX_ID_ALIASES).map(str::to_string);
        result.currency = field_by_alias(&record, &index, CURRENCY_ALIASES).map(str::to_string);
        result.category = field_by_alias(&record, &index, CATEGORY_ALIASES).map(str::to_string);
        result.description = field_by_alias(&record, &index, DESCRIPTION_ALIASES).map(str::to_string);
        result.document_date = field_by_alias(&record, &index, DATE_ALIASES).and_then(parse_flexible_date);
        results.push(result);
    }
    Ok(results)
}

/// Registered as the `csv` import tag: parses CSV bytes the HTTP upload
/// handler injected into the source's config under `csv_data` (spec.md
/// §4.3: "parses config-provided CSV bytes").
pub struct CsvImportAdapter {
    csv_data: Option<String>,
}

impl CsvImportAdapter {
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            csv_data: config_str(config, "csv_data").map(str::to_string),
        }
    }
}

#[async_trait]
impl ImportAdapter for CsvImportAdapter {
    async fn fetch(&self, _period_start: Option<NaiveDate>, _period_end: Option<NaiveDate>) -> Result<Vec<ImportResult>, FlowError> {
        match &self.csv_data {
            Some(text) => parse_csv_text(text, "csv"),
            None => Err(FlowError::Configuration("csv import source has no csv_data configured".to_string())),
        }
    }

    async fn test_connection(&self) -> TestConnectionResult {
        if self.csv_data.is_some() {
            TestConnectionResult::ok("csv source has data configured")
        } else {
            TestConnectionResult::failed("csv source has no csv_data configured")
        }
    }

    fn tag(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_rows_with_no_identifying_field() {
        let csv = "number;brutto;kontrahent\n;;\nFV/1;123,45;ACME\n";
        let results = parse_csv_text(csv, "csv").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].number.as_deref(), Some("FV/1"));
        assert_eq!(results[0].contractor_name.as_deref(), Some("ACME"));
    }

    #[test]
    fn auto_detects_comma_delimiter() {
        let csv = "number,amount_gross,contractor_name\nFV/2,200.00,Beta\n";
        let results = parse_csv_text(csv, "csv").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].amount_gross.unwrap().to_string(), "200.00");
    }
}
