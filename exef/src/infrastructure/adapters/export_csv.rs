// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The generic `csv` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_csv.py`: UTF-8-BOM,
//! semicolon delimiter.

use super::export_xml::amount_2dp;
use async_trait::async_trait;
use exef_domain::services::adapter_contract::{ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::{DocumentKind, OutputFormat};
use exef_domain::FlowError;

pub struct CsvExportAdapter;

#[async_trait]
impl ExportAdapter for CsvExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(Vec::new());
        writer
            .write_record(["Lp", "Typ", "Numer", "Data", "Kontrahent", "NIP", "Netto", "VAT", "Brutto", "Waluta", "Kategoria", "Opis"])
            .map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;

        for (idx, doc) in documents.iter().enumerate() {
            let doc_date = doc.document_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
            let typ = if doc.kind == DocumentKind::Invoice { "invoice".to_string() } else { format!("{:?}", doc.kind).to_lowercase() };

            writer
                .write_record([
                    (idx + 1).to_string(),
                    typ,
                    doc.number.clone().unwrap_or_default(),
                    doc_date,
                    doc.contractor_name.clone().unwrap_or_default(),
                    doc.contractor_tax_id.clone().unwrap_or_default(),
                    amount_2dp(doc.amount_net).to_string(),
                    amount_2dp(doc.amount_vat).to_string(),
                    amount_2dp(doc.amount_gross).to_string(),
                    doc.currency.clone(),
                    doc.category.clone().unwrap_or_default(),
                    doc.description.clone().unwrap_or_default(),
                ])
                .map_err(|e| FlowError::adapter_parse(idx + 1, e.to_string()))?;
        }

        let bytes = writer.into_inner().map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;
        let content = String::from_utf8(bytes).map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;
        let filename = format!("export_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"));

        Ok(ExportResult::utf8_bom(content, filename, OutputFormat::Csv, documents.len() as u32))
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok("Eksport CSV generuje plik do pobrania — nie wymaga połączenia.")
    }

    fn tag(&self) -> &'static str {
        "csv"
    }
}
