// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `symfonia` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_symfonia.py`: CSV,
//! semicolon delimiter, CP1250 encoding, Polish `DD.MM.YYYY` dates, comma
//! decimal separator. The only exporter that overrides the default
//! UTF-8-BOM encoding (spec.md §4.3).

use async_trait::async_trait;
use exef_domain::services::adapter_contract::{ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::{DocumentKind, OutputFormat};
use exef_domain::FlowError;
use rust_decimal::Decimal;

use super::export_xml::{amount_2dp, vat_rate_percent};

fn comma_decimal(amount: Decimal) -> String {
    amount.to_string().replace('.', ",")
}

pub struct SymfoniaExportAdapter;

#[async_trait]
impl ExportAdapter for SymfoniaExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').quote_style(csv::QuoteStyle::Always).from_writer(Vec::new());
        writer
            .write_record([
                "Lp", "Typ", "Numer", "Data wystawienia", "Data operacji", "Kontrahent", "NIP", "Netto", "VAT", "Brutto",
                "Stawka VAT", "Waluta", "Kategoria", "Opis",
            ])
            .map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;

        for (idx, doc) in documents.iter().enumerate() {
            let doc_date = doc.document_date.map(|d| d.format("%d.%m.%Y").to_string()).unwrap_or_default();
            let typ = if doc.kind == DocumentKind::Invoice { "FZ".to_string() } else { format!("{:?}", doc.kind) };
            let vat_rate = if doc.amount_net.map(|n| n > Decimal::ZERO).unwrap_or(false) && doc.amount_vat.is_some() {
                format!("{}%", vat_rate_percent(doc))
            } else {
                "23%".to_string()
            };

            writer
                .write_record([
                    (idx + 1).to_string(),
                    typ,
                    doc.number.clone().unwrap_or_default(),
                    doc_date.clone(),
                    doc_date,
                    doc.contractor_name.clone().unwrap_or_default(),
                    doc.contractor_tax_id.clone().unwrap_or_default(),
                    comma_decimal(amount_2dp(doc.amount_net)),
                    comma_decimal(amount_2dp(doc.amount_vat)),
                    comma_decimal(amount_2dp(doc.amount_gross)),
                    vat_rate,
                    doc.currency.clone(),
                    doc.category.clone().unwrap_or_default(),
                    doc.description.clone().unwrap_or_default(),
                ])
                .map_err(|e| FlowError::adapter_parse(idx + 1, e.to_string()))?;
        }

        let bytes = writer.into_inner().map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;
        let content = String::from_utf8(bytes).map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;
        let filename = format!("symfonia_import_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"));

        Ok(ExportResult {
            content,
            filename,
            format: OutputFormat::Csv,
            docs_exported: documents.len() as u32,
            encoding: "CP1250".to_string(),
        })
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok("Eksport Symfonia generuje plik CSV (CP1250) do importu — nie wymaga połączenia.")
    }

    fn tag(&self) -> &'static str {
        "symfonia"
    }
}
