// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `wfirma` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_wfirma.py`: CSV,
//! semicolon delimiter, 14 columns.

use super::export_xml::{amount_2dp, vat_rate_percent};
use async_trait::async_trait;
use exef_domain::services::adapter_contract::{ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::{DocumentKind, OutputFormat};
use exef_domain::FlowError;
use rust_decimal::Decimal;

fn map_doc_kind(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Invoice | DocumentKind::Proforma => "Faktura VAT",
        DocumentKind::Correction => "Faktura korygująca",
        DocumentKind::Receipt => "Paragon",
        DocumentKind::Contract => "Umowa",
        DocumentKind::PaymentIn => "Wpłata",
        DocumentKind::PaymentOut => "Wypłata",
        DocumentKind::Cv | DocumentKind::Other => "Faktura VAT",
    }
}

pub struct WfirmaExportAdapter;

#[async_trait]
impl ExportAdapter for WfirmaExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(Vec::new());
        writer
            .write_record([
                "Lp",
                "Typ dokumentu",
                "Numer dokumentu",
                "Data wystawienia",
                "Data sprzedaży",
                "Kontrahent",
                "NIP kontrahenta",
                "Netto",
                "Stawka VAT",
                "VAT",
                "Brutto",
                "Waluta",
                "Kategoria księgowa",
                "Opis",
            ])
            .map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;

        for (idx, doc) in documents.iter().enumerate() {
            let doc_date = doc.document_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
            let vat_rate = if doc.amount_net.map(|n| n > Decimal::ZERO).unwrap_or(false) && doc.amount_vat.is_some() {
                format!("{}%", vat_rate_percent(doc))
            } else {
                String::new()
            };

            writer
                .write_record([
                    (idx + 1).to_string(),
                    map_doc_kind(doc.kind).to_string(),
                    doc.number.clone().unwrap_or_default(),
                    doc_date.clone(),
                    doc_date,
                    doc.contractor_name.clone().unwrap_or_default(),
                    doc.contractor_tax_id.clone().unwrap_or_default(),
                    amount_2dp(doc.amount_net).to_string(),
                    vat_rate,
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
        let filename = format!("wfirma_import_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"));

        Ok(ExportResult::utf8_bom(content, filename, OutputFormat::Csv, documents.len() as u32))
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok("Eksport wFirma generuje plik CSV do pobrania — nie wymaga połączenia.")
    }

    fn tag(&self) -> &'static str {
        "wfirma"
    }
}
