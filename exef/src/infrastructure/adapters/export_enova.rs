// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `enova` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_enova.py`: XML under
//! `http://www.enova.pl/schema/import`.

use super::export_xml::{amount_2dp, esc, vat_rate_percent};
use async_trait::async_trait;
use chrono::Utc;
use exef_domain::services::adapter_contract::{ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::OutputFormat;
use exef_domain::FlowError;

pub struct EnovaExportAdapter;

#[async_trait]
impl ExportAdapter for EnovaExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let mut entries = String::new();

        for (idx, doc) in documents.iter().enumerate() {
            let doc_date = doc.document_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

            entries.push_str(&format!(
                "    <DokumentZakupu lp=\"{}\">\n      <Numer>{}</Numer>\n      <DataWystawienia>{d}</DataWystawienia>\n      <DataWplywu>{d}</DataWplywu>\n      <Kontrahent>\n        <Nazwa>{}</Nazwa>\n        <NIP>{}</NIP>\n      </Kontrahent>\n      <Pozycje>\n        <Pozycja>\n          <Opis>{}</Opis>\n          <Netto>{}</Netto>\n          <VAT>{}</VAT>\n          <Brutto>{}</Brutto>\n          <StawkaVAT>{}%</StawkaVAT>\n        </Pozycja>\n      </Pozycje>\n      <Uwagi>{}</Uwagi>\n    </DokumentZakupu>\n",
                idx + 1,
                esc(doc.number.as_deref().unwrap_or("")),
                esc(doc.contractor_name.as_deref().unwrap_or("")),
                esc(doc.contractor_tax_id.as_deref().unwrap_or("")),
                esc(doc.category.as_deref().unwrap_or("")),
                amount_2dp(doc.amount_net),
                amount_2dp(doc.amount_vat),
                amount_2dp(doc.amount_gross),
                vat_rate_percent(doc),
                esc(doc.description.as_deref().unwrap_or("")),
                d = esc(&doc_date),
            ));
        }

        let content = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ImportDokumentow xmlns=\"http://www.enova.pl/schema/import\"\n                  wersja=\"365\"\n                  data=\"{timestamp}\"\n                  system=\"EXEF\">\n  <DokumentyZakupu>\n{entries}  </DokumentyZakupu>\n</ImportDokumentow>"
        );
        let filename = format!("enova365_import_{timestamp}.xml");

        Ok(ExportResult::utf8_bom(content, filename, OutputFormat::Xml, documents.len() as u32))
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok("Eksport enova365 generuje plik XML do importu — nie wymaga połączenia.")
    }

    fn tag(&self) -> &'static str {
        "enova"
    }
}
