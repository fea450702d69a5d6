// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `comarch` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_comarch.py`: XML
//! under `http://www.comarch.pl/cdn/optima/offline`.

use super::export_xml::{amount_2dp, esc, vat_rate_percent};
use async_trait::async_trait;
use chrono::Utc;
use exef_domain::services::adapter_contract::{ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::OutputFormat;
use exef_domain::FlowError;

pub struct ComarchExportAdapter;

#[async_trait]
impl ExportAdapter for ComarchExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let mut entries = String::new();

        for doc in documents {
            let doc_date = doc.document_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
            let vat_rate = vat_rate_percent(doc);
            let nip_or_name = doc.contractor_tax_id.as_deref().or(doc.contractor_name.as_deref()).unwrap_or("");

            entries.push_str(&format!(
                "    <REJESTR_ZAKUPOW_VAT>\n      <MODUL>Rejestry VAT</MODUL>\n      <TYP>Zakup</TYP>\n      <REJESTR>ZAKUP</REJESTR>\n      <DATA_WYSTAWIENIA>{d}</DATA_WYSTAWIENIA>\n      <DATA_ZAKUPU>{d}</DATA_ZAKUPU>\n      <NUMER_OBCY>{num}</NUMER_OBCY>\n      <PODMIOT_TYP>Kontrahent</PODMIOT_TYP>\n      <PODMIOT_KOD>{kod}</PODMIOT_KOD>\n      <PODMIOT_NAZWA1>{nazwa}</PODMIOT_NAZWA1>\n      <PODMIOT_NIP>{nip}</PODMIOT_NIP>\n      <KATEGORIA>{kat}</KATEGORIA>\n      <OPIS>{opis}</OPIS>\n      <PLATNOSC_TYP>przelew</PLATNOSC_TYP>\n      <PLATNOSC_TERMIN>{d}</PLATNOSC_TERMIN>\n      <ELEMENTY>\n        <ELEMENT>\n          <STAWKA_VAT>{vat_rate}</STAWKA_VAT>\n          <NETTO>{net}</NETTO>\n          <VAT>{vat}</VAT>\n          <BRUTTO>{brutto}</BRUTTO>\n          <KOLUMNA_PKPIR>Inne</KOLUMNA_PKPIR>\n        </ELEMENT>\n      </ELEMENTY>\n    </REJESTR_ZAKUPOW_VAT>\n",
                d = esc(&doc_date),
                num = esc(doc.number.as_deref().unwrap_or("")),
                kod = esc(nip_or_name),
                nazwa = esc(doc.contractor_name.as_deref().unwrap_or("")),
                nip = esc(doc.contractor_tax_id.as_deref().unwrap_or("")),
                kat = esc(doc.category.as_deref().unwrap_or("")),
                opis = esc(doc.description.as_deref().unwrap_or("")),
                net = amount_2dp(doc.amount_net),
                vat = amount_2dp(doc.amount_vat),
                brutto = amount_2dp(doc.amount_gross),
            ));
        }

        let content = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<REJESTRY_ZAKUPOW_VAT xmlns=\"http://www.comarch.pl/cdn/optima/offline\"\n                       wersja=\"2.0\"\n                       generacja=\"{timestamp}\"\n                       producent=\"EXEF\">\n{entries}</REJESTRY_ZAKUPOW_VAT>"
        );
        let filename = format!("comarch_optima_import_{timestamp}.xml");

        Ok(ExportResult::utf8_bom(content, filename, OutputFormat::Xml, documents.len() as u32))
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok("Eksport Comarch Optima generuje plik XML do importu — nie wymaga połączenia.")
    }

    fn tag(&self) -> &'static str {
        "comarch"
    }
}
