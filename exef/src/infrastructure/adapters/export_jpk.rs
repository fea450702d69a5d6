// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `jpk_pkpir` export adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/export_jpk.py`: JPK_PKPIR(3)
//! XML under namespace `http://jpk.mf.gov.pl/wzor/2022/02/17/02171/`.

use super::export_xml::{amount_2dp, esc};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use exef_domain::services::adapter_contract::{config_str, AdapterConfig, ExportAdapter, ExportResult, ExportableDocument, TestConnectionResult};
use exef_domain::value_objects::enums::OutputFormat;
use exef_domain::FlowError;
use rust_decimal::Decimal;

pub struct JpkPkpirExportAdapter {
    nip: Option<String>,
    company_name: Option<String>,
}

impl JpkPkpirExportAdapter {
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            nip: config_str(config, "nip").map(str::to_string),
            company_name: config_str(config, "company_name").map(str::to_string),
        }
    }
}

#[async_trait]
impl ExportAdapter for JpkPkpirExportAdapter {
    async fn export(&self, documents: &[ExportableDocument], _task_name: &str) -> Result<ExportResult, FlowError> {
        let nip = self.nip.as_deref().unwrap_or("0000000000");
        let company_name = self.company_name.as_deref().unwrap_or("Firma");
        let today = Utc::now().date_naive();

        let dates: Vec<NaiveDate> = documents.iter().filter_map(|d| d.document_date).collect();
        let date_from = dates.iter().min().copied().unwrap_or(today.with_day0(0).unwrap_or(today));
        let date_to = dates.iter().max().copied().unwrap_or(today);

        let mut total_net = Decimal::ZERO;
        let mut total_vat = Decimal::ZERO;
        let mut total_gross = Decimal::ZERO;
        let mut rows = String::new();

        for (idx, doc) in documents.iter().enumerate() {
            let net = amount_2dp(doc.amount_net);
            let vat = amount_2dp(doc.amount_vat);
            let gross = amount_2dp(doc.amount_gross);
            total_net += net;
            total_vat += vat;
            total_gross += gross;

            let category = doc.category.clone().unwrap_or_default();
            let kolumna = if ["towar", "materiał", "material", "zakup"].iter().any(|k| category.to_lowercase().contains(k)) {
                "10"
            } else {
                "13"
            };
            let doc_date_str = doc.document_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

            rows.push_str(&format!(
                "      <PKPIRWiersz>\n        <K_1>{}</K_1>\n        <K_2>{}</K_2>\n        <K_3>{}</K_3>\n        <K_4>{}</K_4>\n        <K_5>{}</K_5>\n        <K_6>{}</K_6>\n        <K_{}>{net}</K_{}>\n        <K_14>{vat}</K_14>\n        <K_15>{gross}</K_15>\n        <K_16>{}</K_16>\n      </PKPIRWiersz>\n",
                idx + 1,
                esc(&doc_date_str),
                esc(doc.number.as_deref().unwrap_or("")),
                esc(doc.contractor_name.as_deref().unwrap_or("")),
                esc(doc.contractor_tax_id.as_deref().unwrap_or("")),
                esc(&category),
                kolumna,
                kolumna,
                esc(doc.description.as_deref().unwrap_or("")),
            ));
        }

        let content = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<JPK xmlns=\"http://jpk.mf.gov.pl/wzor/2022/02/17/02171/\"\n     xmlns:etd=\"http://crd.gov.pl/xml/schematy/dziedzinowe/mf/2022/01/05/eD/DefinicjeTypy/\">\n  <Naglowek>\n    <KodFormularza kodSystemowy=\"JPK_PKPIR (3)\" wersjaSchemy=\"3-0\">JPK_PKPIR</KodFormularza>\n    <WariantFormularza>3</WariantFormularza>\n    <CelZlozenia>1</CelZlozenia>\n    <DataWytworzeniaJPK>{}Z</DataWytworzeniaJPK>\n    <DataOd>{}</DataOd>\n    <DataDo>{}</DataDo>\n    <NazwaSystemu>EXEF</NazwaSystemu>\n  </Naglowek>\n  <Podmiot1>\n    <etd:NIP>{}</etd:NIP>\n    <etd:PelnaNazwa>{}</etd:PelnaNazwa>\n  </Podmiot1>\n  <PKPIRInfo>\n    <LiczbaWierszy>{}</LiczbaWierszy>\n    <SumaKol13>{total_net}</SumaKol13>\n    <SumaKol14>{total_vat}</SumaKol14>\n    <SumaKol15>{total_gross}</SumaKol15>\n  </PKPIRInfo>\n  <PKPIRWiersze>\n{rows}  </PKPIRWiersze>\n</JPK>",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.f"),
            date_from.format("%Y-%m-%d"),
            date_to.format("%Y-%m-%d"),
            esc(nip),
            esc(company_name),
            documents.len(),
        );

        let filename = format!("JPK_PKPIR_{}_{}.xml", date_from.format("%Y%m%d"), date_to.format("%Y%m%d"));

        Ok(ExportResult::utf8_bom(content, filename, OutputFormat::Xml, documents.len() as u32))
    }

    async fn test_connection(&self) -> TestConnectionResult {
        let Some(nip) = &self.nip else {
            return TestConnectionResult::failed("Brak NIP firmy — wymagany do generowania JPK.");
        };
        let Some(company) = &self.company_name else {
            return TestConnectionResult::failed("Brak nazwy firmy — wymagana do generowania JPK.");
        };
        TestConnectionResult::ok(format!("Konfiguracja JPK_PKPIR poprawna: {company} (NIP: {nip})."))
    }

    fn tag(&self) -> &'static str {
        "jpk_pkpir"
    }
}
