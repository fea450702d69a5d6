// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `ksef` import adapter (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/import_ksef.py`. Talks
//! plain HTTP JSON to one of four environments (test/demo/prod/mock) via
//! `reqwest`, with a 15s fetch timeout and a 10s health-check timeout
//! (spec.md §5).

use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::services::adapter_contract::{config_str, AdapterConfig, ImportAdapter, ImportResult, TestConnectionResult};
use exef_domain::value_objects::tax_id::{normalize_nip, TaxId};
use exef_domain::FlowError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

fn env_base_url(environment: &str) -> &'static str {
    match environment {
        "test" => "https://ksef-test.mf.gov.pl/api",
        "demo" => "https://ksef-demo.mf.gov.pl/api",
        "prod" => "https://ksef.mf.gov.pl/api",
        _ => "http://mock-ksef:8080/api",
    }
}

#[derive(Debug, Deserialize)]
struct KsefInvoice {
    number: Option<String>,
    #[serde(rename = "invoiceNumber")]
    invoice_number: Option<String>,
    contractor_name: Option<String>,
    #[serde(rename = "issuerName")]
    issuer_name: Option<String>,
    contractor_nip: Option<String>,
    #[serde(rename = "issuerNip")]
    issuer_nip: Option<String>,
    amount_net: Option<Value>,
    #[serde(rename = "netAmount")]
    net_amount: Option<Value>,
    amount_vat: Option<Value>,
    #[serde(rename = "vatAmount")]
    vat_amount: Option<Value>,
    amount_gross: Option<Value>,
    #[serde(rename = "grossAmount")]
    gross_amount: Option<Value>,
    currency: Option<String>,
    document_date: Option<String>,
    #[serde(rename = "invoiceDate")]
    invoice_date: Option<String>,
    #[serde(rename = "ksefReferenceNumber")]
    ksef_reference_number: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KsefInvoiceList {
    Plain(Vec<KsefInvoice>),
    Wrapped { invoices: Option<Vec<KsefInvoice>>, items: Option<Vec<KsefInvoice>> },
}

fn parse_ksef_date(raw: &str) -> Option<NaiveDate> {
    let head = &raw.trim()[..raw.trim().len().min(10)];
    ["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"].iter().find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

fn clean_nip(raw: &str) -> Option<String> {
    let cleaned = normalize_nip(raw);
    cleaned.bytes().all(|b| b.is_ascii_digit()).then_some(cleaned)
}

/// KSeF's JSON amounts may arrive as either a bare number or a string;
/// `rust_decimal`'s serde impl only accepts the latter, so this walks the
/// raw [`Value`] itself rather than deserialising straight into `Decimal`.
fn value_to_decimal(value: Option<Value>) -> Option<Decimal> {
    match value? {
        Value::String(s) => Decimal::from_str(&s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

pub struct KsefImportAdapter {
    nip: Option<String>,
    token: Option<String>,
    environment: String,
    client: reqwest::Client,
}

impl KsefImportAdapter {
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            nip: config_str(config, "nip").map(str::to_string),
            token: config_str(config, "token").map(str::to_string),
            environment: config_str(config, "environment").unwrap_or("mock").to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ImportAdapter for KsefImportAdapter {
    async fn fetch(&self, period_start: Option<NaiveDate>, period_end: Option<NaiveDate>) -> Result<Vec<ImportResult>, FlowError> {
        let Some(nip) = &self.nip else {
            return Ok(Vec::new());
        };
        let base_url = env_base_url(&self.environment);
        let mut url = format!("{base_url}/invoices?nip={nip}");
        if let Some(from) = period_start {
            url.push_str(&format!("&dateFrom={from}"));
        }
        if let Some(to) = period_end {
            url.push_str(&format!("&dateTo={to}"));
        }

        let mut request = self.client.get(&url).timeout(Duration::from_secs(15)).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| FlowError::AdapterTransient(e.to_string()))?;
        let body: Value = response.json().await.map_err(|e| FlowError::AdapterTransient(e.to_string()))?;
        let list: KsefInvoiceList = serde_json::from_value(body).map_err(|e| FlowError::adapter_parse(0, e.to_string()))?;
        let invoices = match list {
            KsefInvoiceList::Plain(v) => v,
            KsefInvoiceList::Wrapped { invoices, items } => invoices.or(items).unwrap_or_default(),
        };

        Ok(invoices
            .into_iter()
            .map(|inv| {
                let reference = inv.ksef_reference_number.or(inv.id).unwrap_or_default();
                let mut result = ImportResult::new(format!("ksef-{reference}"));
                result.number = inv.number.or(inv.invoice_number);
                result.contractor_name = inv.contractor_name.or(inv.issuer_name);
                result.contractor_tax_id = inv.contractor_nip.or(inv.issuer_nip).and_then(|n| clean_nip(&n));
                result.amount_net = value_to_decimal(inv.amount_net).or_else(|| value_to_decimal(inv.net_amount));
                result.amount_vat = value_to_decimal(inv.amount_vat).or_else(|| value_to_decimal(inv.vat_amount));
                result.amount_gross = value_to_decimal(inv.amount_gross).or_else(|| value_to_decimal(inv.gross_amount));
                result.currency = Some(inv.currency.unwrap_or_else(|| "PLN".to_string()));
                result.document_date = inv.document_date.or(inv.invoice_date).and_then(|d| parse_ksef_date(&d));
                result
            })
            .collect())
    }

    async fn test_connection(&self) -> TestConnectionResult {
        let Some(nip) = &self.nip else {
            return TestConnectionResult::failed("Brak NIP-u.");
        };

        let validated = match TaxId::parse(nip) {
            Ok(v) => v,
            Err(_) => return TestConnectionResult::failed(format!("Nieprawidłowy format lub suma kontrolna NIP: '{nip}'.")),
        };

        let base_url = env_base_url(&self.environment);
        let response = self
            .client
            .get(format!("{base_url}/health"))
            .timeout(Duration::from_secs(10))
            .header("Accept", "application/json")
            .send()
            .await;

        match response {
            Ok(resp) => TestConnectionResult::ok(format!(
                "NIP {validated} prawidłowy. Serwer KSeF ({}) odpowiada (HTTP {}).",
                self.environment,
                resp.status().as_u16()
            )),
            Err(e) => TestConnectionResult::failed(format!(
                "NIP {validated} prawidłowy, ale serwer KSeF ({}) niedostępny: {e}.",
                self.environment
            )),
        }
    }

    fn tag(&self) -> &'static str {
        "ksef"
    }
}
