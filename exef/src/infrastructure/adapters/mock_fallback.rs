// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Development-only fallback for a `source_type` tag with no registered
//! adapter (spec.md §4.3 "Fallback", §4.4 import step 2). Emits a small
//! deterministic sample rather than failing the run outright. Only ever
//! constructed behind the `mock-fallback` feature, so a release build
//! built without it cannot reach this path — "must be absent or disabled
//! in production builds" is enforced at compile time, not by convention.

use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::services::adapter_contract::{ImportAdapter, ImportResult, TestConnectionResult};
use exef_domain::value_objects::enums::DocumentKind;
use exef_domain::FlowError;
use rust_decimal_macros::dec;

pub struct MockFallbackImportAdapter {
    unknown_tag: String,
}

impl MockFallbackImportAdapter {
    pub fn new(unknown_tag: impl Into<String>) -> Self {
        Self { unknown_tag: unknown_tag.into() }
    }
}

#[async_trait]
impl ImportAdapter for MockFallbackImportAdapter {
    async fn fetch(&self, period_start: Option<NaiveDate>, _period_end: Option<NaiveDate>) -> Result<Vec<ImportResult>, FlowError> {
        let document_date = period_start.unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid fallback date"));
        let mut sample = ImportResult::new(format!("mock-fallback-{}-1", self.unknown_tag));
        sample.kind = Some(DocumentKind::Invoice);
        sample.number = Some("MOCK/FALLBACK/1".to_string());
        sample.contractor_name = Some("Kontrahent testowy".to_string());
        sample.amount_gross = Some(dec!(123.45));
        sample.currency = Some("PLN".to_string());
        sample.document_date = Some(document_date);
        Ok(vec![sample])
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok(format!("mock fallback generator standing in for unregistered tag '{}'", self.unknown_tag))
    }

    fn tag(&self) -> &'static str {
        "mock_fallback"
    }
}
