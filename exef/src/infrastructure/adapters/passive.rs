// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `manual`, `upload`, and `webhook` import adapters (spec.md §4.3):
//! passive sources whose documents enter through a side channel
//! (`UploadCsvUseCase`, a future webhook handler) rather than through
//! `fetch`. All three share one implementation; only the tag differs.

use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::services::adapter_contract::{AdapterConfig, ImportAdapter, ImportResult, TestConnectionResult};
use exef_domain::FlowError;

pub struct PassiveImportAdapter {
    tag: &'static str,
}

impl PassiveImportAdapter {
    pub fn new(tag: &'static str, _config: &AdapterConfig) -> Self {
        Self { tag }
    }
}

#[async_trait]
impl ImportAdapter for PassiveImportAdapter {
    async fn fetch(&self, _period_start: Option<NaiveDate>, _period_end: Option<NaiveDate>) -> Result<Vec<ImportResult>, FlowError> {
        Ok(Vec::new())
    }

    async fn test_connection(&self) -> TestConnectionResult {
        TestConnectionResult::ok(format!("{} source accepts documents via a side channel, not fetch", self.tag))
    }

    fn tag(&self) -> &'static str {
        self.tag
    }
}
