// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! XML-escaping and VAT-rate helpers shared by the `jpk_pkpir`, `comarch`,
//! and `enova` export adapters.

use exef_domain::services::adapter_contract::ExportableDocument;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn esc(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `round(vat / net * 100)`, defaulting to 23 when net or vat is zero or
/// unknown (spec.md §4.3, matched across `comarch`/`enova`/`jpk_pkpir`).
pub fn vat_rate_percent(doc: &ExportableDocument) -> Decimal {
    match (doc.amount_net, doc.amount_vat) {
        (Some(net), Some(vat)) if net > Decimal::ZERO => (vat / net * dec!(100)).round(),
        _ => dec!(23),
    }
}

pub fn amount_2dp(amount: Option<Decimal>) -> Decimal {
    amount.unwrap_or(Decimal::ZERO).round_dp(2)
}
