//! # Document Identity Service
//!
//! Computes the deterministic, content-derived identifier used to detect
//! duplicate documents across import runs and sources (spec.md §4.1). Two
//! documents describing the same invoice — even imported from different
//! banks, emails, or OCR passes — resolve to the same identifier because the
//! identifier is a hash of their normalised business fields, not of their
//! storage location or arrival order.
//!
//! ## Architecture
//!
//! - **Service Interface**: [`DocumentIdentityService`] defines the contract
//! - **Implementation**: [`Sha256DocumentIdentity`] provides the concrete
//!   SHA-256-based algorithm
//! - **Normalisation**: pure functions in
//!   [`crate::value_objects::document_identity`] do the field-level cleanup

use crate::value_objects::document_identity::generate_doc_id;
use crate::value_objects::enums::DocumentKind;

/// The four business fields a document identifier is derived from. Any
/// subset may be absent; the insufficiency rule requires at least two to be
/// present and non-trivial after normalisation.
#[derive(Debug, Clone, Default)]
pub struct DocumentIdentityInput<'a> {
    pub contractor_nip: Option<&'a str>,
    pub number: Option<&'a str>,
    pub document_date: Option<&'a str>,
    pub amount_gross: Option<&'a str>,
}

/// Computes document identifiers from raw, unnormalised business fields.
///
/// Implementations must be deterministic: the same input, in any field
/// order, always yields the same identifier (or the same `None`).
pub trait DocumentIdentityService: Send + Sync {
    /// Returns `None` when fewer than two of the four input fields are
    /// meaningful after normalisation — there isn't enough signal to treat
    /// the result as a stable identity.
    fn compute(&self, input: &DocumentIdentityInput<'_>, kind: DocumentKind) -> Option<String>;
}

/// SHA-256 over the pipe-joined normalised fields, truncated to the first
/// eight bytes (sixteen hex characters) and prefixed with the document
/// kind's identity code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256DocumentIdentity;

impl Sha256DocumentIdentity {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentIdentityService for Sha256DocumentIdentity {
    fn compute(&self, input: &DocumentIdentityInput<'_>, kind: DocumentKind) -> Option<String> {
        generate_doc_id(
            input.contractor_nip,
            input.number,
            input.document_date,
            input.amount_gross,
            kind,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_stable_id_for_sufficient_input() {
        let svc = Sha256DocumentIdentity::new();
        let input = DocumentIdentityInput {
            contractor_nip: Some("5213003700"),
            number: Some("FV/001/2026"),
            document_date: Some("2026-03-05"),
            amount_gross: Some("1500.00"),
        };
        let id = svc.compute(&input, DocumentKind::Invoice);
        assert!(id.is_some());
        assert!(id.unwrap().starts_with("DOC-FV-"));
    }

    #[test]
    fn returns_none_for_insufficient_input() {
        let svc = Sha256DocumentIdentity::new();
        let input = DocumentIdentityInput {
            contractor_nip: Some("5213003700"),
            ..Default::default()
        };
        assert_eq!(svc.compute(&input, DocumentKind::Invoice), None);
    }

    #[test]
    fn different_kinds_yield_different_prefixes() {
        let svc = Sha256DocumentIdentity::new();
        let input = DocumentIdentityInput {
            number: Some("KOR/1"),
            document_date: Some("2026-01-01"),
            ..Default::default()
        };
        let invoice_id = svc.compute(&input, DocumentKind::Invoice).unwrap();
        let correction_id = svc.compute(&input, DocumentKind::Correction).unwrap();
        assert!(invoice_id.starts_with("DOC-FV-"));
        assert!(correction_id.starts_with("DOC-KOR-"));
    }
}
