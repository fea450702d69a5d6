//! # Document Entity
//!
//! A canonicalised document record — the single shape every import adapter
//! produces and every export adapter consumes (spec.md §4.1). Source fields
//! are treated as read-only once created; the document is otherwise mutated
//! only through its [`super::document_metadata::DocumentMetadata`] side-car,
//! status advancement, or relation creation.

use crate::value_objects::enums::{DocumentKind, DocumentStatus};
use crate::value_objects::ids::{DocumentId, TaskId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    task: TaskId,
    kind: DocumentKind,
    number: Option<String>,
    contractor_name: Option<String>,
    contractor_tax_id: Option<String>,
    amount_net: Option<Decimal>,
    amount_vat: Option<Decimal>,
    amount_gross: Option<Decimal>,
    currency: String,
    document_date: Option<NaiveDate>,
    source_kind: String,
    source_record_id: String,
    original_filename: Option<String>,
    file_path: Option<String>,
    doc_id: Option<String>,
    status: DocumentStatus,
}

impl Document {
    pub fn new(task: TaskId, source_kind: impl Into<String>, source_record_id: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            task,
            kind: DocumentKind::default(),
            number: None,
            contractor_name: None,
            contractor_tax_id: None,
            amount_net: None,
            amount_vat: None,
            amount_gross: None,
            currency: "PLN".to_string(),
            document_date: None,
            source_kind: source_kind.into(),
            source_record_id: source_record_id.into(),
            original_filename: None,
            file_path: None,
            doc_id: None,
            status: DocumentStatus::New,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn task(&self) -> &TaskId {
        &self.task
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    pub fn set_doc_id(&mut self, doc_id: Option<String>) {
        self.doc_id = doc_id;
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn contractor_tax_id(&self) -> Option<&str> {
        self.contractor_tax_id.as_deref()
    }

    pub fn amount_gross(&self) -> Option<Decimal> {
        self.amount_gross
    }

    pub fn document_date(&self) -> Option<NaiveDate> {
        self.document_date
    }

    pub fn set_original_filename(&mut self, filename: Option<String>) {
        if let Some(name) = filename {
            self.file_path = Some(name.clone());
            self.original_filename = Some(name);
        }
    }

    pub fn original_filename(&self) -> Option<&str> {
        self.original_filename.as_deref()
    }

    pub fn source_kind(&self) -> &str {
        &self.source_kind
    }

    pub fn source_record_id(&self) -> &str {
        &self.source_record_id
    }

    pub fn contractor_name(&self) -> Option<&str> {
        self.contractor_name.as_deref()
    }

    pub fn amount_net(&self) -> Option<Decimal> {
        self.amount_net
    }

    pub fn amount_vat(&self) -> Option<Decimal> {
        self.amount_vat
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Copies the subset of canonical fields an import adapter produced
    /// (spec.md §4.4 import algorithm step 4) onto a freshly created
    /// document. Fields the adapter left `None` keep their defaults.
    pub fn apply_import_fields(
        &mut self,
        kind: Option<DocumentKind>,
        number: Option<String>,
        contractor_name: Option<String>,
        contractor_tax_id: Option<String>,
        amount_net: Option<Decimal>,
        amount_vat: Option<Decimal>,
        amount_gross: Option<Decimal>,
        currency: Option<String>,
        document_date: Option<NaiveDate>,
    ) {
        if let Some(k) = kind {
            self.kind = k;
        }
        if number.is_some() {
            self.number = number;
        }
        if contractor_name.is_some() {
            self.contractor_name = contractor_name;
        }
        if contractor_tax_id.is_some() {
            self.contractor_tax_id = contractor_tax_id;
        }
        if amount_net.is_some() {
            self.amount_net = amount_net;
        }
        if amount_vat.is_some() {
            self.amount_vat = amount_vat;
        }
        if amount_gross.is_some() {
            self.amount_gross = amount_gross;
        }
        if let Some(c) = currency {
            self.currency = c;
        }
        if document_date.is_some() {
            self.document_date = document_date;
        }
    }

    /// Advances status, enforcing the monotone progression invariant
    /// (spec.md §3): forward jumps are allowed, backward moves are not.
    pub fn advance_status(&mut self, target: DocumentStatus) -> Result<(), crate::error::FlowError> {
        if !self.status.can_advance_to(target) {
            return Err(crate::error::FlowError::validation(format!(
                "cannot move document from {:?} back to {:?}",
                self.status, target
            )));
        }
        self.status = target;
        Ok(())
    }

    /// Reconstructs a document from persisted storage (repository use only).
    /// Bypasses `advance_status`'s monotone-progression check since a row
    /// already committed to storage was valid when it was written.
    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: DocumentId,
        task: TaskId,
        kind: DocumentKind,
        number: Option<String>,
        contractor_name: Option<String>,
        contractor_tax_id: Option<String>,
        amount_net: Option<Decimal>,
        amount_vat: Option<Decimal>,
        amount_gross: Option<Decimal>,
        currency: String,
        document_date: Option<NaiveDate>,
        source_kind: String,
        source_record_id: String,
        original_filename: Option<String>,
        file_path: Option<String>,
        doc_id: Option<String>,
        status: DocumentStatus,
    ) -> Self {
        Self {
            id,
            task,
            kind,
            number,
            contractor_name,
            contractor_tax_id,
            amount_net,
            amount_vat,
            amount_gross,
            currency,
            document_date,
            source_kind,
            source_record_id,
            original_filename,
            file_path,
            doc_id,
            status,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}
