//! Domain enumerations. One enum per concept, serialised to its string form —
//! replacing the mixture of raw strings and `.value` accesses the source
//! system uses throughout (spec.md §9 DESIGN NOTES).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    SoleProprietorship,
    Marriage,
    Company,
    Organisation,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Accountant,
    Assistant,
    Viewer,
}

impl MemberRole {
    /// Whether this role alone (without extra capability flags) is allowed
    /// to describe/approve documents — per spec.md §4.5, describe/approve
    /// require at least `accountant`.
    pub fn at_least_accountant(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Accountant)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Bookkeeping,
    Jpk,
    SocialInsurance,
    EuVat,
    ClientProject,
    RAndD,
    Kpir,
    PaymentsIn,
    PaymentProofs,
    Shipping,
    Recruitment,
    Contracts,
    Other,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRecurrence {
    Monthly,
    Quarterly,
    Yearly,
    Once,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Exported,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[serde(rename = "invoice")]
    Invoice,
    Cv,
    Receipt,
    Contract,
    PaymentIn,
    PaymentOut,
    Correction,
    Proforma,
    Other,
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Invoice
    }
}

impl DocumentKind {
    /// The three-letter code used by the deterministic document identifier.
    pub fn identity_code(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FV",
            DocumentKind::Receipt => "PAR",
            DocumentKind::Contract => "UMO",
            DocumentKind::Correction => "KOR",
            DocumentKind::Proforma => "PRO",
            DocumentKind::Cv | DocumentKind::PaymentIn | DocumentKind::PaymentOut | DocumentKind::Other => "DOC",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    New,
    Described,
    Approved,
    Exported,
}

impl DocumentStatus {
    /// Numeric rank used to enforce the monotone status progression
    /// invariant (skipping forward allowed, skipping backward is not).
    pub fn rank(&self) -> u8 {
        match self {
            DocumentStatus::New => 0,
            DocumentStatus::Described => 1,
            DocumentStatus::Approved => 2,
            DocumentStatus::Exported => 3,
        }
    }

    pub fn can_advance_to(&self, target: DocumentStatus) -> bool {
        target.rank() >= self.rank()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Payment,
    Correction,
    ContractToInvoice,
    Attachment,
    Duplicate,
    Related,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDirection {
    Import,
    Export,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Error,
    Partial,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Xml,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    LocalToRemote,
    RemoteToLocal,
    Bidirectional,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    Shared,
    PerEntity,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Task,
    Document,
    Source,
}
