// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Use cases orchestrating the flow engine (spec.md §4.4, §4.5). Each use
//! case resolves its resources' storage pool through the shared
//! [`crate::infrastructure::storage_router::StorageRouter`], then runs
//! against fresh per-pool sqlx repositories scoped to that invocation.

mod describe_approve_use_case;
mod export_use_case;
mod import_use_case;
mod project_from_template_use_case;
mod upload_csv_use_case;

pub use describe_approve_use_case::{ApproveDocumentUseCase, DescribeDocumentUseCase, DuplicatesUseCase};
pub use export_use_case::{ExportOutcome, ExportUseCase};
pub use import_use_case::ImportUseCase;
pub use project_from_template_use_case::ProjectFromTemplateUseCase;
pub use upload_csv_use_case::{UploadCsvResult, UploadCsvUseCase};
