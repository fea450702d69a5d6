// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # exef
//!
//! Infrastructure and application layer for the document-flow engine whose
//! pure domain model lives in `exef_domain`. This crate wires that domain
//! to SQLite (via the storage router), to external systems (the adapter
//! registry), and to the CLI surface defined by `exef-bootstrap`.
//!
//! `application` holds one use case per flow-engine operation,
//! `infrastructure` holds everything that knows about SQLite/HTTP/CSV/XML,
//! and `presentation` holds the boundary DTOs a future HTTP layer (or a
//! test) would drive the application through.

pub mod application;
pub mod infrastructure;
pub mod presentation;
