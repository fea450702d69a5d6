// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Everything that knows about SQLite, HTTP, CSV/XML, or the filesystem.
//! The domain crate and `application` use cases see only the trait ports
//! these modules implement.

pub mod adapters;
pub mod config;
pub mod db;
pub mod logging;
pub mod migration;
pub mod repositories;
pub mod storage_router;
