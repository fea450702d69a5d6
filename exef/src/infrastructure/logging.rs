// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging
//!
//! `tracing` + `tracing-subscriber` initialisation: env-filter driven
//! verbosity, structured fields rather than interpolated strings for the
//! identifiers callers actually want to grep on (run ids, entity tax ids,
//! task ids).

use tracing_subscriber::{fmt, EnvFilter};

/// Initialises the global tracing subscriber.
///
/// `verbose` maps to the CLI's `-v` flag and raises the default filter from
/// `info` to `debug` when `RUST_LOG`/`EXEF_LOG` is unset.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_env("EXEF_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}

/// Structured fields logged at the start of every flow-engine run, so a log
/// aggregator can group a run's lines without string-parsing.
#[macro_export]
macro_rules! run_span {
    ($kind:expr, $run_id:expr, $task_id:expr) => {
        tracing::info_span!("flow_run", kind = $kind, run_id = %$run_id, task_id = %$task_id)
    };
}
