// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised while decoding, transforming, or persisting CNAB records.
///
/// Decode and transform errors are deterministic for a given input, so they
/// are surfaced immediately and never retried. Persistence errors abort the
/// in-flight chunk after rollback.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error reading CNAB input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Decode { line: u64, reason: String },

    #[error("unknown transaction type code {0}")]
    UnknownTransactionType(u8),

    #[error("invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HHMMSS")]
    InvalidTime(String),

    #[error("storage error: {0}")]
    Persistence(#[from] rusqlite::Error),
}
