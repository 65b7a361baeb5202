// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One CNAB line as sliced by the fixed-width layout, before any domain
/// interpretation. Numeric text fields keep their zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub type_code: u8,
    pub date: String,
    pub amount_cents: u64,
    pub cpf: String,
    pub card: String,
    pub time: String,
    pub shop_owner: String,
    pub shop_name: String,
}

/// Static metadata for one CNAB transaction type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionKind {
    pub code: u8,
    pub description: &'static str,
    pub sign: i8,
}

/// The fixed type table. Codes outside 1-9 have no entry and must be
/// rejected, never defaulted.
pub const KINDS: [TransactionKind; 9] = [
    TransactionKind { code: 1, description: "debit", sign: 1 },
    TransactionKind { code: 2, description: "boleto", sign: -1 },
    TransactionKind { code: 3, description: "financing", sign: -1 },
    TransactionKind { code: 4, description: "credit", sign: 1 },
    TransactionKind { code: 5, description: "loan receipt", sign: 1 },
    TransactionKind { code: 6, description: "sales", sign: 1 },
    TransactionKind { code: 7, description: "ted receipt", sign: 1 },
    TransactionKind { code: 8, description: "doc receipt", sign: 1 },
    TransactionKind { code: 9, description: "rent", sign: -1 },
];

impl TransactionKind {
    pub fn from_code(code: u8) -> Option<&'static TransactionKind> {
        KINDS.iter().find(|k| k.code == code)
    }
}

/// A transaction ready for persistence. `amount` is already scaled to
/// currency units and signed according to the type table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<i64>,
    pub kind: u8,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub cpf: String,
    pub card: String,
    pub time: NaiveTime,
    pub shop_owner: String,
    pub shop_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Created,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<JobStatus> {
        match s {
            "created" => Some(JobStatus::Created),
            "running" => Some(JobStatus::Running),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// One execution of the pipeline over one input file. The row id doubles as
/// the run id, so identities increment automatically per run.
#[derive(Debug, Clone, Serialize)]
pub struct JobRun {
    pub id: i64,
    pub file: String,
    pub status: JobStatus,
    pub chunk_size: i64,
    pub chunks_committed: i64,
    pub records_committed: i64,
    pub error: Option<String>,
    pub started_at: String,
    pub finished_at: Option<String>,
}
