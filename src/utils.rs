// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::error::IngestError;

/// Parses the 8-digit CNAB date field (YYYYMMDD).
pub fn parse_cnab_date(s: &str) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| IngestError::InvalidDate(s.to_string()))
}

/// Parses the 6-digit CNAB time field (HHMMSS).
pub fn parse_cnab_time(s: &str) -> Result<NaiveTime, IngestError> {
    NaiveTime::parse_from_str(s, "%H%M%S").map_err(|_| IngestError::InvalidTime(s.to_string()))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
