// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Runs stuck in a non-terminal state (crashed mid-run)
    let mut stmt = conn.prepare(
        "SELECT id, status, file FROM job_runs WHERE status IN ('created','running') ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let status: String = r.get(1)?;
        let file: String = r.get(2)?;
        rows.push(vec![
            "stale_run".into(),
            format!("run {} left {} for {}", id, status, file),
        ]);
    }

    // 2) Failed runs that can be resumed from their committed boundary
    let mut stmt2 = conn.prepare(
        "SELECT id, records_committed, error FROM job_runs WHERE status='failed' ORDER BY id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let committed: i64 = r.get(1)?;
        let error: Option<String> = r.get(2)?;
        rows.push(vec![
            "resumable_run".into(),
            format!(
                "run {} ({} records committed, `ingest --resume {}`): {}",
                id,
                committed,
                id,
                error.unwrap_or_default()
            ),
        ]);
    }

    // 3) Progress counters vs. actual table contents
    let committed: i64 = conn.query_row(
        "SELECT COALESCE(SUM(records_committed),0) FROM job_runs",
        [],
        |r| r.get(0),
    )?;
    let stored: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
    if committed != stored {
        rows.push(vec![
            "record_count_drift".into(),
            format!("job_runs say {} committed, transactions holds {}", committed, stored),
        ]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
