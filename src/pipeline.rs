// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use rusqlite::{Connection, params};

use crate::cnab::Decoder;
use crate::models::{JobRun, JobStatus, Transaction};
use crate::transform::transform;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Drives one CNAB file through decode -> transform -> chunked persistence.
///
/// Each chunk is written inside a single storage transaction together with
/// the job-progress update, so a chunk and its progress advance are atomic:
/// either both are durable or neither is. Any failure rolls back the
/// in-flight chunk, records the error on the run, and stops; committed
/// chunks stay intact. The loop is sequential per run, which bounds memory
/// to one chunk and means the next chunk only starts filling after the
/// prior commit outcome is known.
pub struct Pipeline {
    chunk_size: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Pipeline {
    pub fn new(chunk_size: usize) -> Self {
        Pipeline {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Starts a fresh run over `path` and executes it to completion or
    /// failure. The returned `JobRun` carries the final status; a failed
    /// run is reported through `status`/`error`, not through `Err`, which
    /// is reserved for bookkeeping failures on the run row itself.
    pub fn run(&self, conn: &mut Connection, path: &Path) -> Result<JobRun> {
        let file = path.to_string_lossy().into_owned();
        conn.execute(
            "INSERT INTO job_runs(file, status, chunk_size) VALUES (?1, 'created', ?2)",
            params![file, self.chunk_size as i64],
        )?;
        let run_id = conn.last_insert_rowid();
        self.execute(conn, run_id, 0)
    }

    /// Resumes a failed run from its last committed chunk boundary. Records
    /// already committed are skipped, never re-inserted; the same file is
    /// re-read from the start, so the input must still be present.
    pub fn resume(&self, conn: &mut Connection, run_id: i64) -> Result<JobRun> {
        let run = load_run(conn, run_id)?;
        if run.status != JobStatus::Failed {
            return Err(anyhow!(
                "Run {} is {}, only failed runs can be resumed",
                run_id,
                run.status.as_str()
            ));
        }
        self.execute(conn, run_id, run.records_committed as u64)
    }

    fn execute(&self, conn: &mut Connection, run_id: i64, skip: u64) -> Result<JobRun> {
        conn.execute(
            "UPDATE job_runs SET status='running', error=NULL, finished_at=NULL WHERE id=?1",
            params![run_id],
        )?;
        let mut run = load_run(conn, run_id)?;

        let input = match File::open(&run.file)
            .with_context(|| format!("Open CNAB file {}", run.file))
        {
            Ok(f) => f,
            Err(e) => return self.fail(conn, run, e),
        };
        let mut records = Decoder::new(BufReader::new(input));

        // Skip records belonging to already-committed chunks. They decoded
        // cleanly when they were committed; if the file changed underneath
        // the run, re-decoding catches it here.
        for _ in 0..skip {
            match records.next() {
                Some(Ok(_)) => {}
                Some(Err(e)) => return self.fail(conn, run, e.into()),
                None => {
                    return self.fail(
                        conn,
                        run,
                        anyhow!("input ended before the committed record count ({})", skip),
                    );
                }
            }
        }

        loop {
            let mut chunk: Vec<Transaction> = Vec::with_capacity(self.chunk_size);
            while chunk.len() < self.chunk_size {
                match records.next() {
                    Some(Ok(raw)) => match transform(&raw) {
                        Ok(tx) => chunk.push(tx),
                        Err(e) => return self.fail(conn, run, e.into()),
                    },
                    Some(Err(e)) => return self.fail(conn, run, e.into()),
                    None => break,
                }
            }
            if chunk.is_empty() {
                break;
            }

            if let Err(e) = persist_chunk(conn, run_id, &chunk) {
                return self.fail(conn, run, e);
            }
            run.chunks_committed += 1;
            run.records_committed += chunk.len() as i64;
            debug!(
                "run {}: committed chunk {} ({} records)",
                run_id,
                run.chunks_committed,
                chunk.len()
            );

            if chunk.len() < self.chunk_size {
                break; // end of stream inside this chunk
            }
        }

        conn.execute(
            "UPDATE job_runs SET status='completed', finished_at=datetime('now') WHERE id=?1",
            params![run_id],
        )?;
        load_run(conn, run_id)
    }

    fn fail(&self, conn: &Connection, run: JobRun, err: anyhow::Error) -> Result<JobRun> {
        warn!(
            "run {} failed after {} chunks ({} records): {:#}",
            run.id, run.chunks_committed, run.records_committed, err
        );
        conn.execute(
            "UPDATE job_runs SET status='failed', error=?1, finished_at=datetime('now') WHERE id=?2",
            params![format!("{:#}", err), run.id],
        )?;
        load_run(conn, run.id)
    }
}

/// Inserts one chunk and advances the run's progress counters in a single
/// transaction. Dropping the transaction on any error rolls back every row
/// of the chunk.
fn persist_chunk(conn: &mut Connection, run_id: i64, chunk: &[Transaction]) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO transactions(type, date, amount, cpf, card, hour, shop_owner, shop_name) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        )?;
        for t in chunk {
            stmt.execute(params![
                t.kind as i64,
                t.date.to_string(),
                t.amount.to_string(),
                t.cpf,
                t.card,
                t.time.to_string(),
                t.shop_owner,
                t.shop_name,
            ])?;
        }
    }
    tx.execute(
        "UPDATE job_runs SET chunks_committed=chunks_committed+1, \
         records_committed=records_committed+?1 WHERE id=?2",
        params![chunk.len() as i64, run_id],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn load_run(conn: &Connection, id: i64) -> Result<JobRun> {
    conn.query_row(
        "SELECT id, file, status, chunk_size, chunks_committed, records_committed, \
         error, started_at, finished_at FROM job_runs WHERE id=?1",
        params![id],
        row_to_run,
    )
    .with_context(|| format!("Run {} not found", id))
}

pub fn list_runs(conn: &Connection, limit: Option<usize>) -> Result<Vec<JobRun>> {
    let mut sql = String::from(
        "SELECT id, file, status, chunk_size, chunks_committed, records_committed, \
         error, started_at, finished_at FROM job_runs ORDER BY id DESC",
    );
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {}", n));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_run)?;
    let mut runs = Vec::new();
    for r in rows {
        runs.push(r?);
    }
    Ok(runs)
}

fn row_to_run(r: &rusqlite::Row) -> rusqlite::Result<JobRun> {
    let status_raw: String = r.get(2)?;
    let status = JobStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown run status '{}'", status_raw).into(),
        )
    })?;
    Ok(JobRun {
        id: r.get(0)?,
        file: r.get(1)?,
        status,
        chunk_size: r.get(3)?,
        chunks_committed: r.get(4)?,
        records_committed: r.get(5)?,
        error: r.get(6)?,
        started_at: r.get(7)?,
        finished_at: r.get(8)?,
    })
}
