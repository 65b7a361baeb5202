// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::models::JobStatus;
use crate::pipeline::Pipeline;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let chunk_size = *m.get_one::<usize>("chunk-size").unwrap();
    let pipeline = Pipeline::new(chunk_size);

    let run = if let Some(run_id) = m.get_one::<i64>("resume") {
        pipeline.resume(conn, *run_id)?
    } else {
        let path = m.get_one::<String>("file").unwrap().trim();
        pipeline.run(conn, Path::new(path))?
    };

    match run.status {
        JobStatus::Completed => {
            println!(
                "Run {} completed: {} chunks, {} records from {}",
                run.id, run.chunks_committed, run.records_committed, run.file
            );
            Ok(())
        }
        _ => Err(anyhow!(
            "Run {} failed after {} chunks ({} records): {}",
            run.id,
            run.chunks_committed,
            run.records_committed,
            run.error.as_deref().unwrap_or("unknown error")
        )),
    }
}
