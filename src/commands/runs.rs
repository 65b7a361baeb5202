// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::JobRun;
use crate::pipeline::{list_runs, load_run};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub),
        Some(("show", sub)) => show(conn, sub),
        _ => Ok(()),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = sub.get_one::<usize>("limit").copied();
    let data = list_runs(conn, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", runs_table(&data));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let run_id = *sub.get_one::<i64>("run").unwrap();
    let run = load_run(conn, run_id)?;
    println!("{}", runs_table(std::slice::from_ref(&run)));
    Ok(())
}

fn runs_table(data: &[JobRun]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.file.clone(),
                r.status.as_str().to_string(),
                r.chunks_committed.to_string(),
                r.records_committed.to_string(),
                r.started_at.clone(),
                r.finished_at.clone().unwrap_or_default(),
                r.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Run", "File", "Status", "Chunks", "Records", "Started", "Finished", "Error",
        ],
        rows,
    )
}
