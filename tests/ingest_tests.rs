// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cnabclip::models::JobStatus;
use cnabclip::pipeline::load_run;
use cnabclip::{cli, commands::ingest, commands::transactions, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn cnab_line(code: u8, cents: u64, cpf: &str) -> String {
    format!(
        "{}{}{:010}{}{}{}{:<14}{:<18}",
        code, "20190301", cents, cpf, "4753****3153", "153453", "JOAO MACEDO", "BAR DO JOAO"
    )
}

fn run_ingest(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    if let Some(("ingest", ingest_m)) = matches.subcommand() {
        ingest::handle(conn, ingest_m)
    } else {
        panic!("no ingest subcommand");
    }
}

#[test]
fn ingest_via_cli_commits_whole_file() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("pos.txt");
    let contents = [
        cnab_line(1, 100, "11111111111"),
        cnab_line(2, 200, "22222222222"),
        cnab_line(3, 300, "33333333333"),
    ]
    .join("\n");
    std::fs::write(&path, contents).unwrap();
    let path_str = path.to_string_lossy().to_string();

    run_ingest(
        &mut conn,
        &[
            "cnabclip",
            "ingest",
            "--file",
            &path_str,
            "--chunk-size",
            "2",
        ],
    )
    .unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);

    let run = load_run(&conn, 1).unwrap();
    assert_eq!(run.status, JobStatus::Completed);
    assert_eq!(run.chunks_committed, 2);
}

#[test]
fn ingest_cli_surfaces_failure_with_committed_counts() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("pos.txt");
    let mut bad = cnab_line(3, 300, "33333333333");
    bad.truncate(30);
    let contents = [
        cnab_line(1, 100, "11111111111"),
        cnab_line(2, 200, "22222222222"),
        bad,
    ]
    .join("\n");
    std::fs::write(&path, contents).unwrap();
    let path_str = path.to_string_lossy().to_string();

    let err = run_ingest(
        &mut conn,
        &[
            "cnabclip",
            "ingest",
            "--file",
            &path_str,
            "--chunk-size",
            "2",
        ],
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("failed after 1 chunks"), "got: {}", msg);
    assert!(msg.contains("line 3"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn ingest_cli_resumes_failed_run_after_file_fixed() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("pos.txt");
    let mut bad = cnab_line(3, 300, "33333333333");
    bad.truncate(30);
    std::fs::write(
        &path,
        [
            cnab_line(1, 100, "11111111111"),
            cnab_line(2, 200, "22222222222"),
            bad,
        ]
        .join("\n"),
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();

    run_ingest(
        &mut conn,
        &[
            "cnabclip",
            "ingest",
            "--file",
            &path_str,
            "--chunk-size",
            "2",
        ],
    )
    .unwrap_err();

    // repair the file in place, then resume run 1
    std::fs::write(
        &path,
        [
            cnab_line(1, 100, "11111111111"),
            cnab_line(2, 200, "22222222222"),
            cnab_line(3, 300, "33333333333"),
        ]
        .join("\n"),
    )
    .unwrap();

    run_ingest(
        &mut conn,
        &["cnabclip", "ingest", "--resume", "1", "--chunk-size", "2"],
    )
    .unwrap();

    let run = load_run(&conn, 1).unwrap();
    assert_eq!(run.status, JobStatus::Completed);
    assert_eq!(run.records_committed, 3);

    // the first chunk was committed exactly once
    let first: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE cpf='11111111111'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(first, 1);
}

#[test]
fn tx_list_filters_by_cpf() {
    let mut conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("pos.txt");
    std::fs::write(
        &path,
        [
            cnab_line(1, 100, "11111111111"),
            cnab_line(2, 200, "22222222222"),
        ]
        .join("\n"),
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();
    run_ingest(&mut conn, &["cnabclip", "ingest", "--file", &path_str]).unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["cnabclip", "tx", "list", "--cpf", "22222222222"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, "-2.00");
            assert_eq!(rows[0].r#type, 2);
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}
