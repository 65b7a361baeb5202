// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("cnabclip")
        .about("CNAB fixed-width transaction ingestion, chunked bulk loading, and job-run audit")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("ingest")
                .about("Ingest a CNAB file in transactional chunks")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_name("PATH")
                        .help("CNAB file to ingest"),
                )
                .arg(
                    Arg::new("resume")
                        .long("resume")
                        .value_name("RUN_ID")
                        .value_parser(value_parser!(i64))
                        .help("Resume a failed run from its last committed chunk"),
                )
                .arg(
                    Arg::new("chunk-size")
                        .long("chunk-size")
                        .value_parser(value_parser!(usize))
                        .default_value("1000")
                        .help("Records per storage transaction"),
                )
                .group(
                    ArgGroup::new("source")
                        .args(["file", "resume"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("runs")
                .about("Inspect job runs")
                .subcommand(json_flags(
                    Command::new("list").about("List job runs").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("show").about("Show one job run").arg(
                        Arg::new("run")
                            .long("run")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Inspect ingested transactions")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("cpf").long("cpf").value_name("CPF"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("CODE")
                                .value_parser(value_parser!(u8)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export the transactions table")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Run consistency checks"))
}
