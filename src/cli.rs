// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print pretty JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue)
            .conflicts_with("json"),
    )
}

fn selection_args(cmd: Command, default_period: &'static str) -> Command {
    cmd.arg(
        Arg::new("period")
            .long("period")
            .help("day | week | month | quarter | year | custom")
            .default_value(default_period),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .help("Start date (YYYY-MM-DD, inclusive) for --period custom"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("End date (YYYY-MM-DD, inclusive) for --period custom"),
    )
}

pub fn build_cli() -> Command {
    Command::new("salesboard")
        .version(crate_version!())
        .about("Sales analytics over daily order statistics")
        .subcommand(Command::new("init").about("Create the local statistics store"))
        .subcommand(
            Command::new("stats")
                .about("Manage raw daily statistics")
                .subcommand(
                    Command::new("add")
                        .about("Add or replace one daily record")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("orders")
                                .long("orders")
                                .value_parser(value_parser!(u64))
                                .default_value("0"),
                        )
                        .arg(
                            Arg::new("items")
                                .long("items")
                                .value_parser(value_parser!(u64))
                                .default_value("0"),
                        )
                        .arg(Arg::new("revenue").long("revenue").default_value("0")),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List stored records")
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .help("latest | oldest")
                                .default_value("latest"),
                        )
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .help("Only records in the current week, month or year"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("show")
                        .about("Show every stored day for an id")
                        .arg(Arg::new("id").long("id").required(true)),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove the records stored under an id")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Only remove the record for this date"),
                        ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import raw statistics")
                .subcommand(
                    Command::new("stats")
                        .about("Import daily records from CSV")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Fetch daily records from the statistics API")
                .arg(Arg::new("url").long("url").required(true))
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("Bearer token (defaults to $SALESBOARD_TOKEN)"),
                )
                .arg(
                    Arg::new("period")
                        .long("period")
                        .help("Ask the API to scope records to week | month | year"),
                ),
        )
        .subcommand(json_args(selection_args(
            Command::new("report").about("Bucket daily records into a period report"),
            "month",
        )))
        .subcommand(
            Command::new("export")
                .about("Export reports")
                .subcommand(selection_args(
                    Command::new("report")
                        .about("Write one row per bucket")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .help("csv | json")
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                    "month",
                )),
        )
        .subcommand(Command::new("doctor").about("Check stored records for problems"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the display currency")
                        .arg(Arg::new("currency").long("currency").required(true)),
                )
                .subcommand(Command::new("show").about("Show current settings")),
        )
}
