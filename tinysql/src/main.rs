//! A one-shot smoke-testing CLI: opens a database at a directory and runs
//! a single SQL string against it (`SPEC_FULL.md` §1 — no REPL, no
//! readline history, no script runner; those are Non-goals).

use std::env;
use std::process::ExitCode;

use tinysql::{Database, Outcome};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let (Some(data_dir), Some(sql)) = (args.next(), args.next()) else {
        eprintln!("usage: tinysql <data_dir> <sql>");
        return ExitCode::FAILURE;
    };

    let mut db = match Database::open(data_dir) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match db.run(&sql) {
        Ok(Outcome::Message(message)) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Rows(result_set)) => {
            println!("{}", result_set.columns.join(" | "));
            for row in &result_set.rows {
                println!("{}", row.join(" | "));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
