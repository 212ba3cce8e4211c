//! Interactive shell for the row store.
//!
//! Usage:
//!   leafdb_cli [db_path]
//!
//! Reads statements from stdin at a `db > ` prompt. Lines starting
//! with `.` are meta commands:
//!   .exit              - flush and quit
//!   .constants [json]  - print the page layout constants
//!   .btree [json]      - print the tree structure
//!
//! With the `json` argument the dump commands print the same data as
//! pretty-printed JSON instead of the plain-text rendering.

use leafdb::error::{DbError, Result};
use leafdb::statement::{MetaCommand, Statement};
use leafdb::{constants, Table};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::exit;

const DEFAULT_DB_PATH: &str = "dbfile";

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: leafdb_cli [db_path]");
        exit(1);
    }
    let db_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DB_PATH);

    let table = match Table::open(Path::new(db_path)) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("ERROR: Failed to open database: {}", e);
            exit(1);
        }
    };

    if let Err(e) = repl(table) {
        eprintln!("ERROR: {}", e);
        exit(1);
    }
}

fn repl(mut table: Table) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();

    loop {
        print!("db > ");
        stdout.flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            // stdin closed; persist before leaving
            return table.close();
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('.') {
            match MetaCommand::parse(line) {
                Ok(MetaCommand::Exit) => return table.close(),
                Ok(MetaCommand::Constants { json: false }) => println!("{}", constants()),
                Ok(MetaCommand::Constants { json: true }) => print_json(&constants()),
                Ok(MetaCommand::Btree { json: false }) => println!("{}", table.tree_snapshot()?),
                Ok(MetaCommand::Btree { json: true }) => print_json(&table.tree_snapshot()?),
                Err(e) => println!("{}", e),
            }
            continue;
        }

        let statement = match Statement::prepare(line) {
            Ok(statement) => statement,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match statement.execute(&mut table, &mut stdout) {
            Ok(()) => println!("Executed"),
            Err(DbError::TableFull) => println!("Error: table full"),
            Err(DbError::DuplicateKey(_)) => println!("Error: duplicate key"),
            Err(e) => return Err(e),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("ERROR: {}", e),
    }
}
