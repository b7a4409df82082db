//! # CLI - Keysort Interactive Shell
//!
//! A REPL-style shell for sorting JSON records by key. Reads commands from
//! stdin, prints results to stdout. Works interactively or with commands
//! piped in.
//!
//! ## Commands
//!
//! ```text
//! ADD json            Append one JSON object
//! LOAD path           Append records from a JSON array file
//! DEMO                Replace records with the built-in people list
//! SHOW                Print all records
//! SORT key [opts]     Print records sorted by key (records unchanged)
//!                     opts: asc|desc  last|first|raise  identity|lowercase|
//!                           uppercase|length|number
//! COUNT               Print the number of records
//! CLEAR               Drop all records
//! EXIT / QUIT         Leave
//! ```
//!
//! ## Configuration
//!
//! ```text
//! KEYSORT_DIRECTION  default direction        (default: "asc")
//! KEYSORT_MISSING    default missing policy   (default: "last")
//! KEYSORT_TRANSFORM  default named transform  (default: "identity")
//! KEYSORT_PRETTY     pretty-print JSON output (default: "false")
//! RUST_LOG           log filter, logs go to stderr (default: "warn")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! keysort shell (direction=asc, missing=last, transform=identity)
//! > DEMO
//! OK (4 records)
//! > SORT age
//! {"age":25,"name":"bob"}
//! {"age":30,"name":"Alice"}
//! {"age":35,"name":"dan"}
//! {"name":"Charlie"}
//! (4 records)
//! > EXIT
//! bye
//! ```

mod session;

use anyhow::Result;
use config::ShellConfig;
use session::{Outcome, Session};
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ShellConfig::from_env()?;
    info!(?config, "configuration loaded");

    println!(
        "keysort shell (direction={}, missing={}, transform={})",
        config.direction, config.missing, config.transform
    );
    println!("Commands: ADD json | LOAD path | DEMO | SHOW | COUNT | CLEAR");
    println!("          SORT key [asc|desc] [last|first|raise] [transform] | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let mut session = Session::new(config);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        match session.execute(&line) {
            Outcome::Continue(out) => {
                if !out.is_empty() {
                    println!("{out}");
                }
            }
            Outcome::Exit(out) => {
                println!("{out}");
                break;
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
