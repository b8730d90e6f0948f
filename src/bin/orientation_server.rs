//! JSON-RPC orientation server over stdio
//!
//! Usage:
//!   orientation_server [--config <path>]

use std::io::{self, BufRead, Write};

use church_orientation::server::util::init_logging;
use church_orientation::server::{handle_line, Session};
use church_orientation::OrientationConfig;

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => match args.get(i + 1) {
            Some(path) => OrientationConfig::load_from_file(path)?,
            None => anyhow::bail!("--config needs a path"),
        },
        None => OrientationConfig::default(),
    };

    log::info!("Starting church orientation server (mode {:?})", config.selection_mode);
    let mut session = Session::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("Error reading stdin: {}", e);
                continue;
            }
        };

        if let Some(response) = handle_line(&mut session, &line) {
            writeln!(stdout, "{}", response)?;
            stdout.flush()?;
        }
    }

    log::info!("stdin closed, shutting down");
    Ok(())
}
