use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use fruitclean::services::restore::{Restoration, restore_swears};

/// Restore censored text (fruit -> original term) and count occurrences.
#[derive(Parser)]
#[command(name = "restore", version, about)]
struct Cli {
    /// Censored text (fruit-substituted)
    #[arg(long)]
    text: String,

    /// Print a single JSON object instead of two lines
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        if is_broken_pipe(&err) {
            std::process::exit(0);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let restoration = restore_swears(&cli.text);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_restoration(&mut out, &restoration, cli.json)?;
    out.flush()?;
    Ok(())
}

fn write_restoration<W: Write>(out: &mut W, restoration: &Restoration, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(restoration)?)?;
    } else {
        writeln!(out, "복원된 문장: {}", restoration.restored)?;
        writeln!(out, "욕 빈도: {}", restoration.counts)?;
    }
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
