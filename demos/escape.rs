use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

use json_quote::{escape, escape_bytes};

/// Prints the quoted JSON string literal for a file argument, or for stdin
/// when no path is given.
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let quoted = match args.get(1) {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
            escape_bytes(&bytes)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            escape(text.as_str())
        }
    };
    println!("{quoted}");
    Ok(())
}
