use anyhow::Result;

use neighbor_ratings::cli::Command;
use neighbor_ratings::{handle_compare, handle_evaluate, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Evaluate {
            mode,
            neighbors,
            data,
            top,
            json,
        } => handle_evaluate(*mode, neighbors, data, *top, json.as_deref()),
        Command::Compare { neighbors, data } => handle_compare(neighbors, data),
    }
}
