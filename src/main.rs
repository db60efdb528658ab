use clap::Parser;
use todo::cli::commands::Cli;
use todo::cli::handlers;
use todo::io::logging::{self, LogSink};

fn main() {
    let cli = Cli::parse();

    let root = match handlers::data_dir(cli.dir.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(cmd) => {
            logging::init(LogSink::Stderr);
            handlers::dispatch(cmd, cli.json, &root)
        }
        None => {
            // No subcommand → launch TUI
            logging::init(LogSink::Silent);
            todo::tui::run(&root)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
