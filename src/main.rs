use anyhow::Context;
use byteland::{run_test_case, solve, Cases};
use clap::Parser;
use std::{
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Prints, for each test case, the total cost of the cities destroyed.
#[derive(Parser)]
#[command(name = "byteland", version)]
struct Cli {
    /// Input file (stdin when absent or "-")
    input: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also print the 1-based order of destroyed cities to stderr
    #[arg(long)]
    deletions: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("unable to open {}", path.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for case in Cases::new(reader)? {
        let case = case?;
        if cli.deletions {
            let report = solve(case.graph);
            let order: Vec<String> = report
                .deletions
                .iter()
                .map(|city| (city + 1).to_string())
                .collect();
            eprintln!("{}: {}", case.number, order.join(" "));
            writeln!(out, "{}", report.total_cost)?;
        } else {
            writeln!(out, "{}", run_test_case(case.graph))?;
        }
    }
    out.flush()?;
    Ok(())
}
