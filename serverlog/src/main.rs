use clap::{Parser, Subcommand};
use serverlog_core::cli::serve::{ServeArgs, run_serve};
use serverlog_core::cli::ship::{ShipArgs, run_ship};
use serverlog_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "serverlog",
    version,
    about = "serverlog: view log records streamed from your applications"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for log records and print them (default)
    Serve(ServeArgs),

    /// Send stdin lines to a running server
    Ship(ShipArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Some(Command::Serve(args)) => run_serve(args),
        Some(Command::Ship(args)) => run_ship(args),
        None => run_serve(ServeArgs {
            host: std::env::var("SERVERLOG_HOST").ok(),
            ..Default::default()
        }),
    };

    if let Err(e) = result {
        eprintln!("serverlog: {e:#}");
        std::process::exit(1);
    }
}
