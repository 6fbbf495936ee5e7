use clap::Parser;
use sweep::cli::{Args, run};
use sweep::logging;
use tracing::error;

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}
