use clap::Parser;
use rcz_runner::{info_command, init_logging, run_command, Cli, Command};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Run(args) => run_command(args).map(|_| ()),
        Command::Info(args) => info_command(args).map(|report| print!("{}", report)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
