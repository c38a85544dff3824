mod cli;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    platform::logging::initialize(args.log, args.verbose);
    platform::run(args)
}
