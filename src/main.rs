mod cli;
mod logging;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::List {
            snapshot,
            query,
            sort,
        } => workflow::execute_list(&cli.settings, &snapshot, query.as_deref(), sort.into()),
        Commands::Check { snapshot } => workflow::execute_check(&cli.settings, &snapshot),
        Commands::Exclude { module_id, version } => {
            workflow::execute_exclude(&cli.settings, &module_id, version.as_deref())
        }
        Commands::Include { module_id } => workflow::execute_include(&cli.settings, &module_id),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
