mod commands;
mod terminal;

use commands::{CommandLine, Commands, menu, scan};
use netsweep_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
    };

    match commands.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu::run(&cfg).await,
        Commands::Scan { target, args } => {
            print::banner(cfg.no_banner, cfg.quiet);
            scan::scan(target, args, &cfg).await
        }
    }
}
