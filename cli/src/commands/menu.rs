use colored::*;
use netsweep_common::config::Config;
use netsweep_common::error;
use netsweep_common::network::target::Target;

use crate::commands::{ScanArgs, scan};
use crate::mprint;
use crate::terminal::{colors, input, print};

const RETURN_PROMPT: &str = "Press any key to return to the main menu...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    NetworkScanner,
    Exit,
}

impl MenuOption {
    const ALL: [MenuOption; 2] = [MenuOption::NetworkScanner, MenuOption::Exit];

    fn key(self) -> u8 {
        match self {
            MenuOption::NetworkScanner => 1,
            MenuOption::Exit => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuOption::NetworkScanner => "Network scanner",
            MenuOption::Exit => "Exit",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ChoiceError {
    Format,
    Unknown(u8),
}

fn parse_choice(input: &str) -> Result<MenuOption, ChoiceError> {
    let key: u8 = input.trim().parse().map_err(|_| ChoiceError::Format)?;
    MenuOption::ALL
        .into_iter()
        .find(|opt| opt.key() == key)
        .ok_or(ChoiceError::Unknown(key))
}

/// Runs the interactive menu until the user exits or stdin closes.
///
/// A failed scan is reported and the menu shown again.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    loop {
        input::clear_screen()?;
        print::banner(cfg.no_banner, cfg.quiet);
        print::header("main menu", 0);
        for opt in MenuOption::ALL {
            mprint!(&format!(
                "  {} {}",
                format!("[{}]", opt.key()).color(colors::ACCENT),
                opt.label().color(colors::TEXT_DEFAULT)
            ));
        }
        mprint!();

        let Some(line) = input::prompt("Select an option: ").await? else {
            return Ok(());
        };

        match parse_choice(&line) {
            Ok(MenuOption::Exit) => return Ok(()),
            Ok(MenuOption::NetworkScanner) => {
                if let Err(e) = network_scanner(cfg).await {
                    error!("{e:#}");
                }
                input::wait_for_key(RETURN_PROMPT).await?;
            }
            Err(ChoiceError::Unknown(key)) => {
                error!("Invalid option: {key}");
                input::wait_for_key(RETURN_PROMPT).await?;
            }
            Err(ChoiceError::Format) => {
                error!("Invalid input format, enter the number of an option");
                input::wait_for_key(RETURN_PROMPT).await?;
            }
        }
    }
}

async fn network_scanner(cfg: &Config) -> anyhow::Result<()> {
    let target: Target = netsweep_common::config::DEFAULT_TARGET.parse()?;
    scan::scan(target, ScanArgs::default(), cfg).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
