use std::{path::PathBuf, process::ExitCode};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_liked::{config, coordinator, debug, error, logging};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Increase log verbosity on stderr; can be repeated
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[clap(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Print the login URL instead of opening a browser
    #[clap(long)]
    no_browser: bool,

    /// Additional .env file to load before the default locations
    #[clap(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    logging::init(cli.verbose, cli.quiet);
    config::load_env(cli.env_file.as_deref());

    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    config.open_browser = !cli.no_browser;

    logging::set_level(config.log_level, cli.verbose, cli.quiet);
    debug!("Log level set to {}", log::max_level());

    match coordinator::run(&config).await {
        Ok(status) => {
            println!("{}", status);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
