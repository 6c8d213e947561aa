mod cli;
mod commands;
mod config;
mod error;
mod invocation;
mod notify;
mod output;
mod slider;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fritzact_core::Action;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::invocation::Invocation;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let invocation = match cli.command {
        // No gateway needed
        Some(Command::Config(args)) => return commands::config_cmd::handle(args, &cli.global),
        Some(Command::Completions(args)) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fritzact", &mut std::io::stdout());
            return Ok(());
        }
        Some(Command::Logout) => return commands::session::logout(&cli.global).await,

        None => Invocation::Interactive { device_type: None },
        Some(Command::List { device_type }) => Invocation::List {
            device_type: device_type.map(Into::into),
        },
        Some(Command::On(t)) => Invocation::command(Action::On, t.ain),
        Some(Command::Off(t)) => Invocation::command(Action::Off, t.ain),
        Some(Command::Toggle(t)) => Invocation::command(Action::Toggle, t.ain),
        Some(Command::Temp { ain, celsius }) => Invocation::Command {
            action: Action::Temp,
            ain,
            celsius,
            label: None,
        },
        Some(Command::Prefer) => Invocation::SetPreferred,
        Some(Command::ReadOnly) => Invocation::SetReadOnly,
        Some(Command::Invoke { query }) => invocation::parse(&query)?,
    };

    commands::dispatch(invocation, &cli.global).await
}
