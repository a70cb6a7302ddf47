use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tradehire::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TradeHire",
    about = "Run the skilled-trades hiring pipeline service or walk through it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a scripted hiring round against an in-memory store
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["tradehire"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "tradehire",
            "demo",
            "--candidates",
            "3",
            "--interview-date",
            "2025-11-04T15:30:00Z",
            "--location",
            "Shop 4",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.candidates, 3);
                assert!(args.interview_date.is_some());
                assert_eq!(args.location.as_deref(), Some("Shop 4"));
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_port_override() {
        let cli = Cli::try_parse_from(["tradehire", "serve", "--port", "8081"]).expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8081)),
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
