use crate::dashboard::{run_dashboard, DashboardArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_insights::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Insights",
    about = "Serve or print the commercial leads dashboard built from an outreach spreadsheet",
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
    /// Load the spreadsheet once and print the dashboard
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured lead spreadsheet
    #[arg(long)]
    pub(crate) source: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_when_no_command_given() {
        let cli = Cli::try_parse_from(["lead-insights"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn dashboard_accepts_source_and_json_flags() {
        let cli = Cli::try_parse_from([
            "lead-insights",
            "dashboard",
            "--source",
            "data/leads.csv",
            "--json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Dashboard(args)) => {
                assert_eq!(args.source, Some(PathBuf::from("data/leads.csv")));
                assert!(args.json);
            }
            other => panic!("expected dashboard command, got {other:?}"),
        }
    }
}
