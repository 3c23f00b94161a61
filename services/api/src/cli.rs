use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use riskwise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Riskwise Assessment Orchestrator",
    about = "Demonstrate and run the Riskwise assessment service from the command line",
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
    /// Score an assessment template from the command line
    Assess {
        #[command(subcommand)]
        command: AssessCommand,
    },
    /// Run an end-to-end CLI demo covering analysis, review, and finalization
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AssessCommand {
    /// Score a template against an answer export and print the risk level
    Score(ScoreArgs),
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
        Command::Assess {
            command: AssessCommand::Score(args),
        } => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
