use crate::demo::{
    run_city_search, run_demo, run_questions, run_score, CitiesArgs, DemoArgs, ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_check::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Family Risk Check",
    about = "Score a household's health and life cover gaps from the command line or over HTTP",
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
    /// Inspect the questionnaire and score saved answer sets
    Risk {
        #[command(subcommand)]
        command: RiskCommand,
    },
    /// Walk the family screens through a full risk check, including the analysing pause
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RiskCommand {
    /// Print every questionnaire step with its options and fields
    Questions,
    /// Score an answer set stored as JSON
    Score(ScoreArgs),
    /// List known cities and their cost multipliers
    Cities(CitiesArgs),
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
        Command::Risk { command } => match command {
            RiskCommand::Questions => run_questions(),
            RiskCommand::Score(args) => run_score(args),
            RiskCommand::Cities(args) => run_city_search(args),
        },
        Command::Demo(args) => run_demo(args).await,
    }
}
