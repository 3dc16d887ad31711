use crate::demo::{
    run_admission, run_board, run_demo, run_stats, AdmissionArgs, BoardArgs, DemoArgs, StatsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use quizgate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Quizgate",
    about = "Quiz availability boards, score statistics, and admission checks",
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
    /// Print the quiz board a caller would see
    Board(BoardArgs),
    /// Print aggregate score statistics for a quiz population
    Stats(StatsArgs),
    /// Check an admission number against a cohort's registration range
    Admission(AdmissionArgs),
    /// Walk through boards, statistics, and admission checks on demo data
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
    /// Quiz snapshot JSON to serve instead of the demo population
    #[arg(long)]
    pub(crate) snapshot: Option<std::path::PathBuf>,
    /// Admission ranges JSON to serve instead of the demo ranges
    #[arg(long)]
    pub(crate) ranges: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Board(args) => run_board(args),
        Command::Stats(args) => run_stats(args),
        Command::Admission(args) => run_admission(args),
        Command::Demo(args) => run_demo(args),
    }
}
