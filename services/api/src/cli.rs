use crate::report::{run_jobs_options, run_jobs_report, JobsOptionsArgs, JobsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_insights::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Job Insights",
    about = "Explore job listing trends from the command line or over HTTP",
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
    /// Inspect a job dataset without starting the server
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// Filter a dataset and print its grouped breakdown
    Report(JobsReportArgs),
    /// Print the location and job type filter choices of a dataset
    Options(JobsOptionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Job dataset (.csv or .json); overrides JOBS_DATA_PATH
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Jobs {
            command: JobsCommand::Report(args),
        } => run_jobs_report(args),
        Command::Jobs {
            command: JobsCommand::Options(args),
        } => run_jobs_options(args),
    }
}
