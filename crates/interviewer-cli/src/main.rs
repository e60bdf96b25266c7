//! interviewer CLI: serve the HTTP API or evaluate answers from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "interviewer",
    version,
    about = "Simulated interview answer evaluation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a single answer and print the report
    Evaluate {
        /// The interview question
        #[arg(long)]
        question: String,

        /// The candidate's answer
        #[arg(long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
        answer: Option<String>,

        /// Read the answer from a file
        #[arg(long)]
        answer_file: Option<PathBuf>,

        /// Speaking time in seconds
        #[arg(long, allow_negative_numbers = true)]
        seconds: i64,

        /// Output format: text or json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("interviewer=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { host, port, config } => commands::serve::execute(host, port, config).await,
        Commands::Evaluate {
            question,
            answer,
            answer_file,
            seconds,
            format,
            config,
        } => {
            commands::evaluate::execute(
                question,
                answer,
                answer_file,
                seconds,
                matches!(format, OutputFormat::Json),
                config,
            )
            .await
        }
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
