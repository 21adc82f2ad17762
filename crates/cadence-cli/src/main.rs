use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "cadence", version, about = "Cadence CLI - learn when you get things done")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a completed task
    Record(commands::record::RecordArgs),
    /// Learning progress
    Status {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Productivity score by hour
    Score {
        /// Single hour (0-23); omit for the chart
        #[arg(long)]
        hour: Option<u32>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Most productive hours
    Hours {
        #[arg(long, default_value_t = 3)]
        limit: usize,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Completions per category
    Categories {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest times for pending tasks
    Suggest(commands::suggest::SuggestArgs),
    /// Completion data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Initialise tracing on stderr; `RUST_LOG` overrides the default level.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record(args) => commands::record::run(args),
        Commands::Status { json } => commands::insights::status(json),
        Commands::Score { hour, json } => commands::insights::score(hour, json),
        Commands::Hours { limit, json } => commands::insights::hours(limit, json),
        Commands::Categories { json } => commands::insights::categories(json),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cadence", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
