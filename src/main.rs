use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use rankboard::api::Dashboard;
use rankboard::config::Config;
use rankboard::error::{BoardError, BoardResult};
use rankboard::status::{KeyTranslator, TracingStatus, Translator};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/players.csv")]
    data: PathBuf,

    /// Score rules CSV (Category,Score_Per_Unit). Without it every score is 0.
    #[arg(global = true, short, long)]
    rules: Option<PathBuf>,

    /// JSON config file; explicit flags override its values
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// JSON translation file for titles and labels
    #[arg(global = true, long)]
    lang: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Report(cmd::report::ReportArgs),
    Charts(cmd::charts::ChartsArgs),
    Category(cmd::category::CategoryArgs),
    Player(cmd::player::PlayerArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Raw matches tell user input apart from clap defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if let Err(e) = run(cli, &matches).await {
        error!("❌ {}", e);
        eprintln!("\n❌ {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli, matches: &ArgMatches) -> BoardResult<()> {
    let (cli_config, sub_name) = match &cli.command {
        Commands::Report(args) => (&args.config, "report"),
        Commands::Charts(args) => (&args.config, "charts"),
        Commands::Category(args) => (&args.config, "category"),
        Commands::Player(args) => (&args.config, "player"),
    };
    let sub_matches = matches
        .subcommand_matches(sub_name)
        .ok_or_else(|| BoardError::Config(format!("Missing '{}' arguments", sub_name)))?;

    let config = match &cli.config {
        Some(path) => {
            println!("⚙️  Loading config from: {}", path.display());
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };

    let translator: Arc<dyn Translator> = match &cli.lang {
        Some(path) => Arc::new(KeyTranslator::load_from_file(path)?),
        None => Arc::new(KeyTranslator::default()),
    };

    println!("\n🚀 Initializing rankboard...");
    let dashboard = Dashboard::with_services(
        Arc::new(reports::TerminalRenderer::default()),
        config,
        Arc::new(TracingStatus),
        translator,
    )?;

    let report = dashboard.load_paths(&cli.data, cli.rules.as_deref())?;
    reports::print_load_report(&report);

    match cli.command {
        Commands::Report(args) => cmd::report::run(&dashboard, args).await?,
        Commands::Charts(args) => cmd::charts::run(&dashboard, args).await,
        Commands::Category(args) => cmd::category::run(&dashboard, args).await,
        Commands::Player(args) => cmd::player::run(&dashboard, args).await,
    }

    dashboard.teardown();
    Ok(())
}
