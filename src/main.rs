use clap::{Parser, Subcommand};
use log::LevelFilter;
use stage_client::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use stage_client::form::{StageForm, UrlPair, parse_url_pair};
use stage_client::logging::init_logging;
use stage_client::view::render_text;
use stage_client::{HttpStageApi, StageApi, StageController, StageId};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "stage-client")]
#[command(about = "Client for the /stages service: list, create, update and delete stage records")]
#[command(long_about = r#"
Client for the /stages service.

Examples:
  stage-client list
  stage-client create --name IELTS \
    --url listening=http://localhost:8080/dataset/category/listening \
    --url reading=http://localhost:8080/dataset/category/reading
  stage-client delete 3
  stage-client --base-url http://stages.internal:8000 page > stages.html
"#)]
struct CliArgs {
    /// Base URL of the stages service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds (default 0: no timeout)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", value_parser = ["off", "error", "warn", "info", "debug", "trace"])]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all stages
    List,
    /// Show a single stage
    Get { id: i64 },
    /// Create a stage
    Create {
        #[arg(long)]
        name: String,
        /// Label/url pair as <label>=<url> (repeatable)
        #[arg(long = "url", value_parser = parse_url_pair)]
        urls: Vec<UrlPair>,
    },
    /// Replace a stage's name and urls
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long = "url", value_parser = parse_url_pair)]
        urls: Vec<UrlPair>,
    },
    /// Delete a stage
    Delete { id: i64 },
    /// Load the stage page and print it as HTML
    Page,
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let log_level: LevelFilter = args.log_level.parse()?;
    let config = ClientConfig::new(args.base_url)
        .with_timeout(args.timeout)
        .with_log_level(log_level);
    init_logging(config.log_level);

    let api = HttpStageApi::new(config)?;
    match args.command {
        Command::List => {
            let stages = api.list().await?;
            print!("{}", render_text(&stages));
        }
        Command::Get { id } => {
            let stage = api.get(StageId(id)).await?;
            print!("{}", render_text(std::slice::from_ref(&stage)));
        }
        Command::Create { name, urls } => {
            let data = StageForm::new(name, urls).assemble()?;
            api.create(&data).await?;
            log::info!("Stage created successfully!");
        }
        Command::Update { id, name, urls } => {
            let data = StageForm::new(name, urls).assemble()?;
            api.update(StageId(id), &data).await?;
            log::info!("Stage {} updated successfully!", id);
        }
        Command::Delete { id } => {
            api.delete(StageId(id)).await?;
            log::info!("Stage deleted successfully!");
        }
        Command::Page => {
            let controller = StageController::new(Arc::new(api));
            controller.on_page_load().await;
            print!("{}", controller.html());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
