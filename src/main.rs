use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use headlines::app::{App, AppEvent};
use headlines::config::Config;
use headlines::keybindings::KeybindingRegistry;
use headlines::news::{Category, NewsClient};
use headlines::state::{PageOutcome, ViewState};
use headlines::theme::ThemeVariant;
use headlines::ui;
use headlines::util::{strip_control_chars, validate_endpoint};

#[derive(Parser, Debug)]
#[command(
    name = "headlines",
    version,
    about = "Terminal news reader with category tabs, search and infinite scroll"
)]
struct Args {
    /// Config file (default: ~/.config/headlines/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the news API; /api/news is appended
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Starting category (general, business, entertainment, health, science, sports, technology)
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Starting theme
    #[arg(long, value_name = "light|dark")]
    theme: Option<String>,

    /// Initial search filter
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the first page of the category and exit (no TUI)
    #[arg(long)]
    once: bool,
}

/// Install the tracing subscriber. Filter comes from `RUST_LOG`.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Fetch page 1 through the same state transitions the TUI uses and print it.
async fn print_once(mut view: ViewState, client: &NewsClient) -> Result<()> {
    let request = view.mount();
    let result = client.fetch_page(request.category, request.page).await;
    if let Err(e) = &result {
        eprintln!("Failed to fetch {} news: {}", request.category, e);
    }

    if let PageOutcome::Replaced { count } =
        view.apply_page(request.generation, request.page, result)
    {
        tracing::debug!(count, "Fetched first page");
    }

    let now = Utc::now();
    let visible = view.visible_articles();
    for article in &visible {
        println!("{}", strip_control_chars(&article.title));
        let age = ui::format_relative_time(article.published_at, now);
        match (&article.source, age.is_empty()) {
            (Some(source), false) => println!("  {} · {}", strip_control_chars(source), age),
            (Some(source), true) => println!("  {}", strip_control_chars(source)),
            (None, false) => println!("  {}", age),
            (None, true) => {}
        }
        if !article.url.is_empty() {
            println!("  {}", strip_control_chars(&article.url));
        }
    }

    if visible.is_empty() {
        println!("No articles");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_path = args.config.clone().or_else(Config::default_path);
    let config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };

    // CLI flag > config file > built-in default
    let endpoint_str = args.endpoint.as_deref().unwrap_or(&config.endpoint);
    let endpoint = validate_endpoint(endpoint_str)
        .with_context(|| format!("Invalid endpoint '{}'", endpoint_str))?;

    let category_name = args.category.as_deref().unwrap_or(&config.category);
    let category: Category = category_name.parse()?;

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = ThemeVariant::from_str_name(theme_name)
        .with_context(|| format!("Unknown theme '{}' (expected light or dark)", theme_name))?;

    let timeout =
        (config.request_timeout_secs > 0).then(|| Duration::from_secs(config.request_timeout_secs));
    let client = NewsClient::new(endpoint, timeout, config.max_articles_per_page)
        .context("Failed to build HTTP client")?;

    tracing::info!(
        endpoint = %client.endpoint(),
        category = %category,
        theme = theme.name(),
        "Starting"
    );

    let view = ViewState::with_query(category, theme, args.search.clone().unwrap_or_default());

    if args.once {
        return print_once(view, &client).await;
    }

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    let mut app = App::new(view, client, keybindings);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
