mod api;
mod api_clients;
mod config;
mod envelope;
mod error;
mod helpers;
mod image;
mod location;
mod render;
mod view;
mod web_server;

use crate::api::ImageApi;
use crate::api_clients::http::HttpImageApi;
use crate::config::AppConfig;
use crate::location::Location;
use crate::view::SearchListView;
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Browse and search an image archive")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the search page (default)
    Serve {
        /// Overrides `web_port` from the configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one search and print the results
    Search {
        /// Search string; omitted lists everything
        query: Option<String>,
        /// Print the view state as JSON
        #[arg(long)]
        json: bool,
        /// Print every intermediate render, not just the final one
        #[arg(long)]
        follow: bool,
    },
}

async fn run_search(api: Arc<dyn ImageApi>, config: &AppConfig, query: Option<String>, json: bool, follow: bool) -> Result<()> {
    let location = query.as_deref().map(Location::with_search).unwrap_or_default();
    let view = SearchListView::new(api, config.api_version, location);

    let renderer = follow.then(|| {
        view.on_change(|state| match render::render_text(state) {
            Ok(text) => println!("{}\n", text),
            Err(e) => log::error!("Render error: {}", e),
        })
    });

    view.initial_load().await;
    let state = view.snapshot();
    drop(view);
    if let Some(renderer) = renderer {
        renderer.await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else if !follow {
        println!("{}", render::render_text(&state)?);
    }

    if let Some(error) = &state.error {
        anyhow::bail!("search failed: {}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting image-browser against {} ({:?})", config.api_base_url, config.api_version);

    let api: Arc<dyn ImageApi> = Arc::new(HttpImageApi::new(&config)?);

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.web_port = port;
            }
            let view = SearchListView::load(api, config.api_version, Location::default()).await;
            if let Some(error) = view.snapshot().error {
                log::warn!("Initial listing failed: {}", error);
            }

            if let Err(e) = web_server::start_web_server(Arc::new(config), Arc::new(view)).await {
                log::error!("Web server error: {}", e);
            }
        }
        Command::Search { query, json, follow } => {
            run_search(api, &config, query, json, follow).await?;
        }
    }

    info!("Image-browser finished");

    Ok(())
}
