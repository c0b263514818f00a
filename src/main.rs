//! pollen-tui - a terminal browser for pollen reference catalogs
//!
//! Cascading family / genus / species filters over a paginated thumbnail
//! gallery, with an alphabet lookup and a focal-plane viewer.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Config, ConfigError, Overrides};
use crate::controller::FilterController;
use crate::services::{CatalogClient, FetchRunner, HttpCatalogClient, MemoryCatalog};
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "pollen-tui")]
#[command(about = "Browse a pollen catalog by family, genus and species", version)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long)]
    api_url: Option<String>,

    /// Catalog (category) to browse
    #[arg(long)]
    catalog_id: Option<String>,

    /// Browse the built-in demo catalog instead of the API
    #[arg(long)]
    demo: bool,

    /// Images per gallery page
    #[arg(long)]
    max_results: Option<u32>,

    /// Save the resolved settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_base_url: self.api_url.clone(),
            catalog_id: self.catalog_id.clone(),
            max_results: self.max_results,
            demo: self.demo,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(Config::load()?, &Overrides::from_env(), &cli.overrides())?;

    if cli.write_config {
        let path = config.save()?;
        println!("Saved settings to {}", path.display());
        return Ok(());
    }

    let log_dir = Config::config_dir().unwrap_or_else(std::env::temp_dir);
    if let Err(e) = logging::init(&log_dir) {
        eprintln!("Logging disabled: {}", e);
    }

    let (client, catalog_id) = if config.demo {
        let catalog = MemoryCatalog::demo();
        let catalog_id = catalog.catalog_id();
        (Arc::new(catalog) as Arc<dyn CatalogClient>, catalog_id)
    } else {
        let catalog_id = config.catalog_id.ok_or(ConfigError::MissingCatalogId)?;
        let client = HttpCatalogClient::new(&config.api_base_url, config.request_timeout())?;
        (Arc::new(client) as Arc<dyn CatalogClient>, catalog_id)
    };
    info!(
        %catalog_id,
        demo = config.demo,
        api = %config.api_base_url,
        "starting pollen browser"
    );

    let runner = FetchRunner::new(client, config.request_timeout())?;
    let controller = FilterController::new(catalog_id, &config.image_base_url, config.max_results);
    let mut app = App::new(controller, runner, config.demo);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    app.init()?;
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("pollen browser closed");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        let mut draw_result = Ok(());
        tui.draw(|frame| {
            let area = frame.area();
            draw_result = app.draw(frame, area);
        })?;
        if let Err(e) = draw_result {
            tracing::warn!(error = %e, "draw failed");
        }

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // An action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - poll the catalog responses
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
