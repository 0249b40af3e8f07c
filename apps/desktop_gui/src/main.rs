use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::{ChannelBridge, HostRequest};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{config::Settings, controller::events::UiEvent, ui::ShellApp};

const WINDOW_TITLE: &str = "Ranked DST";

#[derive(Parser, Debug)]
#[command(name = "ranked_dst", about = "Desktop companion for ranked Don't Starve Together matches")]
struct Args {
    /// Config file to load instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    site_url: Option<String>,
    #[arg(long)]
    login_cooldown_ms: Option<u64>,
    /// Point website links at the local development frontend.
    #[arg(long)]
    dev: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if self.dev {
            settings.site_url = config::DEVELOPMENT_SITE_URL.to_string();
        }
        if let Some(site_url) = &self.site_url {
            settings.site_url = site_url.clone();
        }
        if let Some(cooldown) = self.login_cooldown_ms {
            settings.login_cooldown_ms = cooldown;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(site_url = %settings.site_url, "starting desktop shell");

    let (host_tx, host_rx) = bounded::<HostRequest>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    let login_cooldown = settings.login_cooldown();
    backend_bridge::runtime::launch(host_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([420.0, 620.0])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ShellApp::new(
                Arc::new(ChannelBridge::new(host_tx)),
                ui_rx,
                login_cooldown,
            )))
        }),
    )
    .map_err(|err| anyhow!("desktop shell exited with an error: {err}"))
}
