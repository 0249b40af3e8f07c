//! Loopback host: executes UI commands against the host state store and
//! pushes the resulting notifications back to the UI.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use client_core::{HostReply, HostState, UserDataUpdate};
use crossbeam_channel::Sender;
use shared::{
    domain::{ConnectionState, MatchState, PathKind},
    protocol::{HostCommand, HostNotification},
};

use crate::{
    backend_bridge::path_check::required_files_exist, config::Settings,
    controller::events::UiEvent,
};

pub const LOGIN_HANDSHAKE_DELAY: Duration = Duration::from_millis(400);

/// Side effects that leave the process: browser and native dialogs.
///
/// `pick_folder` blocks until the user answers and is only ever called from
/// the blocking pool.
pub trait HostEnvironment: Send + Sync + 'static {
    fn open_url(&self, url: &str) -> anyhow::Result<()>;
    fn pick_folder(&self, kind: PathKind) -> Option<PathBuf>;
}

pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("failed to open {url}"))
    }

    fn pick_folder(&self, kind: PathKind) -> Option<PathBuf> {
        let title = match kind {
            PathKind::DedicatedServer => "Select the Don't Starve Together Dedicated Server folder",
            PathKind::Cluster => "Select the DoNotStarveTogether folder",
        };
        rfd::FileDialog::new().set_title(title).pick_folder()
    }
}

pub struct LoopbackHost<E> {
    state: HostState,
    settings: Settings,
    env: Arc<E>,
    ui_tx: Sender<UiEvent>,
}

impl<E: HostEnvironment> LoopbackHost<E> {
    pub fn new(settings: Settings, env: E, ui_tx: Sender<UiEvent>) -> Self {
        Self {
            state: HostState::new(),
            settings,
            env: Arc::new(env),
            ui_tx,
        }
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Brings a freshly started view in line with the host's state.
    pub fn publish_snapshot(&self) {
        for notification in self.state.snapshot() {
            self.notify(Some(notification));
        }
    }

    pub async fn handle(&mut self, command: HostCommand) -> HostReply {
        match command {
            HostCommand::TestButton => {
                tracing::info!("host: test button pressed");
                self.info("Host received the test button");
            }
            HostCommand::SaveProxySecret { secret } => {
                let update = UserDataUpdate {
                    proxy_secret: Some(secret),
                    ..UserDataUpdate::default()
                };
                let notification = self.state.set_user_data(update, false);
                self.notify(notification);
                tracing::info!("host: proxy secret updated");
                self.info("Proxy secret saved");
            }
            HostCommand::StartServer => {
                if self.state.user_data().dedi_path.is_none() {
                    return Err("dedicated server path not set".into());
                }
                let notification = self.state.set_match_state(MatchState::WorldGenerating);
                self.notify(notification);
            }
            HostCommand::StopServer => {
                let notification = self.state.set_match_state(MatchState::NoMatch);
                self.notify(notification);
            }
            HostCommand::LoginClicked {
                username,
                password: _,
            } => {
                tracing::info!(username = %username, "host: login requested");
                let notification = self.state.set_connection_state(ConnectionState::Connecting);
                self.notify(notification);
                tokio::time::sleep(LOGIN_HANDSHAKE_DELAY).await;
                let notification = self
                    .state
                    .set_user_data(UserDataUpdate::username(username), false);
                self.notify(notification);
                let notification = self.state.set_connection_state(ConnectionState::Connected);
                self.notify(notification);
            }
            HostCommand::Logout => {
                let notification = self.state.set_user_data(UserDataUpdate::default(), true);
                self.notify(notification);
                let notification = self.state.set_connection_state(ConnectionState::NotConnected);
                self.notify(notification);
                let notification = self.state.set_match_state(MatchState::NoMatch);
                self.notify(notification);
            }
            HostCommand::OpenWebsite { page } => {
                let url = self.settings.site_page_url(page.path());
                tracing::info!(url = %url, "host: opening website");
                self.env.open_url(&url).map_err(|err| format!("{err:#}"))?;
            }
            HostCommand::OpenFileExplorer { kind } => {
                // The pick arrives later as `UiEvent::PathPicked`.
                drop(self.spawn_folder_picker(kind));
            }
            HostCommand::SubmitPath { path, kind } => {
                required_files_exist(Path::new(&path), kind).map_err(|err| err.to_string())?;
                let update = match kind {
                    PathKind::DedicatedServer => UserDataUpdate {
                        dedi_path: Some(path),
                        ..UserDataUpdate::default()
                    },
                    PathKind::Cluster => UserDataUpdate {
                        cluster_path: Some(path),
                        ..UserDataUpdate::default()
                    },
                };
                let notification = self.state.set_user_data(update, false);
                self.notify(notification);
                self.info(match kind {
                    PathKind::DedicatedServer => "Dedicated server path saved",
                    PathKind::Cluster => "Cluster path saved",
                });
            }
        }
        Ok(())
    }

    /// Runs the native folder picker off the command loop and sends the
    /// picked path back to fill the matching input.
    pub fn spawn_folder_picker(&self, kind: PathKind) -> tokio::task::JoinHandle<()> {
        let env = Arc::clone(&self.env);
        let ui_tx = self.ui_tx.clone();
        tokio::task::spawn_blocking(move || match env.pick_folder(kind) {
            Some(path) => forward(
                &ui_tx,
                UiEvent::PathPicked {
                    kind,
                    path: path.display().to_string(),
                },
            ),
            None => tracing::debug!(?kind, "host: folder picker cancelled"),
        })
    }

    pub fn info(&self, message: &str) {
        forward(&self.ui_tx, UiEvent::Info(message.to_string()));
    }

    fn notify(&self, notification: Option<HostNotification>) {
        if let Some(notification) = notification {
            forward(&self.ui_tx, UiEvent::Notification(notification));
        }
    }
}

fn forward(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(err) = ui_tx.try_send(event) {
        tracing::warn!(event = ?err.into_inner(), "host: ui event queue unavailable; dropping event");
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
