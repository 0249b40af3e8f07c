//! UI affordances to host commands.
//!
//! Every action checks that a bridge is attached, shapes its input, and
//! issues at most one command. Failures are logged and swallowed; callers get
//! an optional [`HostCall`] they are free to ignore.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use shared::{
    domain::{ConnectionState, MatchState, PathKind, WebsitePage},
    protocol::HostCommand,
};

use crate::{
    bridge::{HostBridge, HostCall},
    projector::ViewProjector,
    view::{ElementHandle, ViewSurface},
};

pub const DEFAULT_LOGIN_COOLDOWN: Duration = Duration::from_secs(5);
pub const LOGIN_BUTTON_ID: &str = "login-button";

/// Client-side rate limit for the login control.
#[derive(Debug, Clone)]
pub struct LoginLock {
    cooldown: Duration,
    locked_until: Option<Instant>,
}

impl LoginLock {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            locked_until: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }

    /// Engages the lock unless it is already held.
    pub fn try_lock(&mut self, now: Instant) -> bool {
        if self.is_locked(now) {
            return false;
        }
        self.locked_until = Some(now + self.cooldown);
        true
    }

    /// Clears an expired lock. Returns true only on the transition to unlocked.
    pub fn release_if_expired(&mut self, now: Instant) -> bool {
        match self.locked_until {
            Some(until) if now >= until => {
                self.locked_until = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for LoginLock {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_COOLDOWN)
    }
}

pub struct ActionDispatcher {
    bridge: Option<Arc<dyn HostBridge>>,
    login_lock: LoginLock,
    login_button: Option<ElementHandle>,
}

impl ActionDispatcher {
    pub fn new<V: ViewSurface + ?Sized>(surface: &V, login_cooldown: Duration) -> Self {
        Self {
            bridge: None,
            login_lock: LoginLock::new(login_cooldown),
            login_button: surface.resolve(LOGIN_BUTTON_ID),
        }
    }

    pub fn attach_bridge(&mut self, bridge: Arc<dyn HostBridge>) {
        self.bridge = Some(bridge);
    }

    pub fn detach_bridge(&mut self) {
        self.bridge = None;
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn is_login_locked(&self) -> bool {
        self.login_lock.is_locked(Instant::now())
    }

    pub fn test_button(&self) -> Option<HostCall> {
        self.invoke(HostCommand::TestButton)
    }

    pub fn save_proxy_secret(&self, raw_secret: &str) -> Option<HostCall> {
        self.ready("save_proxy_secret")?;
        let secret = non_empty(raw_secret)?;
        self.invoke(HostCommand::SaveProxySecret { secret })
    }

    pub fn start_server(&self) -> Option<HostCall> {
        self.invoke(HostCommand::StartServer)
    }

    pub fn stop_server(&self) -> Option<HostCall> {
        self.invoke(HostCommand::StopServer)
    }

    pub fn login_clicked<V: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut V,
        username: &str,
        password: &str,
    ) -> Option<HostCall> {
        self.login_clicked_at(surface, username, password, Instant::now())
    }

    pub fn login_clicked_at<V: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut V,
        username: &str,
        password: &str,
        now: Instant,
    ) -> Option<HostCall> {
        self.ready("login_clicked")?;
        if self.login_lock.is_locked(now) {
            tracing::debug!("login control is cooling down; ignoring click");
            return None;
        }
        let username = non_empty(username)?;
        let password = non_empty(password)?;

        let call = self.invoke(HostCommand::LoginClicked { username, password })?;
        self.login_lock.try_lock(now);
        if let Some(button) = self.login_button {
            surface.set_interactive(button, false);
        }
        Some(call)
    }

    /// Re-enables the login control once its cooldown has run out. Meant to be
    /// called from the UI loop; returns true on the frame the lock clears.
    pub fn poll_login_cooldown<V: ViewSurface + ?Sized>(&mut self, surface: &mut V) -> bool {
        self.poll_login_cooldown_at(surface, Instant::now())
    }

    pub fn poll_login_cooldown_at<V: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut V,
        now: Instant,
    ) -> bool {
        if !self.login_lock.release_if_expired(now) {
            return false;
        }
        if let Some(button) = self.login_button {
            surface.set_interactive(button, true);
        }
        true
    }

    /// Logs out and resets the indicators without waiting for the host.
    pub fn logout<V: ViewSurface + ?Sized>(
        &self,
        projector: &ViewProjector,
        surface: &mut V,
    ) -> Option<HostCall> {
        let call = self.invoke(HostCommand::Logout)?;
        projector.show_connection_state(surface, ConnectionState::NotConnected);
        projector.show_match_state(surface, MatchState::NoMatch);
        projector.set_user_data(surface, "");
        Some(call)
    }

    pub fn open_website(&self, page: &str) -> Option<HostCall> {
        self.ready("open_website")?;
        let page = match page.parse::<WebsitePage>() {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!("{err}; not opening website");
                return None;
            }
        };
        self.invoke(HostCommand::OpenWebsite { page })
    }

    pub fn open_file_explorer(&self, kind: PathKind) -> Option<HostCall> {
        self.invoke(HostCommand::OpenFileExplorer { kind })
    }

    pub fn submit_path(&self, raw_path: &str, kind: PathKind) -> Option<HostCall> {
        self.ready("submit_path")?;
        let path = non_empty(raw_path)?;
        self.invoke(HostCommand::SubmitPath { path, kind })
    }

    fn ready(&self, method: &'static str) -> Option<&Arc<dyn HostBridge>> {
        if self.bridge.is_none() {
            tracing::error!(method, "host bridge not ready");
        }
        self.bridge.as_ref()
    }

    fn invoke(&self, command: HostCommand) -> Option<HostCall> {
        let method = command.method_name();
        let bridge = self.ready(method)?;
        match bridge.invoke(command) {
            Ok(call) => Some(call),
            Err(err) => {
                tracing::error!(method, "host call failed: {err}");
                None
            }
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
