//! Host state to view projection.
//!
//! Each state category owns a static table mapping state values to the
//! element groups shown for them. The tables are resolved against a
//! [`ViewSurface`] once, at startup, into a [`ViewBindings`] value that the
//! [`ViewProjector`] uses for every later notification.

use shared::{
    domain::{ConnectionState, MatchState},
    protocol::HostNotification,
};

use crate::view::{ElementHandle, ViewSurface};

pub type StateElementMap<S> = &'static [(S, &'static [&'static str])];

pub const CONNECTION_STATE_ELEMENTS: StateElementMap<ConnectionState> = &[
    (
        ConnectionState::NotConnected,
        &["login-section", "proxy-secret-section"],
    ),
    (ConnectionState::NoServer, &["no-connection-section"]),
    (ConnectionState::Connecting, &["connecting-section"]),
    (ConnectionState::Connected, &["connected-section"]),
];

pub const MATCH_STATE_ELEMENTS: StateElementMap<MatchState> = &[
    (MatchState::NoMatch, &["no-match-section"]),
    (MatchState::WorldGenerating, &["world-generating-section"]),
    (MatchState::WorldReady, &["world-ready-section"]),
    (MatchState::InProgress, &["in-progress-section"]),
    (MatchState::Completed, &["completed-section"]),
];

pub const MATCH_STATUS_ID: &str = "match-status";
pub const DIALOGUE_TOP_ID: &str = "dialogue-top";
pub const DIALOGUE_BOTTOM_ID: &str = "dialogue-bottom";
pub const DIALOGUE_ANIMATION_CLASS: &str = "dialogue-animate";
pub const USER_NAME_ID: &str = "user-name";

/// A state map with its identifiers resolved to handles.
#[derive(Debug, Clone)]
pub struct ProjectionTable<S> {
    groups: Vec<(S, Vec<ElementHandle>)>,
    managed: Vec<ElementHandle>,
}

impl<S: Copy + PartialEq> ProjectionTable<S> {
    pub fn resolve<V: ViewSurface + ?Sized>(map: StateElementMap<S>, surface: &V) -> Self {
        let mut groups = Vec::with_capacity(map.len());
        let mut managed = Vec::new();

        for (state, ids) in map {
            let mut handles = Vec::with_capacity(ids.len());
            for id in ids.iter() {
                match surface.resolve(id) {
                    Some(handle) => {
                        handles.push(handle);
                        if !managed.contains(&handle) {
                            managed.push(handle);
                        }
                    }
                    None => tracing::debug!(element = *id, "state element not present; skipping"),
                }
            }
            groups.push((*state, handles));
        }

        Self { groups, managed }
    }

    pub fn group(&self, state: S) -> &[ElementHandle] {
        self.groups
            .iter()
            .find(|(candidate, _)| *candidate == state)
            .map(|(_, handles)| handles.as_slice())
            .unwrap_or(&[])
    }

    /// Every handle any state in the table can show.
    pub fn managed(&self) -> &[ElementHandle] {
        &self.managed
    }

    /// Hides the whole table, then shows the group for `state`. `None` leaves
    /// everything hidden.
    pub fn project<V: ViewSurface + ?Sized>(&self, surface: &mut V, state: Option<S>) {
        for handle in &self.managed {
            surface.set_visible(*handle, false);
        }
        if let Some(state) = state {
            for handle in self.group(state) {
                surface.set_visible(*handle, true);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewBindings {
    connection: ProjectionTable<ConnectionState>,
    matches: ProjectionTable<MatchState>,
    match_status: Option<ElementHandle>,
    dialogue_top: Option<ElementHandle>,
    dialogue_bottom: Option<ElementHandle>,
    user_name: Option<ElementHandle>,
}

impl ViewBindings {
    pub fn resolve<V: ViewSurface + ?Sized>(surface: &V) -> Self {
        Self {
            connection: ProjectionTable::resolve(CONNECTION_STATE_ELEMENTS, surface),
            matches: ProjectionTable::resolve(MATCH_STATE_ELEMENTS, surface),
            match_status: surface.resolve(MATCH_STATUS_ID),
            dialogue_top: surface.resolve(DIALOGUE_TOP_ID),
            dialogue_bottom: surface.resolve(DIALOGUE_BOTTOM_ID),
            user_name: surface.resolve(USER_NAME_ID),
        }
    }

    pub fn connection(&self) -> &ProjectionTable<ConnectionState> {
        &self.connection
    }

    pub fn matches(&self) -> &ProjectionTable<MatchState> {
        &self.matches
    }
}

#[derive(Debug, Clone)]
pub struct ViewProjector {
    bindings: ViewBindings,
}

impl ViewProjector {
    pub fn new(bindings: ViewBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &ViewBindings {
        &self.bindings
    }

    /// First-load projection: no match, not connected.
    pub fn initialize<V: ViewSurface + ?Sized>(&self, surface: &mut V) {
        self.show_match_state(surface, MatchState::NoMatch);
        self.show_connection_state(surface, ConnectionState::NotConnected);
    }

    pub fn apply<V: ViewSurface + ?Sized>(&self, surface: &mut V, notification: &HostNotification) {
        match notification {
            HostNotification::ConnectionStateChanged { state } => {
                self.connection_state_changed(surface, state)
            }
            HostNotification::MatchStateChanged { state } => {
                self.match_state_changed(surface, state)
            }
            HostNotification::SetUserData { username } => self.set_user_data(surface, username),
        }
    }

    pub fn connection_state_changed<V: ViewSurface + ?Sized>(&self, surface: &mut V, state: &str) {
        tracing::info!(state, "connection state changed");
        let parsed = match state.parse::<ConnectionState>() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!("{err}; hiding all connection sections");
                None
            }
        };
        self.bindings.connection.project(surface, parsed);
    }

    pub fn show_connection_state<V: ViewSurface + ?Sized>(
        &self,
        surface: &mut V,
        state: ConnectionState,
    ) {
        self.connection_state_changed(surface, state.as_str());
    }

    pub fn match_state_changed<V: ViewSurface + ?Sized>(&self, surface: &mut V, state: &str) {
        tracing::info!(state, "match state changed");
        if let Some(status) = self.bindings.match_status {
            surface.set_text(status, state);
        }

        let parsed = match state.parse::<MatchState>() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!("{err}; skipping dialogue update");
                None
            }
        };

        if let Some(parsed) = parsed {
            let dialogue = parsed.dialogue();
            for (handle, line) in [
                (self.bindings.dialogue_top, dialogue.top),
                (self.bindings.dialogue_bottom, dialogue.bottom),
            ] {
                if let Some(handle) = handle {
                    surface.set_text(handle, line);
                    surface.replay_class(handle, DIALOGUE_ANIMATION_CLASS);
                }
            }
        }

        self.bindings.matches.project(surface, parsed);
    }

    pub fn show_match_state<V: ViewSurface + ?Sized>(&self, surface: &mut V, state: MatchState) {
        self.match_state_changed(surface, state.as_str());
    }

    pub fn set_user_data<V: ViewSurface + ?Sized>(&self, surface: &mut V, username: &str) {
        if let Some(handle) = self.bindings.user_name {
            surface.set_text(handle, &format!("Logged in as {username}"));
        }
    }
}

/// Every identifier the projector manages, in table order.
pub fn managed_element_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = Vec::new();
    let groups = CONNECTION_STATE_ELEMENTS
        .iter()
        .flat_map(|(_, group)| group.iter().copied())
        .chain(
            MATCH_STATE_ELEMENTS
                .iter()
                .flat_map(|(_, group)| group.iter().copied()),
        );
    for id in groups {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.extend([
        MATCH_STATUS_ID,
        DIALOGUE_TOP_ID,
        DIALOGUE_BOTTOM_ID,
        USER_NAME_ID,
    ]);
    ids
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
