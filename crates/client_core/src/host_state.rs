//! Host-side record of the state the view mirrors.
//!
//! Setters hand back the notification to push to the view, and only when the
//! value actually changed.

use shared::{
    domain::{ConnectionState, MatchState},
    protocol::HostNotification,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub match_id: Option<String>,
    pub proxy_secret: Option<String>,
    pub dedi_path: Option<String>,
    pub cluster_path: Option<String>,
}

/// Partial update to [`UserData`]; `None` fields are left untouched unless
/// the update overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDataUpdate {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub match_id: Option<String>,
    pub proxy_secret: Option<String>,
    pub dedi_path: Option<String>,
    pub cluster_path: Option<String>,
}

impl UserDataUpdate {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HostState {
    connection: ConnectionState,
    match_state: MatchState,
    user: UserData,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    pub fn match_state(&self) -> MatchState {
        self.match_state
    }

    pub fn user_data(&self) -> &UserData {
        &self.user
    }

    pub fn set_connection_state(&mut self, state: ConnectionState) -> Option<HostNotification> {
        if self.connection == state {
            return None;
        }
        tracing::info!(from = %self.connection, to = %state, "changing connection state");
        self.connection = state;
        Some(HostNotification::ConnectionStateChanged {
            state: state.as_str().to_string(),
        })
    }

    pub fn set_match_state(&mut self, state: MatchState) -> Option<HostNotification> {
        if self.match_state == state {
            return None;
        }
        tracing::info!(from = %self.match_state, to = %state, "changing match state");
        self.match_state = state;
        Some(HostNotification::MatchStateChanged {
            state: state.as_str().to_string(),
        })
    }

    /// Merges `update` into the user data, or replaces it wholesale when
    /// `overwrite` is set. The view hears about it when the username is part
    /// of the change.
    pub fn set_user_data(
        &mut self,
        update: UserDataUpdate,
        overwrite: bool,
    ) -> Option<HostNotification> {
        if overwrite {
            self.user = UserData::default();
        }
        let username_touched = overwrite || update.username.is_some();

        let UserDataUpdate {
            user_id,
            username,
            match_id,
            proxy_secret,
            dedi_path,
            cluster_path,
        } = update;
        merge(&mut self.user.user_id, user_id);
        merge(&mut self.user.username, username);
        merge(&mut self.user.match_id, match_id);
        merge(&mut self.user.proxy_secret, proxy_secret);
        merge(&mut self.user.dedi_path, dedi_path);
        merge(&mut self.user.cluster_path, cluster_path);

        username_touched.then(|| HostNotification::SetUserData {
            username: self.user.username.clone().unwrap_or_default(),
        })
    }

    /// Notifications that bring a freshly loaded view up to date.
    pub fn snapshot(&self) -> Vec<HostNotification> {
        vec![
            HostNotification::ConnectionStateChanged {
                state: self.connection.as_str().to_string(),
            },
            HostNotification::MatchStateChanged {
                state: self.match_state.as_str().to_string(),
            },
            HostNotification::SetUserData {
                username: self.user.username.clone().unwrap_or_default(),
            },
        ]
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_state_changes_are_silent() {
        let mut state = HostState::new();
        assert_eq!(state.set_connection_state(ConnectionState::NotConnected), None);
        assert_eq!(
            state.set_connection_state(ConnectionState::Connecting),
            Some(HostNotification::ConnectionStateChanged {
                state: "connecting".into()
            })
        );
        assert_eq!(state.set_connection_state(ConnectionState::Connecting), None);

        assert_eq!(state.set_match_state(MatchState::NoMatch), None);
        assert!(state.set_match_state(MatchState::WorldReady).is_some());
        assert_eq!(state.match_state(), MatchState::WorldReady);
    }

    #[test]
    fn user_data_merges_and_reports_username() {
        let mut state = HostState::new();
        let secret_only = UserDataUpdate {
            proxy_secret: Some("s3cret".into()),
            ..UserDataUpdate::default()
        };
        assert_eq!(state.set_user_data(secret_only, false), None);

        assert_eq!(
            state.set_user_data(UserDataUpdate::username("wendy"), false),
            Some(HostNotification::SetUserData {
                username: "wendy".into()
            })
        );
        assert_eq!(state.user_data().proxy_secret.as_deref(), Some("s3cret"));
        assert_eq!(state.user_data().username.as_deref(), Some("wendy"));
    }

    #[test]
    fn overwrite_clears_everything_and_reports_empty_name() {
        let mut state = HostState::new();
        state.set_user_data(
            UserDataUpdate {
                username: Some("wx78".into()),
                dedi_path: Some("/srv/dst".into()),
                ..UserDataUpdate::default()
            },
            false,
        );

        assert_eq!(
            state.set_user_data(UserDataUpdate::default(), true),
            Some(HostNotification::SetUserData {
                username: String::new()
            })
        );
        assert_eq!(state.user_data(), &UserData::default());
    }

    #[test]
    fn snapshot_reflects_current_values() {
        let mut state = HostState::new();
        state.set_match_state(MatchState::InProgress);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot[1],
            HostNotification::MatchStateChanged {
                state: "in_progress".into()
            }
        );
    }
}
