use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownStateError;

macro_rules! wire_enum {
    ($name:ident, $category:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStateError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownStateError::new($category, other)),
                }
            }
        }
    };
}

wire_enum!(ConnectionState, "connection", {
    NotConnected => "not_connected",
    NoServer => "no_server",
    Connecting => "connecting",
    Connected => "connected",
});

wire_enum!(MatchState, "match", {
    NoMatch => "no_match",
    WorldGenerating => "world_generating",
    WorldReady => "world_ready",
    InProgress => "in_progress",
    Completed => "completed",
});

wire_enum!(WebsitePage, "website page", {
    Home => "home",
    Leaderboard => "leaderboard",
    Profile => "profile",
    Matches => "matches",
});

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::NotConnected
    }
}

impl Default for MatchState {
    fn default() -> Self {
        MatchState::NoMatch
    }
}

impl WebsitePage {
    /// Path appended to the configured site url.
    pub fn path(self) -> &'static str {
        match self {
            WebsitePage::Home => "/",
            WebsitePage::Leaderboard => "/leaderboard",
            WebsitePage::Profile => "/profile",
            WebsitePage::Matches => "/matches",
        }
    }
}

/// Which install folder a path refers to. The host bridge historically
/// carried this as an `isDediPath` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    DedicatedServer,
    Cluster,
}

impl PathKind {
    pub fn from_is_dedi_path(is_dedi_path: bool) -> Self {
        if is_dedi_path {
            PathKind::DedicatedServer
        } else {
            PathKind::Cluster
        }
    }

    pub fn is_dedi_path(self) -> bool {
        self == PathKind::DedicatedServer
    }

    /// Files that must exist below a folder of this kind, relative to it.
    pub fn required_files(self) -> &'static [&'static str] {
        match self {
            PathKind::DedicatedServer => &[
                "mods/dedicated_server_mods_setup.lua",
                "bin64/dontstarve_dedicated_server_nullrenderer_x64.exe",
            ],
            PathKind::Cluster => &["client_log.txt", "master_server_log.txt"],
        }
    }
}

/// Narrative lines shown while a match is in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialoguePair {
    pub top: &'static str,
    pub bottom: &'static str,
}

impl MatchState {
    pub fn dialogue(self) -> DialoguePair {
        match self {
            MatchState::NoMatch => DialoguePair {
                top: "The Constant is quiet for now.",
                bottom: "Queue up on the website when you are ready.",
            },
            MatchState::WorldGenerating => DialoguePair {
                top: "Something is stirring beneath the surface...",
                bottom: "Your world is being generated.",
            },
            MatchState::WorldReady => DialoguePair {
                top: "The world awaits.",
                bottom: "Join your server before the others do.",
            },
            MatchState::InProgress => DialoguePair {
                top: "Don't starve.",
                bottom: "The match is live. Every day counts.",
            },
            MatchState::Completed => DialoguePair {
                top: "Your run has ended.",
                bottom: "Waiting for the other survivors to finish.",
            },
        }
    }
}
