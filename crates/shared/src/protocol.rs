use serde::{Deserialize, Serialize};

use crate::domain::{PathKind, WebsitePage};

/// Commands the UI sends to the host, one per host method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
pub enum HostCommand {
    TestButton,
    #[serde(alias = "save_klei_secret")]
    SaveProxySecret {
        secret: String,
    },
    #[serde(rename = "start_server_button")]
    StartServer,
    #[serde(rename = "stop_server_button")]
    StopServer,
    LoginClicked {
        username: String,
        password: String,
    },
    #[serde(rename = "logout_button")]
    Logout,
    OpenWebsite {
        page: WebsitePage,
    },
    #[serde(rename = "open_file_explorer_ui")]
    OpenFileExplorer {
        #[serde(rename = "is_dedi_path", with = "is_dedi_path")]
        kind: PathKind,
    },
    #[serde(alias = "submit_dedi_path")]
    SubmitPath {
        path: String,
        #[serde(rename = "is_dedi_path", with = "is_dedi_path")]
        kind: PathKind,
    },
}

impl HostCommand {
    pub fn method_name(&self) -> &'static str {
        match self {
            HostCommand::TestButton => "test_button",
            HostCommand::SaveProxySecret { .. } => "save_proxy_secret",
            HostCommand::StartServer => "start_server_button",
            HostCommand::StopServer => "stop_server_button",
            HostCommand::LoginClicked { .. } => "login_clicked",
            HostCommand::Logout => "logout_button",
            HostCommand::OpenWebsite { .. } => "open_website",
            HostCommand::OpenFileExplorer { .. } => "open_file_explorer_ui",
            HostCommand::SubmitPath { .. } => "submit_path",
        }
    }
}

/// Notifications the host pushes to the view. State values stay raw strings
/// so the view can log and tolerate values it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args")]
pub enum HostNotification {
    #[serde(rename = "connectionStateChanged")]
    ConnectionStateChanged { state: String },
    #[serde(rename = "matchStateChanged")]
    MatchStateChanged { state: String },
    #[serde(rename = "setUserData")]
    SetUserData { username: String },
}

mod is_dedi_path {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::PathKind;

    pub fn serialize<S: Serializer>(kind: &PathKind, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(kind.is_dedi_path())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathKind, D::Error> {
        bool::deserialize(deserializer).map(PathKind::from_is_dedi_path)
    }
}
