use super::*;
use std::cell::RefCell;

use crate::{
    bridge::HostReply,
    projector::{managed_element_ids, ViewBindings, USER_NAME_ID},
    view::ElementTree,
};
use shared::error::BridgeError;
use tokio::sync::oneshot;

#[derive(Default)]
struct RecordingBridge {
    commands: RefCell<Vec<HostCommand>>,
    replies: RefCell<Vec<oneshot::Sender<HostReply>>>,
    fail_with: Option<BridgeError>,
}

impl RecordingBridge {
    fn failing(err: BridgeError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    fn commands(&self) -> Vec<HostCommand> {
        self.commands.borrow().clone()
    }
}

impl HostBridge for RecordingBridge {
    fn invoke(&self, command: HostCommand) -> Result<HostCall, BridgeError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let (call, reply) = HostCall::pending(command.method_name());
        self.commands.borrow_mut().push(command);
        self.replies.borrow_mut().push(reply);
        Ok(call)
    }
}

struct Harness {
    tree: ElementTree,
    projector: ViewProjector,
    dispatcher: ActionDispatcher,
    bridge: Arc<RecordingBridge>,
}

fn harness_with(bridge: RecordingBridge, cooldown: Duration) -> Harness {
    let mut ids = managed_element_ids();
    ids.push(LOGIN_BUTTON_ID);
    let tree = ElementTree::with_elements(ids);
    let projector = ViewProjector::new(ViewBindings::resolve(&tree));
    let mut dispatcher = ActionDispatcher::new(&tree, cooldown);
    let bridge = Arc::new(bridge);
    dispatcher.attach_bridge(bridge.clone());
    Harness {
        tree,
        projector,
        dispatcher,
        bridge,
    }
}

fn harness() -> Harness {
    harness_with(RecordingBridge::default(), DEFAULT_LOGIN_COOLDOWN)
}

#[test]
fn missing_bridge_aborts_every_action() {
    let tree = ElementTree::with_elements([LOGIN_BUTTON_ID]);
    let mut surface = tree.clone();
    let mut dispatcher = ActionDispatcher::new(&tree, DEFAULT_LOGIN_COOLDOWN);

    assert!(!dispatcher.has_bridge());
    assert!(dispatcher.test_button().is_none());
    assert!(dispatcher.save_proxy_secret("secret").is_none());
    assert!(dispatcher.start_server().is_none());
    assert!(dispatcher
        .login_clicked(&mut surface, "wilson", "science")
        .is_none());
    assert!(!dispatcher.is_login_locked());
    assert!(surface
        .get(LOGIN_BUTTON_ID)
        .expect("button")
        .is_interactive());
}

#[test]
fn simple_buttons_forward_one_command_each() {
    let h = harness();
    assert!(h.dispatcher.test_button().is_some());
    assert!(h.dispatcher.start_server().is_some());
    assert!(h.dispatcher.stop_server().is_some());
    assert!(h.dispatcher.open_file_explorer(PathKind::Cluster).is_some());

    assert_eq!(
        h.bridge.commands(),
        vec![
            HostCommand::TestButton,
            HostCommand::StartServer,
            HostCommand::StopServer,
            HostCommand::OpenFileExplorer {
                kind: PathKind::Cluster
            },
        ]
    );
}

#[test]
fn blank_inputs_never_reach_the_host() {
    let mut h = harness();
    assert!(h.dispatcher.save_proxy_secret("").is_none());
    assert!(h.dispatcher.save_proxy_secret("   \t").is_none());
    assert!(h
        .dispatcher
        .submit_path("  ", PathKind::DedicatedServer)
        .is_none());
    assert!(h
        .dispatcher
        .login_clicked(&mut h.tree, " ", "password")
        .is_none());
    assert!(h
        .dispatcher
        .login_clicked(&mut h.tree, "wilson", "\n")
        .is_none());

    assert!(h.bridge.commands().is_empty());
    assert!(!h.dispatcher.is_login_locked());
}

#[test]
fn inputs_are_trimmed_before_forwarding() {
    let h = harness();
    h.dispatcher.save_proxy_secret("  abc123 ");
    h.dispatcher
        .submit_path(" C:/Steam/Don't Starve Together Dedicated Server ", PathKind::DedicatedServer);

    assert_eq!(
        h.bridge.commands(),
        vec![
            HostCommand::SaveProxySecret {
                secret: "abc123".into()
            },
            HostCommand::SubmitPath {
                path: "C:/Steam/Don't Starve Together Dedicated Server".into(),
                kind: PathKind::DedicatedServer,
            },
        ]
    );
}

#[test]
fn website_page_must_be_in_allowed_set() {
    let h = harness();
    assert!(h.dispatcher.open_website("casino").is_none());
    assert!(h.dispatcher.open_website("").is_none());
    assert!(h.dispatcher.open_website("leaderboard").is_some());

    assert_eq!(
        h.bridge.commands(),
        vec![HostCommand::OpenWebsite {
            page: WebsitePage::Leaderboard
        }]
    );
}

#[test]
fn login_within_cooldown_is_dispatched_once() {
    let mut h = harness();
    let start = Instant::now();

    assert!(h
        .dispatcher
        .login_clicked_at(&mut h.tree, "wilson", "science", start)
        .is_some());
    assert!(h
        .dispatcher
        .login_clicked_at(
            &mut h.tree,
            "wilson",
            "science",
            start + Duration::from_secs(2)
        )
        .is_none());
    assert_eq!(h.bridge.commands().len(), 1);

    let button = h.tree.get(LOGIN_BUTTON_ID).expect("button");
    assert!(!button.is_interactive());
    assert!(button.opacity() < 1.0);
}

#[test]
fn login_is_accepted_again_after_cooldown() {
    let mut h = harness();
    let start = Instant::now();

    h.dispatcher
        .login_clicked_at(&mut h.tree, "wilson", "science", start);
    let after = start + DEFAULT_LOGIN_COOLDOWN;

    assert!(h.dispatcher.poll_login_cooldown_at(&mut h.tree, after));
    assert!(h
        .tree
        .get(LOGIN_BUTTON_ID)
        .expect("button")
        .is_interactive());
    assert!(h
        .dispatcher
        .login_clicked_at(&mut h.tree, "wilson", "science", after)
        .is_some());
    assert_eq!(h.bridge.commands().len(), 2);
}

#[test]
fn cooldown_expiry_allows_login_without_polling() {
    let mut h = harness_with(RecordingBridge::default(), Duration::from_millis(200));
    let start = Instant::now();

    h.dispatcher
        .login_clicked_at(&mut h.tree, "wilson", "science", start);
    assert!(h
        .dispatcher
        .login_clicked_at(
            &mut h.tree,
            "wilson",
            "science",
            start + Duration::from_millis(250)
        )
        .is_some());
    assert_eq!(h.bridge.commands().len(), 2);
}

#[test]
fn polling_before_expiry_keeps_control_disabled() {
    let mut h = harness();
    let start = Instant::now();
    h.dispatcher
        .login_clicked_at(&mut h.tree, "wilson", "science", start);

    assert!(!h
        .dispatcher
        .poll_login_cooldown_at(&mut h.tree, start + Duration::from_secs(1)));
    assert!(!h
        .tree
        .get(LOGIN_BUTTON_ID)
        .expect("button")
        .is_interactive());
}

#[test]
fn failed_login_dispatch_does_not_lock() {
    let mut h = harness_with(
        RecordingBridge::failing(BridgeError::QueueFull),
        DEFAULT_LOGIN_COOLDOWN,
    );
    assert!(h
        .dispatcher
        .login_clicked(&mut h.tree, "wilson", "science")
        .is_none());
    assert!(!h.dispatcher.is_login_locked());
    assert!(h
        .tree
        .get(LOGIN_BUTTON_ID)
        .expect("button")
        .is_interactive());
}

#[test]
fn logout_resets_indicators_optimistically() {
    let mut h = harness();
    h.projector.show_connection_state(&mut h.tree, ConnectionState::Connected);
    h.projector.show_match_state(&mut h.tree, MatchState::InProgress);
    h.projector.set_user_data(&mut h.tree, "Wigfrid");

    assert!(h.dispatcher.logout(&h.projector, &mut h.tree).is_some());

    assert_eq!(h.bridge.commands(), vec![HostCommand::Logout]);
    assert!(h.tree.is_visible("login-section"));
    assert!(!h.tree.is_visible("connected-section"));
    assert!(h.tree.is_visible("no-match-section"));
    assert!(!h.tree.is_visible("in-progress-section"));
    assert_eq!(h.tree.text(USER_NAME_ID), Some("Logged in as "));
}

#[test]
fn detached_bridge_stops_dispatch() {
    let mut h = harness();
    h.dispatcher.detach_bridge();
    assert!(h.dispatcher.logout(&h.projector, &mut h.tree).is_none());
    assert!(h.bridge.commands().is_empty());
}

#[test]
fn login_lock_tracks_its_own_window() {
    let mut lock = LoginLock::new(Duration::from_secs(5));
    let start = Instant::now();

    assert!(!lock.is_locked(start));
    assert!(lock.try_lock(start));
    assert!(!lock.try_lock(start + Duration::from_secs(4)));
    assert!(!lock.release_if_expired(start + Duration::from_secs(4)));
    assert!(lock.release_if_expired(start + Duration::from_secs(5)));
    assert!(!lock.release_if_expired(start + Duration::from_secs(6)));
    assert_eq!(LoginLock::default().cooldown(), DEFAULT_LOGIN_COOLDOWN);
}
