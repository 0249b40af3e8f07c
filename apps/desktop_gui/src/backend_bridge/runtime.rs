//! Runtime bridge between the UI command queue and the loopback host.

use std::thread;

use client_core::HostRequest;
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::{HostEnvironment, LoopbackHost, SystemEnvironment},
    config::Settings,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

pub fn launch(host_rx: Receiver<HostRequest>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::HostStartup,
                    format!("host worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build host runtime: {err}");
                return;
            }
        };

        let host = LoopbackHost::new(settings, SystemEnvironment, ui_tx);
        runtime.block_on(run_host_loop(host, host_rx));
    });
}

/// Publishes the host snapshot, then handles and acknowledges requests until
/// every sender is gone.
pub async fn run_host_loop<E: HostEnvironment>(
    mut host: LoopbackHost<E>,
    host_rx: Receiver<HostRequest>,
) {
    host.publish_snapshot();
    host.info("Host ready");

    while let Ok(request) = host_rx.recv() {
        let command = request.command.clone();
        let method = command.method_name();
        tracing::info!(method, "host: handling command");
        let reply = host.handle(command).await;
        if let Err(err) = &reply {
            tracing::warn!(method, "host: command failed: {err}");
        }
        request.acknowledge(reply);
    }
    tracing::info!(
        connection = %host.state().connection_state(),
        match_state = %host.state().match_state(),
        "host: command queue closed; shutting down"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::Duration};

    use client_core::{ChannelBridge, HostBridge};
    use crossbeam_channel::bounded;
    use shared::{
        domain::PathKind,
        error::BridgeError,
        protocol::{HostCommand, HostNotification},
    };

    /// Folder picker that stays open until the test releases it.
    struct GatedPicker {
        release: Receiver<()>,
    }

    impl HostEnvironment for GatedPicker {
        fn open_url(&self, _url: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn pick_folder(&self, _kind: PathKind) -> Option<PathBuf> {
            self.release.recv_timeout(Duration::from_secs(5)).ok()?;
            Some(PathBuf::from("/games/DoNotStarveTogether"))
        }
    }

    fn gated_host() -> (LoopbackHost<GatedPicker>, Sender<()>, Receiver<UiEvent>) {
        let (release_tx, release_rx) = bounded(1);
        let (ui_tx, ui_rx) = bounded(64);
        let host = LoopbackHost::new(
            Settings::default(),
            GatedPicker {
                release: release_rx,
            },
            ui_tx,
        );
        (host, release_tx, ui_rx)
    }

    #[tokio::test]
    async fn snapshot_comes_first_and_every_request_is_acknowledged() {
        let (host, _release, ui_rx) = gated_host();
        let (host_tx, host_rx) = bounded(16);
        let bridge = ChannelBridge::new(host_tx);

        let test = bridge.invoke(HostCommand::TestButton).expect("queued");
        let start = bridge.invoke(HostCommand::StartServer).expect("queued");
        let stop = bridge.invoke(HostCommand::StopServer).expect("queued");
        drop(bridge);

        run_host_loop(host, host_rx).await;

        assert_eq!(test.acknowledged().await, Ok(()));
        assert!(matches!(
            start.acknowledged().await,
            Err(BridgeError::Rejected { method, message })
                if method == "start_server_button" && message == "dedicated server path not set"
        ));
        assert_eq!(stop.acknowledged().await, Ok(()));

        let first: Vec<UiEvent> = ui_rx.try_iter().take(4).collect();
        assert!(matches!(
            first.as_slice(),
            [
                UiEvent::Notification(HostNotification::ConnectionStateChanged { .. }),
                UiEvent::Notification(HostNotification::MatchStateChanged { .. }),
                UiEvent::Notification(HostNotification::SetUserData { .. }),
                UiEvent::Info(ready),
            ] if ready == "Host ready"
        ));
    }

    #[tokio::test]
    async fn open_folder_picker_does_not_hold_up_later_commands() {
        let (host, release, ui_rx) = gated_host();
        let (host_tx, host_rx) = bounded(16);
        let bridge = ChannelBridge::new(host_tx);

        let picker = bridge
            .invoke(HostCommand::OpenFileExplorer {
                kind: PathKind::Cluster,
            })
            .expect("queued");
        let test = bridge.invoke(HostCommand::TestButton).expect("queued");
        drop(bridge);

        run_host_loop(host, host_rx).await;

        assert_eq!(picker.acknowledged().await, Ok(()));
        assert_eq!(test.acknowledged().await, Ok(()));
        assert!(!ui_rx
            .try_iter()
            .any(|event| matches!(event, UiEvent::PathPicked { .. })));

        release.send(()).expect("picker waiting");
        let picked = loop {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("picked path") {
                UiEvent::PathPicked { kind, path } => break (kind, path),
                _ => continue,
            }
        };
        assert_eq!(picked.0, PathKind::Cluster);
        assert_eq!(picked.1, "/games/DoNotStarveTogether");
    }
}
