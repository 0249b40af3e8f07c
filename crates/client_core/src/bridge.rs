//! UI side of the host bridge: commands go out, acknowledgements come back.

use crossbeam_channel::{Sender, TrySendError};
use shared::{error::BridgeError, protocol::HostCommand};
use tokio::sync::oneshot;

/// What the host answers for a command: `Err` carries its rejection message.
pub type HostReply = Result<(), String>;

pub trait HostBridge {
    /// Starts the call immediately. The returned handle may be awaited or dropped.
    fn invoke(&self, command: HostCommand) -> Result<HostCall, BridgeError>;
}

/// Pending acknowledgement of one host call.
#[derive(Debug)]
pub struct HostCall {
    method: &'static str,
    reply: oneshot::Receiver<HostReply>,
}

impl HostCall {
    pub fn pending(method: &'static str) -> (Self, oneshot::Sender<HostReply>) {
        let (tx, rx) = oneshot::channel();
        (Self { method, reply: rx }, tx)
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub async fn acknowledged(self) -> Result<(), BridgeError> {
        let Self { method, reply } = self;
        match reply.await {
            Ok(reply) => reply_result(method, reply),
            Err(_) => Err(BridgeError::Dropped),
        }
    }

    /// Non-blocking check for a reply; `None` while the host is still working.
    pub fn try_acknowledged(&mut self) -> Option<Result<(), BridgeError>> {
        match self.reply.try_recv() {
            Ok(reply) => Some(reply_result(self.method, reply)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(BridgeError::Dropped)),
        }
    }
}

fn reply_result(method: &'static str, reply: HostReply) -> Result<(), BridgeError> {
    reply.map_err(|message| BridgeError::Rejected {
        method: method.to_string(),
        message,
    })
}

/// A command as received by the host worker, with its reply slot.
#[derive(Debug)]
pub struct HostRequest {
    pub command: HostCommand,
    reply: oneshot::Sender<HostReply>,
}

impl HostRequest {
    pub fn new(command: HostCommand, reply: oneshot::Sender<HostReply>) -> Self {
        Self { command, reply }
    }

    pub fn acknowledge(self, reply: HostReply) {
        // The UI is free to drop the call handle; nobody to tell then.
        let _ = self.reply.send(reply);
    }
}

/// Bridge over a bounded crossbeam queue drained by the host worker thread.
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    tx: Sender<HostRequest>,
}

impl ChannelBridge {
    pub fn new(tx: Sender<HostRequest>) -> Self {
        Self { tx }
    }
}

impl HostBridge for ChannelBridge {
    fn invoke(&self, command: HostCommand) -> Result<HostCall, BridgeError> {
        let method = command.method_name();
        let (call, reply) = HostCall::pending(method);
        match self.tx.try_send(HostRequest::new(command, reply)) {
            Ok(()) => {
                tracing::debug!(method, "queued ui->host command");
                Ok(call)
            }
            Err(TrySendError::Full(_)) => Err(BridgeError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(BridgeError::Disconnected),
        }
    }
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
