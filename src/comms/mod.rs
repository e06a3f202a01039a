// src/comms/mod.rs - Command channel capability for talking to machines

pub mod recording;

pub use recording::{ChannelOp, RecordingChannel};

use async_trait::async_trait;
use thiserror::Error;

/// Failure raised by any of the channel primitives.
#[derive(Debug, Error)]
pub enum CommsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("channel closed")]
    Closed,
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Ordered, byte/line-oriented duplex link to one physical machine.
///
/// The host owns the channel and lends it to a plugin for the duration of a
/// single call. Plugins must not hold on to a channel across calls.
///
/// All four primitives are suspension points and carry no deadline of their
/// own. `receive_string` and `read_until` pend until the machine produces
/// the requested data. Callers that need a bound wrap the call in
/// `tokio::time::timeout`; cancelling is dropping the future.
///
/// A channel supports at most one in-flight operation at a time. The
/// `&mut self` receivers make that discipline structural; a host sharing a
/// channel between tasks has to serialize access itself.
#[async_trait]
pub trait CommandChannel: Send {
    /// Write `text` to the machine. Returns the number of bytes written.
    async fn send_string(&mut self, text: &str) -> Result<usize, CommsError>;

    /// Receive the next newline-terminated line from the machine.
    ///
    /// The line is returned as the transport delivered it, trailing newline
    /// included. Callers that want the payload trim it themselves.
    async fn receive_string(&mut self) -> Result<String, CommsError>;

    /// Receive text up to the next occurrence of `terminator`.
    ///
    /// The terminator is consumed from the stream but not included in the
    /// returned text.
    async fn read_until(&mut self, terminator: char) -> Result<String, CommsError>;

    /// Run the protocol-specific synchronization handshake.
    ///
    /// Protocols without a handshake implement this as a no-op returning
    /// `Ok(())`.
    async fn synch(&mut self) -> Result<(), CommsError>;
}
