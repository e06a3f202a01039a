// src/comms/recording.rs - In-memory recording channel for driver tests

use std::collections::VecDeque;

use async_trait::async_trait;

use super::{CommandChannel, CommsError};

/// One recorded channel interaction, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOp {
    Send(String),
    Receive,
    ReadUntil(char),
    Synch,
}

/// Scripted, recording `CommandChannel` with no hardware behind it.
///
/// Outgoing commands are logged; incoming data is served from a response
/// queue filled by the test. Queue entries may be errors, which lets a test
/// drive a driver into its communication failure paths.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    ops: Vec<ChannelOp>,
    sent: Vec<String>,
    responses: VecDeque<Result<String, CommsError>>,
    synch_failures: VecDeque<CommsError>,
    synch_count: usize,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `receive_string` or `read_until`.
    pub fn push_response(&mut self, text: impl Into<String>) {
        self.responses.push_back(Ok(text.into()));
    }

    /// Queue a failure for the next `receive_string` or `read_until`.
    pub fn push_error(&mut self, err: CommsError) {
        self.responses.push_back(Err(err));
    }

    /// Make the next `synch` call fail with `err`.
    pub fn fail_next_synch(&mut self, err: CommsError) {
        self.synch_failures.push_back(err);
    }

    /// Every operation performed on the channel, in call order.
    pub fn ops(&self) -> &[ChannelOp] {
        &self.ops
    }

    /// Texts passed to `send_string`, in call order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// All sent texts concatenated, for whole-session comparisons.
    pub fn joined(&self) -> String {
        self.sent.concat()
    }

    pub fn synch_count(&self) -> usize {
        self.synch_count
    }

    fn next_response(&mut self) -> Result<String, CommsError> {
        // An exhausted script reads as the machine going away.
        self.responses.pop_front().unwrap_or(Err(CommsError::Closed))
    }
}

#[async_trait]
impl CommandChannel for RecordingChannel {
    async fn send_string(&mut self, text: &str) -> Result<usize, CommsError> {
        tracing::debug!("channel TX: {}", text.trim_end());
        self.ops.push(ChannelOp::Send(text.to_string()));
        self.sent.push(text.to_string());
        Ok(text.len())
    }

    async fn receive_string(&mut self) -> Result<String, CommsError> {
        self.ops.push(ChannelOp::Receive);
        let line = self.next_response()?;
        tracing::debug!("channel RX: {}", line.trim_end());
        // A line-oriented transport only hands over completed lines.
        if line.ends_with('\n') {
            Ok(line)
        } else {
            Ok(format!("{line}\n"))
        }
    }

    async fn read_until(&mut self, terminator: char) -> Result<String, CommsError> {
        self.ops.push(ChannelOp::ReadUntil(terminator));
        let text = self.next_response()?;
        tracing::debug!("channel RX (until {:?}): {}", terminator, text);
        match text.find(terminator) {
            Some(pos) => Ok(text[..pos].to_string()),
            None => Ok(text),
        }
    }

    async fn synch(&mut self) -> Result<(), CommsError> {
        self.ops.push(ChannelOp::Synch);
        self.synch_count += 1;
        match self.synch_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
