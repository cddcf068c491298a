//! Forward messages to a crossbeam channel

use crate::core::{LoggerError, Message, Result, Sink};
use crossbeam_channel::{Receiver, Sender};

/// Clones each message into a channel, e.g. for a test or a UI thread.
///
/// Uses `send`, so a bounded channel that fills up stalls the worker.
pub struct ChannelSink {
    name: String,
    sender: Sender<Message>,
}

impl ChannelSink {
    pub fn new(name: impl Into<String>, sender: Sender<Message>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Sink plus the receiving end of a fresh unbounded channel
    pub fn unbounded(name: impl Into<String>) -> (Self, Receiver<Message>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(name, sender), receiver)
    }
}

impl Sink for ChannelSink {
    fn receive(&mut self, message: &Message) -> Result<()> {
        self.sender
            .send(message.clone())
            .map_err(|_| LoggerError::SinkDisconnected(self.name.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
