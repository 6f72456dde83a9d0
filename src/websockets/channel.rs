use tokio::sync::mpsc;
use uuid::Uuid;

/// Frames queued for a single client connection
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text(String),
    Close { code: u16, reason: String },
}

/// Sending half of one live client connection, identified by a unique id
#[derive(Debug, Clone)]
pub struct ClientChannel {
    id: Uuid,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ClientChannel {
    /// Creates a channel and the receiver its socket task drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            id: Uuid::new_v4(),
            sender,
        };
        (channel, receiver)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues a text frame; false once the socket task has gone away
    pub fn send_text(&self, text: String) -> bool {
        self.sender.send(Outbound::Text(text)).is_ok()
    }

    pub fn close(&self, code: u16, reason: impl Into<String>) -> bool {
        self.sender
            .send(Outbound::Close {
                code,
                reason: reason.into(),
            })
            .is_ok()
    }
}
