use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures::stream::StreamExt;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::channel::Outbound;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection with the given close code
    async fn close(&mut self, code: u16, reason: String) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message; the returned frame is sent straight back to the client
    async fn handle_message(&self, user_id: &str, room_id: &str, message: String)
        -> Option<String>;
}

#[derive(Debug)]
pub enum SocketError {
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // binary and protocol ping/pong
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self, code: u16, reason: String) -> Result<(), SocketError> {
        self.send(Message::Close(Some(CloseFrame {
            code,
            reason: Cow::Owned(reason),
        })))
        .await
        .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents a managed WebSocket connection.
/// Frames queued on the hub's channel are written out; client frames go to the handler.
pub struct Connection {
    pub user_id: String,
    pub room_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<Outbound>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        user_id: String,
        room_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<Outbound>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            user_id,
            room_id,
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Queued frames first so a pending close is flushed before reading
                biased;

                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(Outbound::Text(message)) => {
                            self.socket.send_message(message).await?
                        }
                        Some(Outbound::Close { code, reason }) => {
                            let _ = self.socket.close(code, reason).await;
                            return Ok(());
                        }
                        None => break, // Channel closed, disconnect
                    }
                }

                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => {
                            let reply = self
                                .message_handler
                                .handle_message(&self.user_id, &self.room_id, message)
                                .await;
                            if let Some(reply) = reply {
                                self.socket.send_message(reply).await?;
                            }
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close(1000, String::new()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded {
        sent: Vec<String>,
        closed_with: Option<u16>,
    }

    struct ScriptedSocket {
        incoming: VecDeque<String>,
        recorded: Arc<Mutex<Recorded>>,
    }

    #[async_trait]
    impl SocketWrapper for ScriptedSocket {
        async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
            self.recorded.lock().unwrap().sent.push(message);
            Ok(())
        }

        async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
            match self.incoming.pop_front() {
                Some(message) => Ok(Some(message)),
                None => {
                    // Client stays silent once its script is exhausted
                    futures::future::pending::<()>().await;
                    Ok(None)
                }
            }
        }

        async fn close(&mut self, code: u16, _reason: String) -> Result<(), SocketError> {
            self.recorded.lock().unwrap().closed_with = Some(code);
            Ok(())
        }
    }

    struct Echo;

    #[async_trait]
    impl MessageHandler for Echo {
        async fn handle_message(&self, _user: &str, _room: &str, message: String) -> Option<String> {
            Some(format!("echo:{}", message))
        }
    }

    #[tokio::test]
    async fn test_queued_close_is_flushed() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let socket = ScriptedSocket {
            incoming: VecDeque::from(vec!["hi".to_string()]),
            recorded: recorded.clone(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Outbound::Close {
            code: 4001,
            reason: "Invalid token".to_string(),
        })
        .unwrap();

        let connection = Connection::new("u1".into(), "r1".into(), Box::new(socket), rx, Arc::new(Echo));
        connection.run().await.unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.closed_with, Some(4001));
        assert!(recorded.sent.is_empty());
    }

    #[tokio::test]
    async fn test_replies_and_outbound_frames_are_sent() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let socket = ScriptedSocket {
            incoming: VecDeque::from(vec!["ping".to_string()]),
            recorded: recorded.clone(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Outbound::Text("hello".to_string())).unwrap();

        let connection = Connection::new("u1".into(), "r1".into(), Box::new(socket), rx, Arc::new(Echo));
        let task = tokio::spawn(connection.run());

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        drop(tx);
        task.await.unwrap().unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.sent, vec!["hello".to_string(), "echo:ping".to_string()]);
        assert_eq!(recorded.closed_with, Some(1000));
    }
}
