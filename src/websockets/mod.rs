// Public API
pub use channel::{ClientChannel, Outbound};
pub use handler::websocket_handler;
pub use hub::{
    ConnectionHub, HubError, InMemoryConnectionHub, AUTH_REJECTED_CLOSE_CODE,
    SUPERSEDED_CLOSE_CODE,
};
pub use messages::{ClientMessage, ServerEvent};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod channel;
mod control;
mod handler;
mod hub;
mod messages;
mod socket;
