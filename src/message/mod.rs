//! The Message Model: the closed, typed set of frontend and backend
//! messages exchanged over a PostgreSQL v3 connection, and their bit-exact
//! encode/decode contracts.

pub mod backend;
pub mod error;
pub mod format;
pub mod frontend;
pub mod password;
pub mod ssl;

pub use backend::{BackendMessage, BackendProtocol};
pub use error::ProtocolError;
pub use format::{FieldFormats, Format};
pub use frontend::{FrontendMessage, Target};
pub use password::Password;
pub use ssl::SslReply;
