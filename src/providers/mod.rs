//! Chat backend implementations.
//!
//! Two backend shapes exist: a local inference server and a remote hosted
//! chat-completion API. Configuration selects one of them at startup.

pub mod http;
pub mod local;
pub mod remote;
pub mod traits;

pub use http::DEFAULT_TIMEOUT;
pub use local::LocalChatBackend;
pub use remote::RemoteChatBackend;
pub use traits::ChatBackend;
