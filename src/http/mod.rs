//! HTTP protocol layer module
//!
//! Provides the request/response data model shared by callbacks and the
//! dispatcher, decoupled from the transport that parses raw HTTP.

pub mod content_type;
pub mod cookie;
pub mod exchange;
pub mod response;

// Re-export commonly used types
pub use content_type::ContentType;
pub use cookie::Cookie;
pub use exchange::Exchange;
pub use response::Response;
