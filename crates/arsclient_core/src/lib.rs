//! Safe client for a native enterprise-record server library.
//!
//! The crate wraps the raw binding in [`arsclient_sys`] with a session
//! façade that owns resource lifetimes: every structure the native library
//! populates is released exactly once through an RAII guard, diagnostics
//! are decoded into owned records, and tagged field values become a closed
//! [`Value`] sum type before anything downstream sees them.
//!
//! Entry point: [`Connection::open`] with a [`ServerConfig`]. The session
//! caches schema and field metadata for its lifetime and exposes three
//! operations on top of the lifecycle: [`Connection::schemas`],
//! [`Connection::fields`], and [`Connection::query`].

pub mod cache;
pub mod config;
pub mod error;
mod guard;
pub mod session;
pub mod status;
pub mod value;

pub use config::ServerConfig;
pub use error::{ClientError, ClientResult};
pub use session::{Connection, Entry};
pub use status::{Severity, StatusMessage};
pub use value::Value;
