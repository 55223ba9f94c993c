//! # arsclient_sys
//!
//! The fixed ABI contract of the AR server's proprietary C client library.
//!
//! This crate defines:
//! - The `#[repr(C)]` structures and constants the vendor entry points
//!   operate on ([`types`])
//! - The [`ArLibrary`] dispatch trait mirroring those entry points, plus the
//!   [`ZeroInit`] and [`Releasable`] marker traits the safe layer builds its
//!   resource guards on ([`library`])
//! - Helpers for the vendor's fixed-size `char` arrays ([`strings`])
//! - A `vendor`-feature-gated implementation that links against the real
//!   shared library ([`VendorLibrary`])
//!
//! Everything here is a faithful transcription of an external contract; the
//! safe API lives in `arsclient_core`.

pub mod library;
pub mod strings;
pub mod types;

#[cfg(feature = "vendor")]
mod vendor;

pub use library::{ArLibrary, Releasable, ZeroInit};
pub use types::*;

#[cfg(feature = "vendor")]
pub use vendor::VendorLibrary;
