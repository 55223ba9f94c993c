//! Test support for the AR client: an in-process fake server and the
//! allocation ledger it keeps.
//!
//! The fake implements the full dispatch trait with real heap allocations,
//! so tests exercise the safe layer's pointer handling and can assert that
//! a scenario releases every block it received. See [`FakeArServer`].

pub mod ledger;
pub mod server;

pub use ledger::Ledger;
pub use server::{ops, EnumDef, FakeArServer, FakeValue};
