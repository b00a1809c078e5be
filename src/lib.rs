//! troika-trail-cores
//!
//! Weight-bounded enumeration of differential trail cores for the Troika
//! ternary permutation (the hash function underlying the IOTA protocol's
//! proof-of-work).
//!
//! # Overview
//!
//! A *trail core* is a short sequence of Troika states connected by the
//! linear layer Λ and the nonlinear Sbox layer ST, together with the
//! minimum weight each end of the sequence could be extended to outside
//! the core. This crate enumerates every trail core up to a given weight
//! budget for 2- and 3-round cores, using a generic weight-bounded DFS tree
//! traversal ([`traversal`]) specialized by four different unit shapes
//! ([`bare_state`], [`mixed_state`]) and four ST-boundary extension
//! iterators ([`extension`]).
//!
//! # Modules
//!
//! - [`position`], [`lane`], [`plane`], [`active_state`], [`state`],
//!   [`tryte_table`]: the ternary algebra the rest of the crate is built on.
//! - [`weight`]: exact trail-weight arithmetic and ordering.
//! - [`sbox`]: the Troika Sbox difference tables.
//! - [`traversal`]: the generic weight-bounded DFS engine.
//! - [`bare_state`], [`mixed_state`], [`state_iterator`]: 2-round state
//!   enumeration, outside- and inside-kernel.
//! - [`extension`]: the four ST-boundary extension iterators.
//! - [`trail`]: the trail core record type, its invariant checker, its
//!   z-translation canonicalization, and its file format.
//! - [`orchestrate`]: the four 3-round orchestration profiles.
//! - [`config`], [`cli`]: run configuration and its command-line front end.
//! - [`error`]: the shared error taxonomy.

pub mod active_state;
pub mod bare_state;
pub mod cli;
pub mod config;
pub mod error;
pub mod extension;
pub mod lane;
pub mod mixed_state;
pub mod orchestrate;
pub mod plane;
pub mod position;
pub mod sbox;
pub mod state;
pub mod state_iterator;
pub mod trail;
pub mod traversal;
pub mod tryte_table;
pub mod weight;

pub use error::{Result, TrailError};
pub use state::TroikaState;
pub use trail::TrailCore;
pub use weight::Weight;
