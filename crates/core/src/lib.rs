//! Domain layer for the campus content platform.
//!
//! Holds everything that does not touch I/O: the error type, id aliases,
//! role and department rules, the per-category content descriptors, media
//! reference invariants, and the wire types shared by the server and the
//! client SDK.

pub mod category;
pub mod content;
pub mod department;
pub mod error;
pub mod media;
pub mod overview;
pub mod roles;
pub mod types;
