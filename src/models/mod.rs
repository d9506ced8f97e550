//! McBroken archive data models
//!
//! Commits of the snapshot archive and the restaurant records stored in
//! each snapshot payload.

pub mod commit;
pub mod snapshot;

pub use commit::*;
pub use snapshot::*;
