//! Client-side state that outlives a single view.
//!
//! DESIGN
//! ======
//! `session` owns the signed-in state; `storage` is the durable backing it
//! writes through to.

pub mod session;
pub mod storage;
