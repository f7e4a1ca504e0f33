//! Session state: persisted tokens, the observable current user and the
//! product-to-quote handoff.

pub mod quote_handoff;
pub mod state;
pub mod storage;
pub mod store;

pub use quote_handoff::*;
pub use state::*;
pub use storage::*;
pub use store::*;
