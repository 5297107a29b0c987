//! `tellr-core` — account domain building blocks.
//!
//! Pure domain primitives shared by the account and audit crates: the error
//! taxonomy and the account identifier. No IO, no locking.

pub mod error;
pub mod id;

pub use error::{AccountError, AccountResult};
pub use id::AccountId;
