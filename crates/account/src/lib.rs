//! Account module (single guarded balance, audited mutations).
//!
//! One lock per account; no persistence, no transfers between accounts.

pub mod account;
pub mod policy;

pub use account::{Account, AccountBuilder};
pub use policy::AuditFailurePolicy;
