//! Use cases
//!
//! Screen controllers that orchestrate domain logic against the store.

pub(crate) mod shared;
pub mod sleep_quality;
pub mod sleep_session;

#[cfg(test)]
pub(crate) mod test_support;
