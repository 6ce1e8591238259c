//! Integration test support.

pub(crate) mod helpers;

pub use context::TestContext;
pub use db::TestDb;
