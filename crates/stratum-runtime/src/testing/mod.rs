//! Testing utilities for the migration engine.
//!
//! Provides an in-memory [`MockExecutor`] that records statements and
//! simulates the migration bookkeeping table, so migrator behavior can be
//! verified without a database.

mod mock;

pub use mock::MockExecutor;
