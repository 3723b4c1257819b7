use std::fmt;
use std::future::Future;
use std::pin::Pin;

use stratum_core::Result;

/// Boxed future produced by a migration action.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

type Action = Box<dyn Fn() -> ActionFuture + Send + Sync>;

/// A named, one-directional schema or data change.
///
/// The name is the identity: the migrator decides "already applied" by exact
/// name equality against the log, so no two migrations in a sequence should
/// share one. Actions are zero-argument closures; anything they need
/// (typically an executor handle) is captured at construction time.
pub struct Migration {
    name: String,
    forward: Action,
    reverse: Action,
}

impl Migration {
    /// Declare a migration with forward and reverse actions.
    pub fn new<F, FFut, R, RFut>(name: impl Into<String>, forward: F, reverse: R) -> Self
    where
        F: Fn() -> FFut + Send + Sync + 'static,
        FFut: Future<Output = Result<()>> + Send + 'static,
        R: Fn() -> RFut + Send + Sync + 'static,
        RFut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            forward: Box::new(move || Box::pin(forward())),
            reverse: Box::new(move || Box::pin(reverse())),
        }
    }

    /// The migration's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the forward action.
    pub fn forward(&self) -> ActionFuture {
        (self.forward)()
    }

    /// Invoke the reverse action.
    ///
    /// Never called by [`Migrator::migrate`](super::Migrator::migrate);
    /// down replay is left to the caller.
    pub fn reverse(&self) -> ActionFuture {
        (self.reverse)()
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
