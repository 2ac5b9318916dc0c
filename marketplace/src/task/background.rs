//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task::{JoinError, JoinHandle, LocalSet};

#[cfg(doc)]
use crate::Task;

/// Type-erased error of a [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Resolves once every spawned [`Task`] completes, or fails as soon as any
/// of them fails.
#[derive(Debug, Default)]
pub struct Background {
    /// [`LocalSet`] driving the spawned [`Task`]s.
    set: LocalSet,

    /// Handles of the spawned [`Task`]s.
    handles: Vec<JoinHandle<Result<(), BoxError>>>,
}

impl Background {
    /// Spawns a new [`Task`] inside this [`Background`] environment.
    pub fn spawn<F, E>(&mut self, task: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self
            .set
            .spawn_local(task.map_err(|e| BoxError::from(Box::new(e))));
        self.handles.push(handle);
    }

    /// Returns the number of [`Task`]s spawned in this [`Background`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Indicates whether no [`Task`]s were spawned in this [`Background`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Flattens the result of a joined [`Task`].
fn flatten(res: Result<Result<(), BoxError>, JoinError>) -> Result<(), BoxError> {
    res.map_err(|e| BoxError::from(Box::new(e)))?
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;

        let driver = set.map(Ok).boxed_local();
        let tasks = handles.into_iter().map(|h| h.map(flatten).boxed_local());
        future::try_join_all(iter::once(driver).chain(tasks))
            .map_ok(drop)
            .boxed_local()
    }
}
