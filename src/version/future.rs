//! Single-assignment future shared between the fetch pipeline and its callers
//!
//! A [`Promise`] is the producing half and can be completed exactly once
//! (it is consumed by [`Promise::complete`]). Any number of [`AsyncFuture`]
//! clones observe the outcome, either through callbacks registered with
//! [`AsyncFuture::when_complete`] or by awaiting.

use std::fmt;
use std::future::IntoFuture;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::error;

use crate::version::error::UpdateError;

/// Value or error delivered through an [`AsyncFuture`]
pub type Outcome<T> = Result<T, UpdateError>;

type Subscriber<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;

enum State<T> {
    Pending(Vec<Subscriber<T>>),
    Complete(Arc<Outcome<T>>),
}

struct Shared<T> {
    state: Mutex<State<T>>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // Subscribers never run under the lock, so a poisoned lock still holds a valid state
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, outcome: Outcome<T>) {
        let (subscribers, outcome) = {
            let mut state = self.lock();
            let State::Pending(subscribers) = &mut *state else {
                return;
            };
            let subscribers = std::mem::take(subscribers);
            let outcome = Arc::new(outcome);
            *state = State::Complete(Arc::clone(&outcome));
            (subscribers, outcome)
        };

        // One failing subscriber must not keep the outcome from the others
        for subscriber in subscribers {
            if panic::catch_unwind(AssertUnwindSafe(|| subscriber(&outcome))).is_err() {
                error!("Subscriber panicked while receiving a completed outcome");
            }
        }
    }
}

/// Consumer side: cloneable handle on an outcome that is set at most once
pub struct AsyncFuture<T> {
    shared: Arc<Shared<T>>,
}

/// Producer side of an [`AsyncFuture`]
///
/// Dropping a promise without completing it completes the future with
/// [`UpdateError::FetchFailed`], so subscribers are never left waiting.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
    completed: bool,
}

impl<T> AsyncFuture<T> {
    /// Create an incomplete future together with the promise that completes it
    pub fn pending() -> (Promise<T>, AsyncFuture<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending(Vec::new())),
        });
        let promise = Promise {
            shared: Arc::clone(&shared),
            completed: false,
        };
        (promise, AsyncFuture { shared })
    }

    /// Create a future that is already complete
    pub fn completed(outcome: Outcome<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Complete(Arc::new(outcome))),
            }),
        }
    }

    /// Register a callback for the outcome
    ///
    /// On an already complete future the callback runs immediately on the
    /// calling thread. Otherwise it runs on the thread that completes the promise.
    pub fn when_complete<F>(&self, callback: F)
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        let outcome = {
            let mut state = self.shared.lock();
            match &mut *state {
                State::Pending(subscribers) => {
                    subscribers.push(Box::new(callback));
                    return;
                }
                State::Complete(outcome) => Arc::clone(outcome),
            }
        };

        callback(&outcome);
    }

    pub fn is_complete(&self) -> bool {
        matches!(*self.shared.lock(), State::Complete(_))
    }

    /// Returns true when both handles observe the same underlying operation
    pub fn same_operation(&self, other: &AsyncFuture<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Clone> AsyncFuture<T> {
    /// The outcome if the future is already complete
    pub fn try_get(&self) -> Option<Outcome<T>> {
        match &*self.shared.lock() {
            State::Pending(_) => None,
            State::Complete(outcome) => Some((**outcome).clone()),
        }
    }
}

impl<T: Clone + Send + 'static> AsyncFuture<T> {
    /// Wait for the outcome without blocking the current thread
    pub async fn wait(&self) -> Outcome<T> {
        let (tx, rx) = oneshot::channel();
        self.when_complete(move |outcome| {
            let _ = tx.send(outcome.clone());
        });

        rx.await.unwrap_or_else(|_| {
            Err(UpdateError::FetchFailed(
                "result channel closed before completion".to_string(),
            ))
        })
    }
}

impl<T> Clone for AsyncFuture<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for AsyncFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_complete() {
            "complete"
        } else {
            "pending"
        };
        f.debug_struct("AsyncFuture").field("state", &state).finish()
    }
}

impl<T> IntoFuture for AsyncFuture<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Outcome<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

impl<T> Promise<T> {
    /// Complete the future, running every registered subscriber
    pub fn complete(mut self, outcome: Outcome<T>) {
        self.completed = true;
        self.shared.complete(outcome);
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if !self.completed {
            self.shared.complete(Err(UpdateError::FetchFailed(
                "operation ended without producing a result".to_string(),
            )));
        }
    }
}
