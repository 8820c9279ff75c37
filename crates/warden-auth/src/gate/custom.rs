//! Custom authorization gate backed by a caller-supplied decision function.
//!
//! # Design
//! - The decision function runs exactly once per request, inside the gate's future.
//! - Callback-style functions receive a [`Completion`]; only the first answer is delivered.
//! - Waiting for the answer is an `.await` on a oneshot channel; there is no timeout.
//! - Errors, panics and abandoned completions all deny with [`AuthError::DecisionFailed`].

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::http::Request;
use futures_util::FutureExt as _;
use tokio::sync::oneshot;

use crate::constants::GATE_CUSTOM;
use crate::error::{AuthError, BoxError, DecisionError};
use crate::gate::{Decision, Gate, GateFuture, RequestHead};

type DecisionFuture = Pin<Box<dyn Future<Output = Result<bool, DecisionError>> + Send>>;
type DecideFn = dyn Fn(RequestHead) -> DecisionFuture + Send + Sync;

/// Single-shot answer handle passed to callback-style decision functions.
///
/// Clones share one slot: the first [`Completion::complete`] delivers, every
/// later call is ignored.
#[derive(Debug, Clone)]
pub struct Completion {
    slot: Arc<Mutex<Option<oneshot::Sender<bool>>>>,
}

impl Completion {
    fn channel() -> (Self, oneshot::Receiver<bool>) {
        let (sender, receiver) = oneshot::channel();
        let completion = Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (completion, receiver)
    }

    /// Deliver the decision. Returns `false` when an earlier call already
    /// answered or the request is no longer waiting.
    pub fn complete(&self, allow: bool) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        sender.is_some_and(|sender| sender.send(allow).is_ok())
    }

    /// Shorthand for `complete(true)`.
    pub fn allow(&self) -> bool {
        self.complete(true)
    }

    /// Shorthand for `complete(false)`.
    pub fn deny(&self) -> bool {
        self.complete(false)
    }

    /// True once any clone has called [`Completion::complete`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

/// Gate that delegates allow/deny to a decision function.
#[derive(Clone)]
pub struct CustomGate {
    decide: Arc<DecideFn>,
}

impl CustomGate {
    /// Gate from an async predicate.
    pub fn from_async<F, Fut>(decide: F) -> Self
    where
        F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::wrap(move |head| -> DecisionFuture {
            let pending = decide(head);
            Box::pin(async move { Ok(pending.await) })
        })
    }

    /// Gate from a fallible async predicate; `Err` denies.
    pub fn try_from_async<F, Fut, E>(decide: F) -> Self
    where
        F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::wrap(move |head| -> DecisionFuture {
            let pending = decide(head);
            Box::pin(async move { pending.await.map_err(DecisionError::failed) })
        })
    }

    /// Gate from a callback that answers through a [`Completion`].
    ///
    /// The callback may answer synchronously or hand the completion to another
    /// task. Dropping every clone without answering denies the request.
    pub fn from_callback<F>(decide: F) -> Self
    where
        F: Fn(RequestHead, Completion) + Send + Sync + 'static,
    {
        Self::wrap(move |head| -> DecisionFuture {
            let (completion, receiver) = Completion::channel();
            decide(head, completion);
            Box::pin(async move { receiver.await.map_err(|_| DecisionError::Abandoned) })
        })
    }

    fn wrap<F>(decide: F) -> Self
    where
        F: Fn(RequestHead) -> DecisionFuture + Send + Sync + 'static,
    {
        Self {
            decide: Arc::new(decide),
        }
    }

    /// Run the decision function once for `head`.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when the function errors, panics or abandons
    /// its completion.
    pub async fn decide(&self, head: RequestHead) -> Result<bool, DecisionError> {
        run_decision(Arc::clone(&self.decide), head).await
    }
}

impl std::fmt::Debug for CustomGate {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("CustomGate").finish_non_exhaustive()
    }
}

impl Gate for CustomGate {
    fn name(&self) -> &'static str {
        GATE_CUSTOM
    }

    fn evaluate<B>(&self, request: &Request<B>) -> GateFuture {
        let head = RequestHead::from_request(request);
        let decide = Arc::clone(&self.decide);
        Box::pin(async move {
            match run_decision(decide, head).await {
                Ok(true) => Decision::Allow,
                Ok(false) => Decision::Deny(AuthError::Denied),
                Err(source) => Decision::Deny(AuthError::DecisionFailed { source }),
            }
        })
    }
}

async fn run_decision(decide: Arc<DecideFn>, head: RequestHead) -> Result<bool, DecisionError> {
    let pending =
        catch_unwind(AssertUnwindSafe(|| decide(head))).map_err(DecisionError::from_panic)?;
    AssertUnwindSafe(pending)
        .catch_unwind()
        .await
        .map_err(DecisionError::from_panic)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn request(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).expect("request")
    }

    fn letmein(head: &RequestHead) -> bool {
        head.query_param("letmein").as_deref() == Some("now")
    }

    #[tokio::test]
    async fn async_predicate_controls_decision() {
        let gate = CustomGate::from_async(|head| async move { letmein(&head) });
        assert!(matches!(
            gate.evaluate(&request("/custom")).await,
            Decision::Deny(AuthError::Denied)
        ));
        assert!(gate.evaluate(&request("/custom?letmein=now")).await.is_allow());
        assert!(!gate.evaluate(&request("/custom?letmein=later")).await.is_allow());
    }

    #[tokio::test]
    async fn decision_function_runs_once_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let gate = CustomGate::from_async(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { true }
        });
        for _ in 0..3 {
            assert!(gate.evaluate(&request("/")).await.is_allow());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn callback_answers_synchronously() {
        let gate = CustomGate::from_callback(|head, completion| {
            completion.complete(letmein(&head));
        });
        assert!(gate.evaluate(&request("/?letmein=now")).await.is_allow());
        assert!(!gate.evaluate(&request("/")).await.is_allow());
    }

    #[tokio::test]
    async fn callback_answers_from_another_task() {
        let gate = CustomGate::from_callback(|_, completion| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                completion.allow();
            });
        });
        assert!(gate.evaluate(&request("/")).await.is_allow());
    }

    #[tokio::test]
    async fn only_first_completion_is_honored() {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&outcomes);
        let gate = CustomGate::from_callback(move |_, completion| {
            let twin = completion.clone();
            let first = completion.deny();
            let second = twin.allow();
            let third = completion.complete(true);
            if let Ok(mut list) = recorded.lock() {
                list.extend([first, second, third, twin.is_completed()]);
            }
        });

        assert!(matches!(
            gate.evaluate(&request("/")).await,
            Decision::Deny(AuthError::Denied)
        ));
        let list = outcomes.lock().expect("outcomes").clone();
        assert_eq!(list, [true, false, false, true]);
    }

    #[tokio::test]
    async fn abandoned_completion_denies() {
        let gate = CustomGate::from_callback(|_, completion| drop(completion));
        assert!(matches!(
            gate.evaluate(&request("/")).await,
            Decision::Deny(AuthError::DecisionFailed {
                source: DecisionError::Abandoned
            })
        ));
    }

    #[tokio::test]
    async fn errors_and_panics_deny() {
        let failing =
            CustomGate::try_from_async(|_| async { Err::<bool, _>(io::Error::other("down")) });
        assert!(matches!(
            failing.evaluate(&request("/")).await,
            Decision::Deny(AuthError::DecisionFailed {
                source: DecisionError::Failed { .. }
            })
        ));

        let panicking_sync = CustomGate::from_callback(|_, _| panic!("sync boom"));
        assert!(matches!(
            panicking_sync.evaluate(&request("/")).await,
            Decision::Deny(AuthError::DecisionFailed {
                source: DecisionError::Panicked { .. }
            })
        ));

        let panicking_async = CustomGate::from_async(|head| async move {
            assert!(head.query_param("never").is_some(), "async boom");
            true
        });
        assert!(matches!(
            panicking_async.evaluate(&request("/")).await,
            Decision::Deny(AuthError::DecisionFailed {
                source: DecisionError::Panicked { .. }
            })
        ));
    }

    #[tokio::test]
    async fn cancelled_request_ignores_late_completion() {
        let (handle_tx, handle_rx) = oneshot::channel::<Completion>();
        let handle_tx = Arc::new(Mutex::new(Some(handle_tx)));
        let gate = CustomGate::from_callback(move |_, completion| {
            if let Some(sender) = handle_tx.lock().ok().and_then(|mut slot| slot.take()) {
                let _ = sender.send(completion);
            }
        });

        let pending = tokio::spawn(gate.evaluate(&request("/")));
        let completion = handle_rx.await.expect("decision function invoked");
        pending.abort();
        let _ = pending.await;

        assert!(!completion.complete(true));
        assert!(completion.is_completed());
    }

    #[tokio::test]
    async fn decide_exposes_raw_answer() {
        let gate = CustomGate::try_from_async(|head| async move {
            Ok::<_, io::Error>(head.method == axum::http::Method::GET)
        });
        let head = RequestHead::from_request(&request("/"));
        assert!(gate.decide(head).await.expect("decision"));
        assert!(format!("{gate:?}").contains("CustomGate"));
    }
}
