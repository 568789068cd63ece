//! Payload dispatch.
//!
//! Resolves a payload's handlers from the registry snapshot and invokes
//! them under the configured execution policy. A faulting callback is
//! recovered at the invocation boundary: it cannot corrupt the registry,
//! halt the remaining handlers, or kill the read path.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use riptide_protocol::{EventKind, Payload};
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::handler::{Callback, HandlerEntry, HandlerRegistry};
use crate::metrics;
use crate::session::Session;

/// How handler callbacks execute relative to the read path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// Inline on the dispatch path, in registration order. A slow
    /// handler delays later handlers and the next frame.
    #[default]
    Sync,
    /// Each invocation on its own task. The read path is never blocked;
    /// cross-handler ordering is lost.
    Spawned,
}

pub(crate) struct Dispatcher {
    policy: ExecutionPolicy,
}

impl Dispatcher {
    pub(crate) fn new(policy: ExecutionPolicy) -> Self {
        Self { policy }
    }

    /// Invoke every handler registered for the payload's kind, exact
    /// matches first, then wildcards, in registration order.
    pub(crate) fn dispatch(
        &self,
        session: &Arc<Session>,
        registry: &HandlerRegistry,
        payload: Payload,
    ) {
        let kind = payload.kind();
        let payload = Arc::new(payload);
        let (exact, wildcard) = registry.snapshot(&kind);

        trace!(
            kind = %kind,
            exact = exact.len(),
            wildcard = wildcard.len(),
            "dispatching payload"
        );
        metrics::record_dispatch(kind.as_tag());

        self.run_entries(session, registry, exact, Some(&kind), &payload);
        self.run_entries(session, registry, wildcard, None, &payload);
    }

    fn run_entries(
        &self,
        session: &Arc<Session>,
        registry: &HandlerRegistry,
        entries: Vec<HandlerEntry>,
        slot: Option<&EventKind>,
        payload: &Arc<Payload>,
    ) {
        for entry in entries {
            if entry.once {
                // The claim flag decides a race between two dispatches
                // (or a dispatch and an unsubscribe) exactly once.
                if entry.fired.swap(true, Ordering::SeqCst) {
                    continue;
                }
                registry.remove_fired(slot, entry.id);
            }
            self.invoke(session, &entry, payload);
        }
    }

    fn invoke(&self, session: &Arc<Session>, entry: &HandlerEntry, payload: &Arc<Payload>) {
        match self.policy {
            ExecutionPolicy::Sync => {
                Self::run(session.clone(), entry.callback.clone(), payload.clone());
            }
            ExecutionPolicy::Spawned => {
                let session = session.clone();
                let callback = entry.callback.clone();
                let payload = payload.clone();
                tokio::spawn(async move {
                    Self::run(session, callback, payload);
                });
            }
        }
    }

    fn run(session: Arc<Session>, callback: Arc<Callback>, payload: Arc<Payload>) {
        let result = catch_unwind(AssertUnwindSafe(|| callback(&session, &payload)));
        if result.is_err() {
            metrics::record_handler_fault();
            error!(kind = %payload.kind(), "handler panicked; remaining handlers unaffected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use riptide_protocol::events::{Connect, MessageCreate, TypingStart};
    use riptide_protocol::DispatchPayload;

    use crate::config::GatewayConfig;

    fn message_create() -> Payload {
        let body = serde_json::value::RawValue::from_string(
            r#"{"id":"m1","channel_id":"c1","content":"hi"}"#.to_string(),
        )
        .unwrap();
        riptide_protocol::registry::decode_body(&EventKind::MessageCreate, Some(&body)).unwrap()
    }

    fn test_session() -> Arc<Session> {
        Session::new(GatewayConfig::default())
    }

    #[tokio::test]
    async fn test_exact_then_wildcard_exactly_once() {
        let session = test_session();
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let seen_specific = seen.clone();
        session.on::<MessageCreate, _>(move |_, _| {
            seen_specific.lock().unwrap().push("specific");
        });
        let seen_any = seen.clone();
        session.on_any(move |_, _| {
            seen_any.lock().unwrap().push("wildcard");
        });

        session.dispatch_payload(message_create());

        assert_eq!(*seen.lock().unwrap(), vec!["specific", "wildcard"]);
    }

    #[tokio::test]
    async fn test_registration_order_within_kind() {
        let session = test_session();
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        for i in 0..4 {
            let seen = seen.clone();
            session.on::<MessageCreate, _>(move |_, _| {
                seen.lock().unwrap().push(i);
            });
        }

        session.dispatch_payload(message_create());
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_one_shot_fires_once_and_unlists() {
        let session = test_session();
        let seen: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));

        let counter = seen.clone();
        let sub = session.once::<MessageCreate, _>(move |_, _| {
            *counter.lock().unwrap() += 1;
        });

        assert!(session.is_subscribed(&sub));
        session.dispatch_payload(message_create());
        session.dispatch_payload(message_create());

        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(!session.is_subscribed(&sub));
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_halt_peers() {
        let session = test_session();
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        session.on::<MessageCreate, _>(|_, _| panic!("boom"));
        let seen_after = seen.clone();
        session.on::<MessageCreate, _>(move |_, _| {
            seen_after.lock().unwrap().push("after");
        });

        session.dispatch_payload(message_create());
        // The faulting handler is recovered; its peer still ran.
        assert_eq!(*seen.lock().unwrap(), vec!["after"]);

        // The registry is intact for the next dispatch.
        session.dispatch_payload(message_create());
        assert_eq!(*seen.lock().unwrap(), vec!["after", "after"]);
    }

    #[tokio::test]
    async fn test_unsubscribe_from_within_callback() {
        let session = test_session();
        let seen: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));

        let slot: Arc<Mutex<Option<crate::handler::Subscription>>> =
            Arc::new(Mutex::new(None));
        let slot_inner = slot.clone();
        let counter = seen.clone();
        let sub = session.on::<MessageCreate, _>(move |session, _| {
            *counter.lock().unwrap() += 1;
            // Self-removal mid-dispatch must not corrupt iteration.
            if let Some(sub) = slot_inner.lock().unwrap().take() {
                session.unsubscribe(&sub);
            }
        });
        *slot.lock().unwrap() = Some(sub);

        session.dispatch_payload(message_create());
        session.dispatch_payload(message_create());
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_kind_reaches_wildcard_only() {
        let session = test_session();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        session.on::<MessageCreate, _>(|_, _| panic!("kind-specific handler must not run"));
        let seen_any = seen.clone();
        session.on_any(move |_, payload| {
            seen_any.lock().unwrap().push(payload.kind().to_string());
        });

        let payload = riptide_protocol::registry::decode_body(
            &EventKind::from_tag("SOME_FUTURE_EVENT"),
            None,
        )
        .unwrap();
        session.dispatch_payload(payload);

        assert_eq!(*seen.lock().unwrap(), vec!["SOME_FUTURE_EVENT"]);
    }

    #[tokio::test]
    async fn test_typed_handler_receives_decoded_payload() {
        let session = test_session();
        let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let seen_content = seen.clone();
        session.on::<MessageCreate, _>(move |_, ev| {
            *seen_content.lock().unwrap() = Some(ev.message.content.clone());
        });

        session.dispatch_payload(message_create());
        assert_eq!(seen.lock().unwrap().as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_spawned_policy_runs_every_handler() {
        let mut config = GatewayConfig::default();
        config.dispatch.policy = ExecutionPolicy::Spawned;
        let session = Session::new(config);

        let seen: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        for _ in 0..3 {
            let seen = seen.clone();
            session.on::<MessageCreate, _>(move |_, _| {
                *seen.lock().unwrap() += 1;
            });
        }

        session.dispatch_payload(message_create());

        // Spawned invocations land on their own tasks; poll for them.
        for _ in 0..100 {
            if *seen.lock().unwrap() == 3 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(*seen.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_synthetic_payloads_use_same_pipeline() {
        let session = test_session();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let seen_any = seen.clone();
        session.on_any(move |_, payload| {
            seen_any.lock().unwrap().push(payload.kind().to_string());
        });
        let seen_connect = seen.clone();
        session.on::<Connect, _>(move |_, _| {
            seen_connect.lock().unwrap().push("typed-connect".to_string());
        });

        session.dispatch_payload(Payload::Connect(Connect));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["typed-connect".to_string(), "__CONNECT__".to_string()]
        );
    }

    #[tokio::test]
    async fn test_typed_mismatch_is_skipped() {
        let session = test_session();
        session.on::<TypingStart, _>(|_, _| panic!("wrong kind must not run"));
        session.dispatch_payload(message_create());
        assert_eq!(<TypingStart as DispatchPayload>::kind(), EventKind::TypingStart);
    }
}
