//! End-to-end session tests over a scripted in-memory transport.
//!
//! The scripted connector hands the session a queue of pre-built
//! connections. Each connection's inbound frames come from a channel the
//! test controls; every outbound frame the session writes is captured
//! for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use riptide_gateway::{
    ConnectionError, Connector, FrameSink, FrameStream, GatewayConfig, GatewayError, Session,
    Status,
};

type InboundItem = Result<Option<String>, ConnectionError>;

struct ScriptedConnection {
    inbound: mpsc::UnboundedReceiver<InboundItem>,
}

struct ScriptedConnector {
    connections: Mutex<VecDeque<ScriptedConnection>>,
    outbound: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(
        &self,
        _url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), ConnectionError> {
        let connection = self
            .connections
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ConnectionError::ConnectFailed("script exhausted".to_string()))?;
        Ok((
            Box::new(ScriptedSink {
                outbound: self.outbound.clone(),
            }),
            Box::new(ScriptedFrames {
                inbound: connection.inbound,
            }),
        ))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedSink {
    outbound: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl FrameSink for ScriptedSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), ConnectionError> {
        self.outbound
            .send(frame)
            .map_err(|_| ConnectionError::SendFailed("sink closed".to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        Ok(())
    }
}

struct ScriptedFrames {
    inbound: mpsc::UnboundedReceiver<InboundItem>,
}

#[async_trait]
impl FrameStream for ScriptedFrames {
    async fn next_frame(&mut self) -> Result<Option<String>, ConnectionError> {
        match self.inbound.recv().await {
            Some(item) => item,
            None => Ok(None),
        }
    }
}

/// Handle for driving one scripted connection's inbound side.
struct Feed(mpsc::UnboundedSender<InboundItem>);

impl Feed {
    fn frame(&self, raw: &str) {
        let _ = self.0.send(Ok(Some(raw.to_string())));
    }

    fn error(&self) {
        let _ = self
            .0
            .send(Err(ConnectionError::ReceiveFailed("injected".to_string())));
    }
}

fn scripted(
    connections: usize,
) -> (
    Box<ScriptedConnector>,
    Vec<Feed>,
    mpsc::UnboundedReceiver<String>,
) {
    // RUST_LOG=riptide_gateway=debug makes failures readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let mut feeds = Vec::new();
    let mut queue = VecDeque::new();
    for _ in 0..connections {
        let (tx, rx) = mpsc::unbounded_channel();
        feeds.push(Feed(tx));
        queue.push_back(ScriptedConnection { inbound: rx });
    }
    (
        Box::new(ScriptedConnector {
            connections: Mutex::new(queue),
            outbound: out_tx,
        }),
        feeds,
        out_rx,
    )
}

fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::with_token("tok");
    config.reconnect.initial_backoff_ms = 10;
    config.reconnect.max_backoff_ms = 50;
    config
}

/// Record the kind tag of everything the wildcard pipeline delivers.
fn record_kinds(session: &Arc<Session>) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = seen.clone();
    session.on_any(move |_, payload| {
        inner.lock().unwrap().push(payload.kind().to_string());
    });
    seen
}

async fn next_out(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for outbound frame")
        .expect("outbound channel closed");
    serde_json::from_str(&frame).expect("outbound frame is not JSON")
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 2s");
}

const HELLO: &str = r#"{"op":10,"d":{"heartbeat_interval":45000}}"#;
const READY: &str = r#"{"op":0,"s":1,"t":"READY","d":{"v":9,"user":{"id":"u1","username":"bot"},"session_id":"sess-1","guilds":[]}}"#;
const MESSAGE: &str = r#"{"op":0,"s":2,"t":"MESSAGE_CREATE","d":{"id":"m1","channel_id":"c1","content":"hi"}}"#;
const RESUMED: &str = r#"{"op":0,"s":3,"t":"RESUMED","d":{}}"#;

#[tokio::test]
async fn connect_dispatches_ready_and_close_disconnects() {
    let (connector, feeds, mut out) = scripted(1);
    let session = Session::with_connector(test_config(), connector);
    let seen = record_kinds(&session);

    feeds[0].frame(HELLO);
    session.connect().await.unwrap();

    let identify = next_out(&mut out).await;
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], "tok");

    feeds[0].frame(READY);
    feeds[0].frame(MESSAGE);

    wait_until(|| seen.lock().unwrap().len() == 3).await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["__CONNECT__", "READY", "MESSAGE_CREATE"]
    );
    assert_eq!(session.status(), Status::Connected);
    assert_eq!(session.sequence(), Some(2));
    assert_eq!(session.session_id().as_deref(), Some("sess-1"));

    session.close().await;
    assert_eq!(session.status(), Status::Disconnected);
    assert_eq!(seen.lock().unwrap().last().map(String::as_str), Some("__DISCONNECT__"));

    // A second connect on a closed session is allowed to fail on the
    // exhausted script, not on stale state.
    assert!(matches!(
        session.connect().await,
        Err(GatewayError::RateLimited { .. } | GatewayError::Transport(_))
    ));
}

#[tokio::test]
async fn transport_loss_resumes_with_prior_session_and_sequence() {
    let (connector, feeds, mut out) = scripted(2);
    let session = Session::with_connector(test_config(), connector);
    let seen = record_kinds(&session);

    // Generation one: identify handshake, then two dispatches.
    feeds[0].frame(HELLO);
    // Generation two is queued up before the loss is injected.
    feeds[1].frame(HELLO);
    feeds[1].frame(RESUMED);

    session.connect().await.unwrap();
    let identify = next_out(&mut out).await;
    assert_eq!(identify["op"], 2);

    feeds[0].frame(READY);
    feeds[0].frame(MESSAGE);
    wait_until(|| seen.lock().unwrap().len() == 3).await;

    feeds[0].error();

    wait_until(|| session.status() == Status::Connected && seen.lock().unwrap().len() == 6).await;

    // Resume carried the prior session id and sequence.
    let resume = next_out(&mut out).await;
    assert_eq!(resume["op"], 6);
    assert_eq!(resume["d"]["session_id"], "sess-1");
    assert_eq!(resume["d"]["seq"], 2);

    // Disconnect, then connect, then the resume completion; no second
    // ready.
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "__CONNECT__",
            "READY",
            "MESSAGE_CREATE",
            "__DISCONNECT__",
            "__CONNECT__",
            "RESUMED"
        ]
    );
    assert_eq!(
        seen.lock().unwrap().iter().filter(|k| *k == "READY").count(),
        1
    );

    // Sequence continued from its pre-disconnect value.
    assert_eq!(session.sequence(), Some(3));
    assert_eq!(session.session_id().as_deref(), Some("sess-1"));

    session.close().await;
}

#[tokio::test]
async fn rejected_resume_falls_back_to_fresh_identify() {
    let mut config = test_config();
    config.limits.identify_limit = 5;

    let (connector, feeds, mut out) = scripted(2);
    let session = Session::with_connector(config, connector);
    let seen = record_kinds(&session);

    feeds[0].frame(HELLO);
    feeds[1].frame(HELLO);
    // The gateway rejects the resume outright, then accepts the fresh
    // identify with a new session.
    feeds[1].frame(r#"{"op":9,"d":false}"#);
    feeds[1].frame(
        r#"{"op":0,"s":1,"t":"READY","d":{"v":9,"user":{"id":"u1","username":"bot"},"session_id":"sess-2","guilds":[]}}"#,
    );

    session.connect().await.unwrap();
    assert_eq!(next_out(&mut out).await["op"], 2);

    feeds[0].frame(READY);
    feeds[0].frame(MESSAGE);
    wait_until(|| seen.lock().unwrap().len() == 3).await;

    feeds[0].error();
    wait_until(|| session.session_id().as_deref() == Some("sess-2")).await;

    // Outbound after the loss: the resume attempt, then the fallback
    // identify.
    assert_eq!(next_out(&mut out).await["op"], 6);
    assert_eq!(next_out(&mut out).await["op"], 2);

    // Fresh identify means a fresh sequence from the new ready.
    wait_until(|| session.status() == Status::Connected).await;
    assert_eq!(session.sequence(), Some(1));

    session.close().await;
}

#[tokio::test]
async fn exhausted_identify_gate_emits_rate_limit_synthetic() {
    let mut config = test_config();
    config.limits.identify_limit = 0;
    config.reconnect.enabled = false;

    let (connector, feeds, _out) = scripted(1);
    let session = Session::with_connector(config, connector);
    let seen = record_kinds(&session);

    feeds[0].frame(HELLO);
    let err = session.connect().await.unwrap_err();
    match err {
        GatewayError::RateLimited { bucket, retry_after } => {
            assert_eq!(bucket, "identify");
            assert!(retry_after <= Duration::from_secs(5));
        }
        other => panic!("expected RateLimited, got {other}"),
    }

    // The gate surfaced through the dispatch pipeline too.
    assert_eq!(*seen.lock().unwrap(), vec!["__RATE_LIMIT__"]);
    assert_eq!(session.status(), Status::Disconnected);
}

#[tokio::test]
async fn heartbeats_carry_sequence_and_flow_on_ack() {
    let (connector, feeds, mut out) = scripted(1);
    let session = Session::with_connector(test_config(), connector);

    feeds[0].frame(r#"{"op":10,"d":{"heartbeat_interval":40}}"#);
    session.connect().await.unwrap();

    assert_eq!(next_out(&mut out).await["op"], 2);
    feeds[0].frame(READY);
    wait_until(|| session.sequence() == Some(1)).await;

    let beat = next_out(&mut out).await;
    assert_eq!(beat["op"], 1);
    assert_eq!(beat["d"], 1);

    // Acknowledged, so the next interval produces another heartbeat.
    feeds[0].frame(r#"{"op":11}"#);
    assert_eq!(next_out(&mut out).await["op"], 1);

    session.close().await;
}

#[tokio::test]
async fn missing_heartbeat_ack_tears_the_connection_down() {
    let mut config = test_config();
    config.reconnect.enabled = false;

    let (connector, feeds, mut out) = scripted(1);
    let session = Session::with_connector(config, connector);
    let seen = record_kinds(&session);

    feeds[0].frame(r#"{"op":10,"d":{"heartbeat_interval":30}}"#);
    session.connect().await.unwrap();
    assert_eq!(next_out(&mut out).await["op"], 2);
    feeds[0].frame(READY);

    // First heartbeat goes out, is never acked, and the next tick
    // declares the link dead.
    assert_eq!(next_out(&mut out).await["op"], 1);
    wait_until(|| session.status() == Status::Disconnected).await;
    assert_eq!(
        seen.lock().unwrap().last().map(String::as_str),
        Some("__DISCONNECT__")
    );
}

#[tokio::test]
async fn sequence_survives_duplicates_and_reordering() {
    let (connector, feeds, mut out) = scripted(1);
    let session = Session::with_connector(test_config(), connector);
    let seen = record_kinds(&session);

    feeds[0].frame(HELLO);
    session.connect().await.unwrap();
    assert_eq!(next_out(&mut out).await["op"], 2);
    feeds[0].frame(READY);

    let typing =
        |s: u64| format!(r#"{{"op":0,"s":{s},"t":"TYPING_START","d":{{"channel_id":"c1","user_id":"u1","timestamp":1}}}}"#);
    feeds[0].frame(&typing(5));
    feeds[0].frame(&typing(3)); // out of order
    feeds[0].frame(&typing(5)); // duplicate

    wait_until(|| seen.lock().unwrap().len() == 5).await;
    assert_eq!(session.sequence(), Some(5));

    session.close().await;
}

#[tokio::test]
async fn malformed_and_undecodable_frames_do_not_kill_the_stream() {
    let (connector, feeds, mut out) = scripted(1);
    let session = Session::with_connector(test_config(), connector);
    let seen = record_kinds(&session);

    feeds[0].frame(HELLO);
    session.connect().await.unwrap();
    assert_eq!(next_out(&mut out).await["op"], 2);
    feeds[0].frame(READY);

    // Not an envelope at all.
    feeds[0].frame("garbage");
    // Valid envelope, body missing a required field for its kind.
    feeds[0].frame(r#"{"op":0,"s":2,"t":"MESSAGE_REACTION_ADD","d":{"user_id":"1"}}"#);
    // Unknown kind still reaches the wildcard.
    feeds[0].frame(r#"{"op":0,"s":3,"t":"SOME_FUTURE_EVENT","d":{"x":1}}"#);
    // The stream is still alive for a well-formed frame.
    feeds[0].frame(MESSAGE);

    wait_until(|| seen.lock().unwrap().len() == 4).await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "__CONNECT__",
            "READY",
            "SOME_FUTURE_EVENT",
            "MESSAGE_CREATE"
        ]
    );
    // Dropped frames still advanced nothing; the valid ones did.
    assert_eq!(session.sequence(), Some(3));

    session.close().await;
}
