//! Gateway session lifecycle.
//!
//! A [`Session`] owns one logical connection to the gateway: the
//! handler registry, the dispatcher, the serialized write path, and the
//! wire-side state (status, sequence, session id) that survives a
//! resume. Each physical connection is one *generation*: a dedicated
//! read task plus a heartbeat task, both torn down together on loss or
//! close.
//!
//! Three locks guard the session's three resources, acquired only in
//! this order when more than one is needed:
//!
//! 1. `state` - status, sequence, session id, heartbeat bookkeeping
//! 2. the handler registry's own lock
//! 3. `writer` - the outbound half of the connection
//!
//! A slow handler therefore never stalls heartbeats, and a handler may
//! itself issue an outbound write without deadlocking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use riptide_protocol::commands::{
    Hello, Identify, IdentifyProperties, RequestGuildMembers, Resume, UpdatePresence,
};
use riptide_protocol::events::{Connect, Disconnect, RateLimit};
use riptide_protocol::registry::{self, Payload};
use riptide_protocol::{envelope, DispatchPayload, Envelope, EnvelopeError, EventKind, OpCode};

use crate::config::GatewayConfig;
use crate::connection::{ConnectionError, Connector, FrameSink, FrameStream};
use crate::dispatch::Dispatcher;
use crate::error::GatewayError;
use crate::handler::{Callback, HandlerRegistry, Subscription};
use crate::metrics;
use crate::ratelimit::{RateLimiter, IDENTIFY_BUCKET};
use crate::websocket::WebSocketConnector;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No connection; the terminal state after a close.
    Disconnected,
    /// Opening the transport and waiting for the hello frame.
    Connecting,
    /// Fresh handshake sent, waiting for the ready payload.
    Identifying,
    /// Resume handshake sent, waiting for the resumed payload.
    Resuming,
    /// Handshake completed; the ready payload is being dispatched.
    Ready,
    /// Steady state.
    Connected,
    /// Transport lost; reconnect attempts are running.
    Reconnecting,
}

impl Status {
    /// Whether a physical connection currently exists.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Status::Identifying | Status::Resuming | Status::Ready | Status::Connected
        )
    }
}

/// Wire-side session fields, guarded by the session lock.
struct WireState {
    status: Status,
    /// Last sequence observed; survives resume, reset on a fresh
    /// identify.
    sequence: Option<u64>,
    session_id: Option<String>,
    heartbeat_interval: Duration,
    /// Whether the previous heartbeat was acknowledged.
    heartbeat_acked: bool,
    /// Bumped once per successful physical connection.
    generation: u64,
}

/// Tasks belonging to the current connection generation.
struct Runtime {
    stop: watch::Sender<bool>,
    read: JoinHandle<()>,
    heartbeat: JoinHandle<()>,
}

/// A client session against the realtime gateway.
///
/// Constructed behind an [`Arc`] and cheap to share.
///
/// Note: [`Session::close`] joins the read task, so it must not be
/// called from inside a handler running under the `Sync` execution
/// policy.
pub struct Session {
    config: GatewayConfig,
    connector: Box<dyn Connector>,
    state: Mutex<WireState>,
    registry: HandlerRegistry,
    dispatcher: Dispatcher,
    writer: AsyncMutex<Option<Box<dyn FrameSink>>>,
    limiter: RateLimiter,
    runtime: Mutex<Option<Runtime>>,
    /// Back-reference for handing `Arc<Session>` to spawned tasks and
    /// handlers; always upgradable while the session exists.
    weak: Weak<Session>,
}

impl Session {
    /// Create a session that connects over WebSocket.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Arc<Self> {
        Self::with_connector(config, Box::new(WebSocketConnector))
    }

    /// Create a session over a custom transport.
    #[must_use]
    pub fn with_connector(config: GatewayConfig, connector: Box<dyn Connector>) -> Arc<Self> {
        let limiter = RateLimiter::new();
        limiter.configure(
            IDENTIFY_BUCKET,
            config.limits.identify_limit,
            config.identify_window(),
        );

        Arc::new_cyclic(|weak| Self {
            dispatcher: Dispatcher::new(config.dispatch.policy),
            state: Mutex::new(WireState {
                status: Status::Disconnected,
                sequence: None,
                session_id: None,
                heartbeat_interval: config.fallback_heartbeat(),
                heartbeat_acked: true,
                generation: 0,
            }),
            registry: HandlerRegistry::new(),
            writer: AsyncMutex::new(None),
            limiter,
            connector,
            config,
            runtime: Mutex::new(None),
            weak: weak.clone(),
        })
    }

    fn arc(&self) -> Arc<Self> {
        // Every Session lives inside the Arc built by with_connector.
        self.weak.upgrade().expect("session dropped while in use")
    }

    // The state and runtime locks are never held across an await and no
    // callback runs under them, so poisoning only reflects a panic
    // elsewhere; keep serving.
    fn state_lock(&self) -> MutexGuard<'_, WireState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn runtime_lock(&self) -> MutexGuard<'_, Option<Runtime>> {
        self.runtime.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.state_lock().status
    }

    /// Last sequence number observed.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.state_lock().sequence
    }

    /// Session id assigned by the last ready payload.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.state_lock().session_id.clone()
    }

    // ─── Handler registration ───

    /// Register a handler for a concrete payload type.
    pub fn on<T, F>(&self, callback: F) -> Subscription
    where
        T: DispatchPayload,
        F: Fn(&Arc<Session>, &T) + Send + Sync + 'static,
    {
        self.subscribe_typed::<T, F>(callback, false)
    }

    /// Register a handler for a concrete payload type that fires at
    /// most once, then removes itself.
    pub fn once<T, F>(&self, callback: F) -> Subscription
    where
        T: DispatchPayload,
        F: Fn(&Arc<Session>, &T) + Send + Sync + 'static,
    {
        self.subscribe_typed::<T, F>(callback, true)
    }

    /// Register a wildcard handler receiving every successfully decoded
    /// payload, synthetic and catch-all included.
    pub fn on_any<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<Session>, &Payload) + Send + Sync + 'static,
    {
        self.registry
            .subscribe(None, false, Arc::new(move |s, p| callback(s, p)))
    }

    /// Wildcard variant of [`Session::once`].
    pub fn once_any<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<Session>, &Payload) + Send + Sync + 'static,
    {
        self.registry
            .subscribe(None, true, Arc::new(move |s, p| callback(s, p)))
    }

    fn subscribe_typed<T, F>(&self, callback: F, once: bool) -> Subscription
    where
        T: DispatchPayload,
        F: Fn(&Arc<Session>, &T) + Send + Sync + 'static,
    {
        let erased: Arc<Callback> = Arc::new(move |session, payload| {
            if let Some(event) = T::from_payload(payload) {
                callback(session, event);
            }
        });
        self.registry.subscribe(Some(T::kind()), once, erased)
    }

    /// Remove a registration. Safe to call from within an executing
    /// handler.
    ///
    /// Returns `false` if the registration was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.registry.unsubscribe(subscription)
    }

    /// Whether a registration is still listed.
    #[must_use]
    pub fn is_subscribed(&self, subscription: &Subscription) -> bool {
        self.registry.contains(subscription)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    // ─── Lifecycle ───

    /// Open the gateway connection and start dispatching events.
    ///
    /// Returns once the handshake is sent and the read path is running;
    /// the ready payload arrives through a handler.
    ///
    /// # Errors
    ///
    /// Fails if a connection is already open, the transport cannot be
    /// established, the handshake is malformed, or the identify gate is
    /// exhausted.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        {
            let mut st = self.state_lock();
            if st.status != Status::Disconnected {
                return Err(GatewayError::AlreadyOpen);
            }
            st.status = Status::Connecting;
        }

        match self.open(false).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state_lock().status = Status::Disconnected;
                Err(err)
            }
        }
    }

    /// Gracefully close the session.
    ///
    /// Signals the read task to stop after the frame it is processing,
    /// stops the heartbeat, and releases the write half. In-flight
    /// dispatch is not interrupted; close waits for it to finish, then
    /// emits the synthetic disconnect.
    pub async fn close(&self) {
        {
            let mut st = self.state_lock();
            if st.status == Status::Disconnected {
                return;
            }
            st.status = Status::Disconnected;
        }

        self.teardown().await;
        self.emit(Payload::Disconnect(Disconnect));
        info!("session closed");
    }

    /// Establish a physical connection: transport connect, hello,
    /// identify or resume, then start this generation's tasks.
    async fn open(&self, is_reconnect: bool) -> Result<(), GatewayError> {
        let url = self.config.gateway_url.clone();
        debug!(url = %url, transport = self.connector.name(), "opening gateway connection");

        let (mut sink, mut stream) = self.connector.connect(&url).await?;

        // The first frame must be hello, carrying the heartbeat interval.
        let hello = Self::read_hello(&mut stream).await?;
        let heartbeat_interval = Duration::from_millis(hello.heartbeat_interval);

        // Resume when we hold a prior session, identify otherwise.
        let resume_with = {
            let st = self.state_lock();
            st.session_id.clone().zip(st.sequence)
        };
        match resume_with {
            Some((session_id, seq)) => {
                self.state_lock().status = Status::Resuming;
                info!(session = %session_id, seq, "resuming session");
                let frame = envelope::encode(
                    OpCode::Resume,
                    &Resume {
                        token: self.config.token.clone(),
                        session_id,
                        seq,
                    },
                )?;
                sink.send_frame(frame).await?;
            }
            None => {
                self.acquire_identify()?;
                self.state_lock().status = Status::Identifying;
                debug!("identifying");
                let frame = envelope::encode(OpCode::Identify, &self.identify_payload())?;
                sink.send_frame(frame).await?;
            }
        }

        // A concurrent close supersedes this attempt.
        {
            let st = self.state_lock();
            if st.status == Status::Disconnected {
                return Err(GatewayError::NotOpen);
            }
        }

        *self.writer.lock().await = Some(sink);

        let generation = {
            let mut st = self.state_lock();
            st.generation += 1;
            st.heartbeat_interval = heartbeat_interval;
            st.heartbeat_acked = true;
            st.generation
        };

        // Emit before the read task starts so the synthetic connect
        // always precedes this generation's first dispatch.
        if is_reconnect {
            metrics::record_reconnect();
        }
        self.emit(Payload::Connect(Connect));

        let (stop_tx, stop_rx) = watch::channel(false);
        let read = tokio::spawn(Self::read_loop(
            self.arc(),
            stream,
            stop_rx.clone(),
            generation,
        ));
        let heartbeat = tokio::spawn(Self::heartbeat_loop(self.arc(), stop_rx, generation));
        *self.runtime_lock() = Some(Runtime {
            stop: stop_tx,
            read,
            heartbeat,
        });

        Ok(())
    }

    /// Take an identify token or report the gate as a synthetic event
    /// and an error.
    fn acquire_identify(&self) -> Result<(), GatewayError> {
        if let Err(retry_after) = self.limiter.try_acquire(IDENTIFY_BUCKET) {
            metrics::record_rate_limited(IDENTIFY_BUCKET);
            warn!(bucket = IDENTIFY_BUCKET, ?retry_after, "identify gate exhausted");
            self.emit(Payload::RateLimit(RateLimit {
                bucket: IDENTIFY_BUCKET.to_string(),
                retry_after,
            }));
            return Err(GatewayError::RateLimited {
                bucket: IDENTIFY_BUCKET.to_string(),
                retry_after,
            });
        }
        Ok(())
    }

    fn identify_payload(&self) -> Identify {
        Identify {
            token: self.config.token.clone(),
            properties: IdentifyProperties::default(),
            compress: None,
            large_threshold: Some(self.config.identity.large_threshold),
            shard: self.config.identity.shard,
            intents: self.config.identity.intents,
        }
    }

    async fn read_hello(stream: &mut Box<dyn FrameStream>) -> Result<Hello, GatewayError> {
        let raw = stream
            .next_frame()
            .await?
            .ok_or(GatewayError::Transport(ConnectionError::Closed))?;
        let env = envelope::decode(&raw)?;
        if env.op != OpCode::Hello {
            return Err(GatewayError::UnexpectedHandshake {
                expected: OpCode::Hello,
                received: env.op,
            });
        }
        let body = env.body.ok_or_else(|| {
            GatewayError::Envelope(EnvelopeError::Malformed("hello without body".to_string()))
        })?;
        serde_json::from_str(body.get())
            .map_err(|e| GatewayError::Envelope(EnvelopeError::Malformed(e.to_string())))
    }

    /// Stop this generation's tasks and release the write half.
    async fn teardown(&self) {
        let runtime = self.runtime_lock().take();
        if let Some(rt) = runtime {
            // Read and heartbeat both watch the stop channel; the read
            // task finishes its current frame (and any in-flight sync
            // dispatch) before exiting.
            let _ = rt.stop.send(true);
            let _ = rt.heartbeat.await;
            let _ = rt.read.await;
        }

        let sink = self.writer.lock().await.take();
        if let Some(mut sink) = sink {
            let _ = sink.close().await;
        }
    }

    // ─── Read path ───

    /// One dedicated read task per connection generation.
    async fn read_loop(
        session: Arc<Self>,
        mut stream: Box<dyn FrameStream>,
        mut stop: watch::Receiver<bool>,
        generation: u64,
    ) {
        debug!(generation, "read task started");
        loop {
            tokio::select! {
                _ = stop.changed() => {
                    debug!(generation, "read task stopping");
                    return;
                }
                frame = stream.next_frame() => match frame {
                    Ok(Some(raw)) => session.handle_frame(&raw).await,
                    Ok(None) => {
                        info!(generation, "gateway closed the connection");
                        session.on_transport_loss(generation);
                        return;
                    }
                    Err(err) => {
                        warn!(generation, error = %err, "transport error on read path");
                        session.on_transport_loss(generation);
                        return;
                    }
                }
            }
        }
    }

    async fn handle_frame(&self, raw: &str) {
        metrics::record_frame();
        let env = match envelope::decode(raw) {
            Ok(env) => env,
            Err(err) => {
                // Drop the frame, keep the connection.
                metrics::record_dropped_frame("malformed");
                warn!(error = %err, "dropping malformed envelope");
                return;
            }
        };

        if let Some(seq) = env.sequence {
            self.advance_sequence(seq);
        }

        match env.op {
            OpCode::Dispatch => self.handle_dispatch(env),
            OpCode::Heartbeat => {
                // The server may request an immediate heartbeat.
                let seq = self.sequence();
                if let Err(err) = self.send_heartbeat(seq).await {
                    warn!(error = %err, "requested heartbeat failed");
                }
            }
            OpCode::HeartbeatAck => {
                self.state_lock().heartbeat_acked = true;
            }
            OpCode::Reconnect => {
                info!("gateway requested reconnect");
                let generation = self.state_lock().generation;
                self.on_transport_loss(generation);
            }
            OpCode::InvalidSession => self.handle_invalid_session(env).await,
            OpCode::Hello => {
                // Mid-stream hello only refreshes the heartbeat interval.
                if let Some(body) = env.body.as_deref() {
                    if let Ok(hello) = serde_json::from_str::<Hello>(body.get()) {
                        self.state_lock().heartbeat_interval =
                            Duration::from_millis(hello.heartbeat_interval);
                    }
                }
            }
            other => {
                debug!(op = ?other, "ignoring client-to-server op from gateway");
            }
        }
    }

    fn handle_dispatch(&self, env: Envelope) {
        let Some(tag) = env.kind else {
            metrics::record_dropped_frame("untagged");
            warn!("dropping dispatch frame without kind tag");
            return;
        };

        let kind = EventKind::from_tag(&tag);
        let payload = match registry::decode_body(&kind, env.body.as_deref()) {
            Ok(payload) => payload,
            Err(err) => {
                // This payload only; the next frame is unaffected.
                metrics::record_dropped_frame("undecodable");
                warn!(kind = %kind, error = %err, "dropping undecodable payload");
                return;
            }
        };

        let completes_handshake = matches!(payload, Payload::Ready(_) | Payload::Resumed(_));
        match &payload {
            Payload::Ready(ready) => {
                let mut st = self.state_lock();
                st.session_id = Some(ready.session_id.clone());
                st.status = Status::Ready;
                info!(session = %ready.session_id, "session ready");
            }
            Payload::Resumed(_) => {
                info!(seq = ?self.sequence(), "session resumed");
            }
            _ => {}
        }

        self.dispatcher.dispatch(&self.arc(), &self.registry, payload);

        if completes_handshake {
            self.state_lock().status = Status::Connected;
        }
    }

    async fn handle_invalid_session(&self, env: Envelope) {
        let resumable = env
            .body
            .as_deref()
            .and_then(|b| serde_json::from_str::<bool>(b.get()).ok())
            .unwrap_or(false);
        warn!(resumable, "session invalidated by gateway");

        // Resume rejected outright: forget the session and fall back to
        // a fresh identify on the same connection.
        let resume_with = if resumable {
            let st = self.state_lock();
            st.session_id.clone().zip(st.sequence)
        } else {
            let mut st = self.state_lock();
            st.session_id = None;
            st.sequence = None;
            None
        };

        let frame = match resume_with {
            Some((session_id, seq)) => {
                self.state_lock().status = Status::Resuming;
                envelope::encode(
                    OpCode::Resume,
                    &Resume {
                        token: self.config.token.clone(),
                        session_id,
                        seq,
                    },
                )
            }
            None => {
                if self.acquire_identify().is_err() {
                    return;
                }
                self.state_lock().status = Status::Identifying;
                envelope::encode(OpCode::Identify, &self.identify_payload())
            }
        };

        match frame {
            Ok(frame) => {
                if let Err(err) = self.send_frame(frame).await {
                    warn!(error = %err, "handshake after invalid session failed");
                }
            }
            Err(err) => error!(error = %err, "encoding handshake after invalid session"),
        }
    }

    /// Advance the sequence to `max(current, received)`; duplicates and
    /// out-of-order frames never regress it.
    fn advance_sequence(&self, seq: u64) {
        let mut st = self.state_lock();
        st.sequence = Some(st.sequence.map_or(seq, |current| current.max(seq)));
    }

    // ─── Heartbeat ───

    async fn heartbeat_loop(session: Arc<Self>, mut stop: watch::Receiver<bool>, generation: u64) {
        let interval = session.state_lock().heartbeat_interval;
        debug!(generation, interval = ?interval, "heartbeat task started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first heartbeat
        // should wait a full interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = stop.changed() => {
                    debug!(generation, "heartbeat task stopping");
                    return;
                }
                _ = ticker.tick() => {
                    let (seq, acked) = {
                        let mut st = session.state_lock();
                        let acked = st.heartbeat_acked;
                        st.heartbeat_acked = false;
                        (st.sequence, acked)
                    };

                    // A heartbeat that was never acknowledged means the
                    // link is dead even if the socket looks open.
                    if !acked {
                        warn!(generation, "heartbeat ack missing, treating connection as lost");
                        session.on_transport_loss(generation);
                        return;
                    }

                    if let Err(err) = session.send_heartbeat(seq).await {
                        warn!(generation, error = %err, "heartbeat send failed");
                        session.on_transport_loss(generation);
                        return;
                    }
                }
            }
        }
    }

    async fn send_heartbeat(&self, seq: Option<u64>) -> Result<(), GatewayError> {
        let frame = envelope::encode(OpCode::Heartbeat, &seq)?;
        self.send_frame(frame).await?;
        metrics::record_heartbeat();
        Ok(())
    }

    // ─── Reconnect ───

    /// Entered from the read or heartbeat task of `generation` when the
    /// transport is lost. The teardown work runs on its own task so the
    /// caller can return and be joined.
    fn on_transport_loss(&self, generation: u64) {
        let session = self.arc();
        tokio::spawn(async move {
            session.handle_transport_loss(generation).await;
        });
    }

    async fn handle_transport_loss(&self, generation: u64) {
        let reconnect = self.config.reconnect.enabled;

        // Claim the transition; a stale generation or a second reporter
        // of the same loss backs off here.
        {
            let mut st = self.state_lock();
            if st.generation != generation || !st.status.is_open() {
                return;
            }
            st.status = if reconnect {
                Status::Reconnecting
            } else {
                Status::Disconnected
            };
        }

        self.teardown().await;
        self.emit(Payload::Disconnect(Disconnect));

        if reconnect {
            self.reconnect_loop().await;
        } else {
            info!("transport lost, reconnect disabled");
        }
    }

    /// Re-open with doubling backoff until connected or closed. Resumes
    /// when a prior session id and sequence are held; a rejected resume
    /// degrades to a fresh identify via the invalid-session path.
    async fn reconnect_loop(&self) {
        let mut wait = Duration::from_millis(self.config.reconnect.initial_backoff_ms);
        let cap = Duration::from_millis(self.config.reconnect.max_backoff_ms);

        loop {
            {
                let mut st = self.state_lock();
                if st.status != Status::Reconnecting {
                    // Closed (or already reconnected) while waiting.
                    return;
                }
                st.status = Status::Connecting;
            }

            info!("attempting reconnect");
            match self.open(true).await {
                Ok(()) => {
                    info!("reconnected");
                    return;
                }
                Err(GatewayError::RateLimited { retry_after, .. }) => {
                    if !self.back_to_reconnecting() {
                        return;
                    }
                    let delay = retry_after.max(wait);
                    debug!(delay = ?delay, "identify gated, delaying reconnect");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(error = %err, next_attempt = ?wait, "reconnect attempt failed");
                    if !self.back_to_reconnecting() {
                        return;
                    }
                    tokio::time::sleep(wait).await;
                    wait = (wait * 2).min(cap);
                }
            }
        }
    }

    /// Restore `Reconnecting` after a failed attempt unless the user
    /// closed the session meanwhile.
    fn back_to_reconnecting(&self) -> bool {
        let mut st = self.state_lock();
        if st.status == Status::Disconnected {
            return false;
        }
        st.status = Status::Reconnecting;
        true
    }

    // ─── Outbound ───

    /// All outbound frames funnel through the write lock so frames from
    /// handlers, callers, and the heartbeat never interleave.
    async fn send_frame(&self, frame: String) -> Result<(), GatewayError> {
        let mut writer = self.writer.lock().await;
        match writer.as_mut() {
            Some(sink) => Ok(sink.send_frame(frame).await?),
            None => Err(GatewayError::NotOpen),
        }
    }

    /// Update the client's presence.
    ///
    /// # Errors
    ///
    /// Fails when no connection is open or the transport rejects the
    /// write.
    pub async fn update_presence(&self, presence: &UpdatePresence) -> Result<(), GatewayError> {
        let frame = envelope::encode(OpCode::UpdatePresence, presence)?;
        self.send_frame(frame).await
    }

    /// Request guild member chunks; results arrive as
    /// guild-members-chunk payloads.
    ///
    /// # Errors
    ///
    /// Fails when no connection is open or the transport rejects the
    /// write.
    pub async fn request_guild_members(
        &self,
        request: &RequestGuildMembers,
    ) -> Result<(), GatewayError> {
        let frame = envelope::encode(OpCode::RequestGuildMembers, request)?;
        self.send_frame(frame).await
    }

    // ─── Dispatch plumbing ───

    /// Route a synthetic payload through the same pipeline as
    /// wire-sourced payloads.
    fn emit(&self, payload: Payload) {
        self.dispatcher.dispatch(&self.arc(), &self.registry, payload);
    }

    #[cfg(test)]
    pub(crate) fn dispatch_payload(&self, payload: Payload) {
        self.dispatcher.dispatch(&self.arc(), &self.registry, payload);
    }
}
