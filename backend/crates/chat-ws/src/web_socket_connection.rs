use crate::error::{CLOSE_GOING_AWAY, CLOSE_NORMAL};
use crate::{
    ConnectionConfig, ConnectionId, ConnectionRateLimiter, MessageValidator, Metrics,
    Result as WsErrorResult, ShutdownGuard, WsError,
};

use chat_core::Message;
use chat_hub::{BroadcastHub, CloseReason, HubError, Subscription};

use std::panic::Location;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message as WsMessage, WebSocket};
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc::{
    self,
    error::{SendTimeoutError, TrySendError},
};
use tokio::time::{Instant, MissedTickBehavior};

/// Rate-limited messages tolerated in a row before the connection is closed
pub const MAX_VIOLATIONS: u32 = 5;

/// How long the writer gets to flush the final frames
const SEND_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a connection ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disconnect {
    ClientClosed,
    ServerShutdown,
    HubClosed,
    Unsubscribed,
}

impl Disconnect {
    fn as_str(&self) -> &'static str {
        match self {
            Self::ClientClosed => "client_closed",
            Self::ServerShutdown => "server_shutdown",
            Self::HubClosed => "hub_closed",
            Self::Unsubscribed => "unsubscribed",
        }
    }

    /// Close frame to send, `None` when the client already started the close handshake
    fn close_code(&self) -> Option<u16> {
        match self {
            Self::ClientClosed => None,
            Self::ServerShutdown | Self::HubClosed => Some(CLOSE_GOING_AWAY),
            Self::Unsubscribed => Some(CLOSE_NORMAL),
        }
    }
}

/// Bridges one WebSocket to the broadcast hub.
///
/// Inbound text frames are validated, rate limited and published; every
/// message the hub delivers to this connection's subscription is written
/// back as a JSON text frame.
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    config: ConnectionConfig,
    metrics: Metrics,
    rate_limiter: ConnectionRateLimiter,
    validator: MessageValidator,
    hub: BroadcastHub,
    violations: u32,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        config: ConnectionConfig,
        metrics: Metrics,
        rate_limiter: ConnectionRateLimiter,
        validator: MessageValidator,
        hub: BroadcastHub,
    ) -> Self {
        Self {
            connection_id,
            config,
            metrics,
            rate_limiter,
            validator,
            hub,
            violations: 0,
        }
    }

    /// Run the connection until the client leaves, the hub drops the
    /// subscription, or the server shuts down.
    pub async fn handle(
        mut self,
        socket: WebSocket,
        mut subscription: Subscription,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let subscription_id = subscription.id();
        info!(
            "WebSocket connection {} established (subscription {}, {} replayed)",
            self.connection_id,
            subscription_id,
            subscription.pending_backlog()
        );
        if subscription.missed() > 0 {
            warn!(
                "Connection {} resumed with {} messages no longer in the replay window",
                self.connection_id,
                subscription.missed()
            );
        }

        self.metrics.connection_established();

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Bounded; staying full ends this connection as a slow consumer
        let (tx, mut rx) = mpsc::channel::<WsMessage>(self.config.send_buffer_size.max(1));

        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let closing = matches!(msg, WsMessage::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }
        });

        let interval = self.config.heartbeat_interval();
        let mut heartbeat = tokio::time::interval_at(Instant::now() + interval, interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_activity = Instant::now();

        let result = loop {
            tokio::select! {
                frame = ws_receiver.next() => {
                    match frame {
                        Some(Ok(frame)) => {
                            last_activity = Instant::now();
                            match self.handle_client_frame(frame).await {
                                Ok(None) => {}
                                Ok(Some(disconnect)) => break Ok(disconnect),
                                Err(e) => break Err(e),
                            }
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error on connection {}: {}", self.connection_id, e);
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            info!("Connection {} closed by client", self.connection_id);
                            break Ok(Disconnect::ClientClosed);
                        }
                    }
                }

                delivery = subscription.next() => {
                    match delivery {
                        Some(message) => {
                            // The other arms are not polled while this waits
                            tokio::select! {
                                sent = self.forward(&message, &tx) => {
                                    if let Err(e) = sent {
                                        break Err(e);
                                    }
                                }
                                _ = shutdown_guard.wait() => {
                                    info!("Shutting down connection {} gracefully", self.connection_id);
                                    break Ok(Disconnect::ServerShutdown);
                                }
                            }
                        }
                        None => break self.subscription_ended(&subscription),
                    }
                }

                _ = heartbeat.tick() => {
                    if last_activity.elapsed() > self.config.heartbeat_timeout() {
                        warn!(
                            "Connection {} silent for over {}s, closing",
                            self.connection_id,
                            self.config.heartbeat_timeout_secs
                        );
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: self.config.heartbeat_timeout_secs,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    match tx.try_send(WsMessage::Ping(Bytes::new())) {
                        Ok(()) => {}
                        // Writer is backed up; the next delivery decides
                        Err(TrySendError::Full(_)) => {
                            debug!("Send buffer full, skipping ping for {}", self.connection_id);
                        }
                        Err(TrySendError::Closed(_)) => {
                            break Err(WsError::SendBufferClosed {
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down connection {} gracefully", self.connection_id);
                    break Ok(Disconnect::ServerShutdown);
                }
            }
        };

        let (close_code, reason) = match &result {
            Ok(disconnect) => (disconnect.close_code(), disconnect.as_str()),
            Err(e) => (Some(e.close_code()), e.error_code()),
        };
        if let Some(code) = close_code {
            let frame = CloseFrame {
                code,
                reason: reason.into(),
            };
            // The writer may already be gone or full; the close frame is best effort
            let _ = tx.try_send(WsMessage::Close(Some(frame)));
        }

        drop(tx);
        let abort = send_task.abort_handle();
        if tokio::time::timeout(SEND_DRAIN_TIMEOUT, send_task)
            .await
            .is_err()
        {
            warn!(
                "Connection {} writer did not drain in time, aborting",
                self.connection_id
            );
            abort.abort();
        }

        self.hub.unsubscribe(subscription_id).await;
        drop(subscription);

        self.metrics.connection_closed(reason);
        if result.is_err() {
            self.metrics.error_occurred(reason);
        }

        info!(
            "WebSocket connection {} closed ({reason})",
            self.connection_id
        );

        result.map(|_| ())
    }

    async fn handle_client_frame(&mut self, frame: WsMessage) -> WsErrorResult<Option<Disconnect>> {
        match frame {
            WsMessage::Text(text) => self.handle_chat_text(text.as_str()).await,
            WsMessage::Binary(data) => {
                warn!(
                    "Binary frame ({} bytes) from connection {}",
                    data.len(),
                    self.connection_id
                );
                self.metrics.message_rejected("binary");
                Err(WsError::UnsupportedFrame {
                    kind: "binary",
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            // tungstenite answers pings on its own; both only count as activity
            WsMessage::Ping(_) | WsMessage::Pong(_) => Ok(None),
            WsMessage::Close(_) => {
                info!("Received close frame from connection {}", self.connection_id);
                Ok(Some(Disconnect::ClientClosed))
            }
        }
    }

    /// Publish one chat message from the client
    async fn handle_chat_text(&mut self, text: &str) -> WsErrorResult<Option<Disconnect>> {
        if let Err(e) = self.rate_limiter.check() {
            self.violations += 1;
            self.metrics.message_rejected("rate_limited");
            if self.violations >= MAX_VIOLATIONS {
                warn!(
                    "Connection {} exceeded the rate limit {} times in a row, closing",
                    self.connection_id, self.violations
                );
                return Err(e);
            }
            warn!(
                "Rate limit exceeded for connection {}, message dropped ({}/{})",
                self.connection_id, self.violations, MAX_VIOLATIONS
            );
            return Ok(None);
        }
        self.violations = 0;

        match self.validator.validate_body(text) {
            Ok(()) => {}
            Err(WsError::EmptyMessage { .. }) => {
                debug!("Ignoring empty message from connection {}", self.connection_id);
                self.metrics.message_rejected("empty");
                return Ok(None);
            }
            Err(e) => {
                warn!("Rejected message from connection {}: {}", self.connection_id, e);
                self.metrics.message_rejected(e.error_code());
                return Err(e);
            }
        }

        let started = Instant::now();
        let published = self.hub.publish(text).await;
        self.metrics.publish_latency(started.elapsed());

        match published {
            Ok(message) => {
                debug!(
                    "Connection {} published message {}",
                    self.connection_id, message.sequence
                );
                self.metrics.message_received();
                Ok(None)
            }
            Err(HubError::Closed { .. }) => Ok(Some(Disconnect::HubClosed)),
            Err(e) => Err(e.into()),
        }
    }

    /// Encode a delivered message and queue it for the socket writer.
    ///
    /// Waits at most `heartbeat_timeout` for room in the send buffer. A buffer
    /// that stays full that long means the peer stopped reading, and the
    /// connection is ended as a slow consumer.
    pub(crate) async fn forward(
        &self,
        message: &Message,
        tx: &mpsc::Sender<WsMessage>,
    ) -> WsErrorResult<()> {
        let json = message.to_json()?;

        match tx
            .send_timeout(WsMessage::Text(json.into()), self.config.heartbeat_timeout())
            .await
        {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(
                    "Connection {} send buffer of {} stayed full for {}s, peer is not reading",
                    self.connection_id,
                    self.config.send_buffer_size,
                    self.config.heartbeat_timeout_secs
                );
                return Err(WsError::SubscriptionOverflow {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(SendTimeoutError::Closed(_)) => {
                return Err(WsError::SendBufferClosed {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        self.metrics.message_sent();
        Ok(())
    }

    fn subscription_ended(&self, subscription: &Subscription) -> WsErrorResult<Disconnect> {
        match subscription.close_reason() {
            Some(CloseReason::Overflow) => {
                warn!(
                    "Connection {} fell behind and was dropped by the hub",
                    self.connection_id
                );
                Err(WsError::SubscriptionOverflow {
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Some(CloseReason::HubShutdown) => Ok(Disconnect::HubClosed),
            Some(CloseReason::Unsubscribed) | None => Ok(Disconnect::Unsubscribed),
        }
    }
}
