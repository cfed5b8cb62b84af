use crate::{CloseReason, SubscriptionId, SubscriptionState};

use chat_core::Message;

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// State shared between a subscription and its registry entry in the hub
#[derive(Debug, Default)]
pub(crate) struct SubscriptionShared {
    close_reason: OnceLock<CloseReason>,
}

impl SubscriptionShared {
    /// Record why the live feed ended; the first reason wins
    pub(crate) fn mark_closed(&self, reason: CloseReason) {
        let _ = self.close_reason.set(reason);
    }

    pub(crate) fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason.get().copied()
    }
}

/// One consumer's view into the hub.
///
/// Yields the replay snapshot captured at registration, then every message
/// published after it, in publish order. Implements [`Stream`]; the stream
/// ends once the live feed is cut and everything already queued was read.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    backlog: VecDeque<Arc<Message>>,
    receiver: mpsc::Receiver<Arc<Message>>,
    shared: Arc<SubscriptionShared>,
    missed: u64,
    finished: bool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        backlog: Vec<Arc<Message>>,
        receiver: mpsc::Receiver<Arc<Message>>,
        shared: Arc<SubscriptionShared>,
        missed: u64,
    ) -> Self {
        Self {
            id,
            backlog: backlog.into(),
            receiver,
            shared,
            missed,
            finished: false,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn state(&self) -> SubscriptionState {
        if self.finished {
            SubscriptionState::Closed
        } else if self.shared.close_reason().is_some() {
            SubscriptionState::Draining
        } else {
            SubscriptionState::Active
        }
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.shared.close_reason()
    }

    /// Snapshot messages not yet read
    pub fn pending_backlog(&self) -> usize {
        self.backlog.len()
    }

    /// Messages a resumed subscription asked for but the replay window had already evicted
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Cut the live feed. Messages already queued can still be drained.
    pub fn close(&mut self) {
        self.shared.mark_closed(CloseReason::Unsubscribed);
        self.receiver.close();
    }

    /// Wait for the next message; `None` once the subscription is closed
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.next().await
    }

    /// Take the next message if one is ready without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        if let Some(message) = self.backlog.pop_front() {
            return Some(message);
        }
        if self.finished {
            return None;
        }

        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        // Every hub-side removal records a reason first, so an unset reason
        // here means the hub itself was dropped.
        self.shared.mark_closed(CloseReason::HubShutdown);
        self.finished = true;
    }
}

impl Stream for Subscription {
    type Item = Arc<Message>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(message) = this.backlog.pop_front() {
            return Poll::Ready(Some(message));
        }
        if this.finished {
            return Poll::Ready(None);
        }

        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(message)) => Poll::Ready(Some(message)),
            Poll::Ready(None) => {
                this.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.backlog.len(), None)
    }
}
