//! In-memory message queue with per-delivery acknowledgement.
//!
//! Models the consumer side of a durable broker queue: messages handed out are
//! tracked as unacked until settled, requeued messages come back flagged as
//! redelivered, and rejected-without-requeue messages land in a dead-letter list.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;

use crate::core::{BackendError, Delivery, DeliverySource, TransportError};

#[derive(Debug, Clone)]
struct Message {
    body: Vec<u8>,
    redelivered: bool,
}

#[derive(Default)]
struct BrokerState {
    ready: VecDeque<Message>,
    unacked: BTreeMap<u64, Message>,
    dead_letters: Vec<Vec<u8>>,
    next_tag: u64,
    acked: u64,
    requeued: u64,
    closed: bool,
}

#[derive(Default)]
struct Inner {
    state: Mutex<BrokerState>,
    notify: Notify,
}

enum Take {
    Ready(InMemoryDelivery),
    Empty,
    Closed,
}

/// Counters describing queue contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Messages waiting to be delivered.
    pub ready: usize,
    /// Messages delivered and not yet settled.
    pub unacked: usize,
    /// Messages rejected without requeue.
    pub dead_lettered: usize,
    /// Total acknowledgements.
    pub acked: u64,
    /// Total rejections with requeue.
    pub requeued: u64,
}

/// In-process queue implementing [`DeliverySource`].
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    inner: Arc<Inner>,
}

impl InMemoryBroker {
    /// Create an empty open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a raw message body.
    pub fn publish(&self, body: impl Into<Vec<u8>>) {
        self.inner.state.lock().ready.push_back(Message {
            body: body.into(),
            redelivered: false,
        });
        self.inner.notify.notify_one();
    }

    /// Serialize `payload` as JSON and enqueue it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Serialization`] if the payload cannot be encoded.
    pub fn publish_json<T: Serialize>(&self, payload: &T) -> Result<(), BackendError> {
        self.publish(serde_json::to_vec(payload)?);
        Ok(())
    }

    /// Stop handing out messages; pending `recv` calls return `None`.
    ///
    /// Deliveries already handed out can still be settled.
    pub fn close(&self) {
        self.inner.state.lock().closed = true;
        self.inner.notify.notify_waiters();
    }

    /// Return every unsettled delivery to the front of the queue, flagged as redelivered.
    ///
    /// This is what a broker does when a consumer goes away mid-cycle.
    pub fn recover(&self) -> usize {
        let mut state = self.inner.state.lock();
        let unacked = std::mem::take(&mut state.unacked);
        let count = unacked.len();
        for (_, mut msg) in unacked.into_iter().rev() {
            msg.redelivered = true;
            state.ready.push_front(msg);
        }
        drop(state);
        if count > 0 {
            self.inner.notify.notify_one();
        }
        count
    }

    /// Snapshot of queue counters.
    pub fn stats(&self) -> QueueStats {
        let state = self.inner.state.lock();
        QueueStats {
            ready: state.ready.len(),
            unacked: state.unacked.len(),
            dead_lettered: state.dead_letters.len(),
            acked: state.acked,
            requeued: state.requeued,
        }
    }

    /// Bodies of messages rejected without requeue.
    pub fn dead_letters(&self) -> Vec<Vec<u8>> {
        self.inner.state.lock().dead_letters.clone()
    }

    fn try_take(&self) -> Take {
        let mut state = self.inner.state.lock();
        if let Some(msg) = state.ready.pop_front() {
            state.next_tag += 1;
            let tag = state.next_tag;
            state.unacked.insert(tag, msg.clone());
            return Take::Ready(InMemoryDelivery {
                tag,
                body: msg.body,
                redelivered: msg.redelivered,
                broker: Arc::downgrade(&self.inner),
            });
        }
        if state.closed {
            Take::Closed
        } else {
            Take::Empty
        }
    }
}

#[async_trait]
impl DeliverySource for InMemoryBroker {
    type Delivery = InMemoryDelivery;

    async fn recv(&self) -> Option<InMemoryDelivery> {
        loop {
            let notified = self.inner.notify.notified();
            match self.try_take() {
                Take::Ready(delivery) => return Some(delivery),
                Take::Empty => notified.await,
                Take::Closed => return None,
            }
        }
    }
}

/// A message handed out by [`InMemoryBroker`].
#[derive(Debug)]
pub struct InMemoryDelivery {
    tag: u64,
    body: Vec<u8>,
    redelivered: bool,
    broker: Weak<Inner>,
}

impl InMemoryDelivery {
    fn take_unacked(&self) -> Result<(Arc<Inner>, Message), TransportError> {
        let inner = self.broker.upgrade().ok_or(TransportError::ChannelClosed)?;
        let msg = inner
            .state
            .lock()
            .unacked
            .remove(&self.tag)
            .ok_or(TransportError::UnknownDeliveryTag(self.tag))?;
        Ok((inner, msg))
    }
}

#[async_trait]
impl Delivery for InMemoryDelivery {
    fn delivery_tag(&self) -> u64 {
        self.tag
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn redelivered(&self) -> bool {
        self.redelivered
    }

    async fn ack(self) -> Result<(), TransportError> {
        let (inner, _) = self.take_unacked()?;
        inner.state.lock().acked += 1;
        Ok(())
    }

    async fn reject(self, requeue: bool) -> Result<(), TransportError> {
        let (inner, mut msg) = self.take_unacked()?;
        let mut state = inner.state.lock();
        if requeue {
            msg.redelivered = true;
            state.ready.push_back(msg);
            state.requeued += 1;
            drop(state);
            inner.notify.notify_one();
        } else {
            state.dead_letters.push(msg.body);
        }
        Ok(())
    }
}
