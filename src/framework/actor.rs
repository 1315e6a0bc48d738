//! # Cache Actor
//!
//! `CacheActor<T>` owns the client-side copy of one backend resource list and is the only
//! place that list is ever mutated. It processes requests one at a time, so the list needs
//! no lock.
//!
//! ## Writes
//!
//! `Insert`, `Replace` and `Remove` are applied to the list first and acknowledged
//! immediately; the backend request runs in a spawned task. Each such write is tracked as
//! a *pending write* under a [`WriteTicket`]. When the task finishes it sends a settlement
//! back into the actor's loop, where it is applied on its own, in arrival order. Writes are
//! never serialized against each other.
//!
//! ## Settlement under [`WritePolicy::Reconcile`]
//!
//! Every cached entity sits in a slot carrying a revision that changes on each local edit.
//! A settlement only touches its slot if the revision is still the one its write produced:
//!
//! | Write   | Confirmed                               | Failed                                  |
//! |---------|-----------------------------------------|-----------------------------------------|
//! | Insert  | adopt the stored entity (server id)     | drop the inserted entity                |
//! | Replace | adopt the stored entity                 | restore the previous entity             |
//! | Remove  | nothing                                 | put the entity back unless its id is in use again |
//!
//! Under [`WritePolicy::Optimistic`] settlements only end the tracking.
//!
//! ## Shutdown
//!
//! When every client is dropped the actor stops accepting requests, waits for the pending
//! writes to settle, then exits.

use crate::api::{ApiClient, ApiError};
use crate::framework::message::Settlement;
use crate::framework::{
    BackendContext, CacheClient, CacheRequest, CachedEntity, Response, WritePolicy, WriteTicket,
};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct Slot<T> {
    key: u64,
    revision: u64,
    item: T,
}

enum PendingWrite<T: CachedEntity> {
    Insert {
        key: u64,
        revision: u64,
    },
    Replace {
        id: T::Id,
        key: Option<u64>,
        revision: u64,
        previous: Option<T>,
    },
    Remove {
        id: T::Id,
        removed: Option<(usize, T)>,
    },
}

enum WriteOp<T: CachedEntity> {
    Save(T),
    Delete(T::Id),
}

impl<T: CachedEntity> WriteOp<T> {
    async fn send(self, api: &ApiClient) -> Result<Option<T>, ApiError> {
        match self {
            WriteOp::Save(item) => {
                let body = serde_json::to_value(&item)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                let stored = api.backend().post_json(T::RESOURCE, body).await?;
                if stored.is_null() {
                    return Ok(None);
                }
                match serde_json::from_value(stored) {
                    Ok(entity) => Ok(Some(entity)),
                    Err(e) => {
                        // The write itself went through.
                        warn!(resource = T::RESOURCE, error = %e, "Unreadable write confirmation");
                        Ok(None)
                    }
                }
            }
            WriteOp::Delete(id) => api.remove(T::RESOURCE, id.into()).await.map(|()| None),
        }
    }
}

/// The actor holding one cached resource list.
pub struct CacheActor<T: CachedEntity> {
    receiver: mpsc::Receiver<CacheRequest<T>>,
    settlements: mpsc::UnboundedReceiver<Settlement<T>>,
    settle_to: mpsc::UnboundedSender<Settlement<T>>,
    policy: WritePolicy,
    slots: Vec<Slot<T>>,
    pending: HashMap<WriteTicket, PendingWrite<T>>,
    flush_waiters: Vec<Response<()>>,
    clock: u64,
    next_ticket: u64,
}

impl<T: CachedEntity> CacheActor<T> {
    /// Creates the actor and its client. The actor does nothing until [`run`](Self::run).
    pub fn new(buffer_size: usize, policy: WritePolicy) -> (Self, CacheClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settle_to, settlements) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            settlements,
            settle_to,
            policy,
            slots: Vec::new(),
            pending: HashMap::new(),
            flush_waiters: Vec::new(),
            clock: 0,
            next_ticket: 0,
        };
        (actor, CacheClient::new(sender))
    }

    /// Runs the event loop until every client is gone and no write is pending.
    ///
    /// The context is injected here rather than in `new` so that actors can be created
    /// before the backend client they write through.
    pub async fn run(mut self, context: BackendContext) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, policy = %self.policy, "Actor started");

        let mut accepting = true;
        loop {
            tokio::select! {
                request = self.receiver.recv(), if accepting => match request {
                    Some(request) => self.handle(request, &context, entity_type),
                    None => {
                        accepting = false;
                        debug!(entity_type, pending = self.pending.len(), "Draining writes");
                    }
                },
                Some(settlement) = self.settlements.recv() => self.settle(settlement, entity_type),
                else => break,
            }
            if !accepting && self.pending.is_empty() {
                break;
            }
        }

        info!(entity_type, size = self.slots.len(), "Shutdown");
    }

    fn handle(&mut self, request: CacheRequest<T>, context: &BackendContext, entity_type: &str) {
        match request {
            CacheRequest::Snapshot { respond_to } => {
                let items: Vec<T> = self.slots.iter().map(|slot| slot.item.clone()).collect();
                let _ = respond_to.send(Ok(items));
            }
            CacheRequest::Get { id, respond_to } => {
                let item = self.find(id).map(|index| self.slots[index].item.clone());
                debug!(entity_type, %id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            CacheRequest::Load { items, respond_to } => {
                self.slots = items
                    .into_iter()
                    .map(|item| {
                        let key = self.tick();
                        Slot {
                            key,
                            revision: key,
                            item,
                        }
                    })
                    .collect();
                info!(entity_type, size = self.slots.len(), "Loaded");
                let _ = respond_to.send(Ok(self.slots.len()));
            }
            CacheRequest::Insert { item, respond_to } => {
                let key = self.tick();
                self.slots.push(Slot {
                    key,
                    revision: key,
                    item: item.clone(),
                });
                let ticket = self.begin_write(
                    PendingWrite::Insert { key, revision: key },
                    WriteOp::Save(item),
                    context,
                );
                info!(entity_type, %ticket, size = self.slots.len(), "Inserted");
                let _ = respond_to.send(Ok(ticket));
            }
            CacheRequest::Replace {
                id,
                mut item,
                respond_to,
            } => {
                item.set_id(id);
                let revision = self.tick();
                let (key, previous) = match self.find(id) {
                    Some(index) => {
                        let slot = &mut self.slots[index];
                        slot.revision = revision;
                        let previous = std::mem::replace(&mut slot.item, item.clone());
                        (Some(slot.key), Some(previous))
                    }
                    None => {
                        debug!(entity_type, %id, "Not cached, sending anyway");
                        (None, None)
                    }
                };
                let ticket = self.begin_write(
                    PendingWrite::Replace {
                        id,
                        key,
                        revision,
                        previous,
                    },
                    WriteOp::Save(item),
                    context,
                );
                info!(entity_type, %id, %ticket, "Replaced");
                let _ = respond_to.send(Ok(ticket));
            }
            CacheRequest::Remove { id, respond_to } => {
                let removed = self
                    .find(id)
                    .map(|index| (index, self.slots.remove(index).item));
                if removed.is_none() {
                    debug!(entity_type, %id, "Not cached, sending anyway");
                }
                let ticket = self.begin_write(
                    PendingWrite::Remove { id, removed },
                    WriteOp::Delete(id),
                    context,
                );
                info!(entity_type, %id, %ticket, size = self.slots.len(), "Removed");
                let _ = respond_to.send(Ok(ticket));
            }
            CacheRequest::Flush { respond_to } => {
                if self.pending.is_empty() {
                    let _ = respond_to.send(Ok(()));
                } else {
                    self.flush_waiters.push(respond_to);
                }
            }
            CacheRequest::PendingWrites { respond_to } => {
                let _ = respond_to.send(Ok(self.pending.len()));
            }
        }
    }

    fn begin_write(
        &mut self,
        write: PendingWrite<T>,
        op: WriteOp<T>,
        context: &BackendContext,
    ) -> WriteTicket {
        self.next_ticket += 1;
        let ticket = WriteTicket(self.next_ticket);
        self.pending.insert(ticket, write);

        let context = context.clone();
        let settle_to = self.settle_to.clone();
        tokio::spawn(async move {
            let outcome = op.send(&context.api).await;
            if let Err(e) = &outcome {
                context.report(e);
            }
            let _ = settle_to.send(Settlement { ticket, outcome });
        });
        ticket
    }

    fn settle(&mut self, settlement: Settlement<T>, entity_type: &str) {
        let Settlement { ticket, outcome } = settlement;
        let Some(write) = self.pending.remove(&ticket) else {
            return;
        };

        match (outcome, self.policy) {
            (Ok(confirmed), WritePolicy::Reconcile) => {
                debug!(entity_type, %ticket, "Write confirmed");
                if let Some(entity) = confirmed {
                    self.adopt(write, entity, entity_type);
                }
            }
            (Ok(_), WritePolicy::Optimistic) => debug!(entity_type, %ticket, "Write confirmed"),
            (Err(e), WritePolicy::Reconcile) => {
                warn!(entity_type, %ticket, error = %e, "Write failed, reverting");
                self.roll_back(write, entity_type);
            }
            (Err(e), WritePolicy::Optimistic) => {
                warn!(entity_type, %ticket, error = %e, "Write failed, cache now differs from backend");
            }
        }

        if self.pending.is_empty() {
            for waiter in self.flush_waiters.drain(..) {
                let _ = waiter.send(Ok(()));
            }
        }
    }

    fn adopt(&mut self, write: PendingWrite<T>, mut entity: T, entity_type: &str) {
        match write {
            PendingWrite::Insert { key, revision } => {
                let Some(slot) = self.slots.iter_mut().find(|slot| slot.key == key) else {
                    return;
                };
                if slot.revision == revision {
                    slot.item.merge_confirmed(entity);
                    debug!(entity_type, id = ?slot.item.id(), "Adopted stored entity");
                } else if let (None, Some(id)) = (slot.item.id(), entity.id()) {
                    slot.item.set_id(id);
                    debug!(entity_type, %id, "Adopted server id");
                }
            }
            PendingWrite::Replace {
                id,
                key: Some(key),
                revision,
                ..
            } => {
                if entity.id().is_none() {
                    entity.set_id(id);
                }
                if let Some(slot) = self
                    .slots
                    .iter_mut()
                    .find(|slot| slot.key == key && slot.revision == revision)
                {
                    slot.item.merge_confirmed(entity);
                    debug!(entity_type, %id, "Adopted stored entity");
                }
            }
            PendingWrite::Replace { key: None, .. } | PendingWrite::Remove { .. } => {}
        }
    }

    fn roll_back(&mut self, write: PendingWrite<T>, entity_type: &str) {
        match write {
            PendingWrite::Insert { key, revision } => {
                let position = self
                    .slots
                    .iter()
                    .position(|slot| slot.key == key && slot.revision == revision);
                match position {
                    Some(index) => {
                        self.slots.remove(index);
                        info!(entity_type, size = self.slots.len(), "Insert reverted");
                    }
                    None => debug!(entity_type, "Insert superseded, keeping local state"),
                }
            }
            PendingWrite::Replace {
                id,
                key: Some(key),
                revision,
                previous: Some(previous),
            } => {
                let stamp = self.tick();
                match self
                    .slots
                    .iter_mut()
                    .find(|slot| slot.key == key && slot.revision == revision)
                {
                    Some(slot) => {
                        slot.item = previous;
                        slot.revision = stamp;
                        info!(entity_type, %id, "Replace reverted");
                    }
                    None => debug!(entity_type, %id, "Replace superseded, keeping local state"),
                }
            }
            PendingWrite::Remove {
                id,
                removed: Some((index, item)),
            } => {
                if self.find(id).is_some() {
                    debug!(entity_type, %id, "Remove superseded, keeping local state");
                    return;
                }
                let key = self.tick();
                let index = index.min(self.slots.len());
                self.slots.insert(
                    index,
                    Slot {
                        key,
                        revision: key,
                        item,
                    },
                );
                info!(entity_type, %id, size = self.slots.len(), "Remove reverted");
            }
            PendingWrite::Replace { .. } | PendingWrite::Remove { .. } => {}
        }
    }

    fn find(&self, id: T::Id) -> Option<usize> {
        self.slots.iter().position(|slot| slot.item.id() == Some(id))
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}
