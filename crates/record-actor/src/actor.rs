//! # Generic Record Actor
//!
//! This module defines the `ResourceActor`, the "server" half of the store. It owns the
//! records and the receiving end of the request channel, and processes one request at a
//! time, so every individual operation is atomic without any lock around the map.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::query::{Direction, Query, SortKey, Stored};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A stored record plus the sequence numbers used to break timestamp ties.
struct Slot<T: ActorEntity> {
    record: Stored<T>,
    created_seq: u64,
    updated_seq: u64,
}

impl<T: ActorEntity> Slot<T> {
    fn sort_key(&self, key: SortKey) -> (chrono::DateTime<Utc>, u64) {
        match key {
            SortKey::CreatedAt => (self.record.created_at, self.created_seq),
            SortKey::UpdatedAt => (self.record.updated_at, self.updated_seq),
        }
    }
}

/// The generic actor that keeps a collection of records of type `T`.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2.  **Wire**: pass the entity's context into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on a Tokio task.
///
/// ```rust
/// use record_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Note { id: u32, text: String }
/// #[derive(Debug)] struct NoteCreate { text: String }
/// #[derive(Debug)] struct NoteUpdate(String);
/// #[derive(Debug)] struct NoteError;
/// impl std::fmt::Display for NoteError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "note error") }
/// }
/// impl std::error::Error for NoteError {}
///
/// #[async_trait]
/// impl ActorEntity for Note {
///     type Id = u32;
///     type Create = NoteCreate;
///     type Update = NoteUpdate;
///     type Filter = ();
///     type Context = ();
///     type Error = NoteError;
///
///     fn from_create_params(id: u32, p: NoteCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, text: p.text })
///     }
///     fn matches(&self, _: &()) -> bool { true }
///     async fn on_update(&mut self, u: NoteUpdate, _: &()) -> Result<(), Self::Error> {
///         self.text = u.0;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let note = client.create(NoteCreate { text: "hi".into() }).await.unwrap();
///     assert_eq!(note.value.text, "hi");
/// }
/// ```
///
/// ## Operations
///
/// * **Create**: takes the next sequential id, builds the entity, runs `on_create`,
///   stamps both timestamps and returns the stored record.
/// * **Get**: clones the record with the given id, if any.
/// * **Query**: filters with `ActorEntity::matches`, orders (creation order by default),
///   then truncates to the limit.
/// * **Update**: applies `on_update` to a copy and commits it only on success, moving
///   `updated_at` forward.
/// * **Delete**: runs `on_delete`, then removes the record.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Slot<T>>,
    next_id: u32,
    seq: u64,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            seq: 0,
        };
        (actor, ResourceClient::new(sender))
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn select(&self, query: Query<T>) -> Vec<Stored<T>> {
        let mut hits: Vec<&Slot<T>> = self
            .store
            .values()
            .filter(|slot| slot.record.value.matches(&query.filter))
            .collect();

        match query.sort {
            Some(sort) => {
                hits.sort_by_key(|slot| slot.sort_key(sort.key));
                if sort.direction == Direction::Descending {
                    hits.reverse();
                }
            }
            None => hits.sort_by_key(|slot| slot.created_seq),
        }

        let limit = query.limit.unwrap_or(hits.len());
        hits.into_iter()
            .take(limit)
            .map(|slot| slot.record.clone())
            .collect()
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    self.next_id += 1;
                    let seq = self.next_seq();
                    let now = Utc::now();
                    let record = Stored {
                        id: id.clone(),
                        created_at: now,
                        updated_at: now,
                        value: item,
                    };
                    self.store.insert(
                        id.clone(),
                        Slot {
                            record: record.clone(),
                            created_seq: seq,
                            updated_seq: seq,
                        },
                    );
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(record));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|slot| slot.record.clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Query { query, respond_to } => {
                    debug!(entity_type, filter = ?query.filter, sort = ?query.sort, limit = ?query.limit, "Query");
                    let hits = self.select(query);
                    debug!(entity_type, hits = hits.len(), "Query done");
                    let _ = respond_to.send(Ok(hits));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id).map(|slot| slot.record.value.clone())
                    else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };

                    let mut draft = current;
                    if let Err(e) = draft.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    let seq = self.next_seq();
                    let result = match self.store.get_mut(&id) {
                        Some(slot) => {
                            slot.record.value = draft;
                            slot.record.updated_at = Utc::now().max(slot.record.updated_at);
                            slot.updated_seq = seq;
                            info!(entity_type, %id, "Updated");
                            Ok(slot.record.clone())
                        }
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(slot) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = slot.record.value.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

/// Short type name used in log fields, e.g. `OrderSession`.
pub fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Sort;
    use async_trait::async_trait;

    #[derive(Clone, Debug)]
    struct Ticket {
        owner: String,
        open: bool,
    }

    #[derive(Debug)]
    struct TicketCreate {
        owner: String,
    }

    #[derive(Debug)]
    enum TicketUpdate {
        Close,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("ticket already closed")]
    struct TicketError;

    #[async_trait]
    impl ActorEntity for Ticket {
        type Id = u32;
        type Create = TicketCreate;
        type Update = TicketUpdate;
        type Filter = Option<String>;
        type Context = ();
        type Error = TicketError;

        fn from_create_params(_id: u32, params: TicketCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                owner: params.owner,
                open: true,
            })
        }

        fn matches(&self, owner: &Option<String>) -> bool {
            owner.as_ref().map_or(true, |o| *o == self.owner)
        }

        async fn on_update(&mut self, update: TicketUpdate, _: &()) -> Result<(), Self::Error> {
            match update {
                TicketUpdate::Close if !self.open => Err(TicketError),
                TicketUpdate::Close => {
                    self.open = false;
                    Ok(())
                }
            }
        }
    }

    fn ticket(owner: &str) -> TicketCreate {
        TicketCreate {
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_entity_type_is_short_name() {
        assert_eq!(entity_type::<Ticket>(), "Ticket");
    }

    #[tokio::test]
    async fn test_query_orders_by_creation_by_default() {
        let (actor, client) = ResourceActor::<Ticket>::new(10);
        tokio::spawn(actor.run(()));

        let a = client.create(ticket("ann")).await.unwrap();
        let _ = client.create(ticket("bob")).await.unwrap();
        let c = client.create(ticket("ann")).await.unwrap();

        let hits = client.query(Query::new(Some("ann".into()))).await.unwrap();
        let ids: Vec<u32> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_query_sorts_by_updated_with_limit() {
        let (actor, client) = ResourceActor::<Ticket>::new(10);
        tokio::spawn(actor.run(()));

        let a = client.create(ticket("ann")).await.unwrap();
        let b = client.create(ticket("ann")).await.unwrap();
        let c = client.create(ticket("ann")).await.unwrap();
        client.update(a.id, TicketUpdate::Close).await.unwrap();

        let hits = client
            .query(Query::new(None).sorted(Sort::newest_updated()).limit(2))
            .await
            .unwrap();
        let ids: Vec<u32> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);

        let newest = client
            .query(Query::new(None).sorted(Sort::newest_created()).limit(1))
            .await
            .unwrap();
        assert_eq!(newest[0].id, c.id);
        assert_ne!(newest[0].id, b.id);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_untouched() {
        let (actor, client) = ResourceActor::<Ticket>::new(10);
        tokio::spawn(actor.run(()));

        let a = client.create(ticket("ann")).await.unwrap();
        let closed = client.update(a.id, TicketUpdate::Close).await.unwrap();
        assert!(!closed.value.open);
        assert!(closed.updated_at >= closed.created_at);

        let err = client.update(a.id, TicketUpdate::Close).await.unwrap_err();
        assert!(matches!(err, FrameworkError::EntityError(_)));

        let missing = client.update(99, TicketUpdate::Close).await.unwrap_err();
        assert!(matches!(missing, FrameworkError::NotFound(_)));
    }
}
