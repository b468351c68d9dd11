//! # Records & Queries
//!
//! Types shared by the actor and its clients: the [`Stored`] envelope that pairs an
//! entity with its store-managed metadata, and the [`Query`] description used to
//! select, order and truncate records.

use crate::entity::ActorEntity;
use chrono::{DateTime, Utc};

/// An entity as held by the store, with its identity and timestamps.
///
/// `created_at` is fixed at creation; `updated_at` moves on every successful update.
#[derive(Debug, Clone)]
pub struct Stored<T: ActorEntity> {
    pub id: T::Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub value: T,
}

/// Timestamp a query can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: Direction,
}

impl Sort {
    /// Most recently created first.
    pub fn newest_created() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: Direction::Descending,
        }
    }

    /// Most recently updated first.
    pub fn newest_updated() -> Self {
        Self {
            key: SortKey::UpdatedAt,
            direction: Direction::Descending,
        }
    }
}

/// A `find_many` request: filter, then sort, then limit.
///
/// Without a sort, matching records come back in creation order.
#[derive(Debug)]
pub struct Query<T: ActorEntity> {
    pub filter: T::Filter,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl<T: ActorEntity> Query<T> {
    pub fn new(filter: T::Filter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
