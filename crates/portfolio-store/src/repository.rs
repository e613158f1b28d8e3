//! The repository contract shared by every backend and decorator.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Entity, Record};

/// Hard cap on the number of records a single `list()` returns.
pub const MAX_LIST_ROWS: i64 = 1000;

/// Read-only access to one kind of record.
///
/// Implementations are interchangeable: a decorated repository has exactly
/// the same shape as the one it wraps.
#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Record;

    fn entity(&self) -> Entity {
        <Self::Record as Record>::ENTITY
    }

    /// Up to [`MAX_LIST_ROWS`] records, newest start date first.
    async fn list(&self) -> StoreResult<Vec<Self::Record>>;

    /// The record with `id`, or [`StoreError::NotFound`](crate::StoreError::NotFound).
    async fn get(&self, id: i64) -> StoreResult<Self::Record>;
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    type Record = R::Record;

    fn entity(&self) -> Entity {
        (**self).entity()
    }

    async fn list(&self) -> StoreResult<Vec<Self::Record>> {
        (**self).list().await
    }

    async fn get(&self, id: i64) -> StoreResult<Self::Record> {
        (**self).get(id).await
    }
}

/// Ordering used by `list()`: start date descending with missing dates
/// first (Postgres `DESC` semantics), then id ascending.
pub fn list_order<T: Record>(a: &T, b: &T) -> Ordering {
    let by_start = match (a.started_on(), b.started_on()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    };
    by_start.then_with(|| a.id().cmp(&b.id()))
}
