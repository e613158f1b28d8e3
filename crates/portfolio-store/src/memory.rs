//! In-memory repository.
//!
//! Serves a fixed set of records with the same ordering, cap and
//! not-found behaviour as the Postgres backend. Used by tests and for
//! running the service without a database.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::repository::{list_order, Repository, MAX_LIST_ROWS};
use crate::types::Record;

#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    records: Vec<T>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new(records: impl IntoIterator<Item = T>) -> Self {
        let mut records: Vec<T> = records.into_iter().collect();
        records.sort_by(list_order);
        Self { records }
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[async_trait]
impl<T: Record> Repository for MemoryRepository<T> {
    type Record = T;

    async fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self
            .records
            .iter()
            .take(MAX_LIST_ROWS as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> StoreResult<T> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: T::ENTITY,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entity, Skill};

    fn skill(id: i64) -> Skill {
        Skill {
            id,
            title: format!("skill {id}"),
            level: 3,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn get_present_and_absent() {
        let repo = MemoryRepository::new([skill(1), skill(2)]);

        assert_eq!(repo.get(2).await.unwrap().id, 2);

        let err = repo.get(9999).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::Skill,
                id: 9999
            }
        ));
    }

    #[tokio::test]
    async fn list_is_capped() {
        let repo = MemoryRepository::new((1..=1500).map(skill));
        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), MAX_LIST_ROWS as usize);
        assert_eq!(listed[0].id, 1);
    }

    #[tokio::test]
    async fn empty_list() {
        let repo = MemoryRepository::<Skill>::empty();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
