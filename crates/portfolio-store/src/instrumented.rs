//! Metrics decorator for repositories.
//!
//! [`Instrumented`] wraps any [`Repository`] and reports every call to a
//! [`MetricSink`]: a tracker is started before delegating, `succeeded` or
//! `failed_with_error` is reported from the result, and `finished` runs when
//! the call scope exits, including when the future is dropped mid-flight.
//! Results and errors pass through unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use portfolio_metrics::{MetricSink, RequestTracker};

use crate::error::StoreResult;
use crate::repository::Repository;
use crate::types::Entity;

pub struct Instrumented<R> {
    inner: R,
    sink: Arc<dyn MetricSink>,
}

impl<R: Repository> Instrumented<R> {
    pub fn new(inner: R, sink: Arc<dyn MetricSink>) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

/// Owns a tracker and reports `finished` on drop.
struct CallScope {
    tracker: Box<dyn RequestTracker>,
}

impl CallScope {
    fn start(sink: &dyn MetricSink, entity: Entity, operation: &str) -> Self {
        Self {
            tracker: sink.start(entity.subject(), operation),
        }
    }

    fn report<T>(&self, result: &StoreResult<T>) {
        let _ = match result {
            Ok(_) => self.tracker.succeeded(),
            Err(e) => self.tracker.failed_with_error(e),
        };
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        let _ = self.tracker.finished();
    }
}

#[async_trait]
impl<R: Repository> Repository for Instrumented<R> {
    type Record = R::Record;

    fn entity(&self) -> Entity {
        self.inner.entity()
    }

    async fn list(&self) -> StoreResult<Vec<Self::Record>> {
        let entity = self.entity();
        let scope = CallScope::start(self.sink.as_ref(), entity, entity.list_operation());
        let result = self.inner.list().await;
        scope.report(&result);
        result
    }

    async fn get(&self, id: i64) -> StoreResult<Self::Record> {
        let entity = self.entity();
        let scope = CallScope::start(self.sink.as_ref(), entity, entity.get_operation());
        let result = self.inner.get(id).await;
        scope.report(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryRepository;
    use crate::types::Skill;
    use portfolio_metrics::MemorySink;

    struct FailingRepository;

    #[async_trait]
    impl Repository for FailingRepository {
        type Record = Skill;

        async fn list(&self) -> StoreResult<Vec<Skill>> {
            Err(StoreError::database(Entity::Skill, sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _id: i64) -> StoreResult<Skill> {
            Err(StoreError::database(Entity::Skill, sqlx::Error::PoolTimedOut))
        }
    }

    fn skill(id: i64) -> Skill {
        Skill {
            id,
            title: "Rust".into(),
            level: 5,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn failing_get_reports_failure_and_finished_only() {
        let sink = MemorySink::new();
        let repo = Instrumented::new(FailingRepository, Arc::new(sink.clone()));

        let err = repo.get(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Database { .. }));

        assert_eq!(sink.count_containing("skills.GetSkill.failed:1|c|#error:"), 1);
        assert_eq!(sink.count_containing("|#status:failed,error:"), 1);
        assert_eq!(sink.count_containing("|#status:finished"), 1);
        assert_eq!(sink.count_containing(".succeeded:"), 0);
    }

    #[tokio::test]
    async fn successful_list_reports_success_then_finished() {
        let sink = MemorySink::new();
        let repo = Instrumented::new(
            MemoryRepository::new([skill(1), skill(2)]),
            Arc::new(sink.clone()),
        );

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "skills.ListSkills.started:1|c");
        assert_eq!(lines[1], "skills.ListSkills.succeeded:1|c");
        assert!(lines[2].ends_with("|ms|#status:success"));
        assert!(lines[3].ends_with("|ms|#status:finished"));
    }

    #[tokio::test]
    async fn not_found_passes_through_unchanged() {
        let sink = MemorySink::new();
        let repo = Instrumented::new(MemoryRepository::<Skill>::empty(), Arc::new(sink.clone()));

        let err = repo.get(9999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 9999, .. }));
        assert_eq!(
            sink.count_containing("skills.GetSkill.failed:1|c|#error:skill_not_found"),
            1
        );
    }

    #[tokio::test]
    async fn decorated_entity_matches_inner() {
        let repo = Instrumented::new(
            MemoryRepository::<Skill>::empty(),
            Arc::new(portfolio_metrics::NopSink),
        );
        assert_eq!(repo.entity(), Entity::Skill);
    }

    #[tokio::test]
    async fn dropped_call_still_reports_finished() {
        struct PendingRepository;

        #[async_trait]
        impl Repository for PendingRepository {
            type Record = Skill;

            async fn list(&self) -> StoreResult<Vec<Skill>> {
                std::future::pending().await
            }

            async fn get(&self, _id: i64) -> StoreResult<Skill> {
                std::future::pending().await
            }
        }

        let sink = MemorySink::new();
        let repo = Instrumented::new(PendingRepository, Arc::new(sink.clone()));

        let call = repo.get(1);
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), call).await;
        assert!(timed_out.is_err());

        assert_eq!(sink.count_containing("|#status:finished"), 1);
        assert_eq!(sink.count_containing(".succeeded:"), 0);
        assert_eq!(sink.count_containing(".failed:"), 0);
    }
}
