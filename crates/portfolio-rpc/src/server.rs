//! Portfolio gRPC server.
//!
//! Implements the `PortfolioService` gRPC interface on top of three
//! repositories. Each RPC is logged, tracked under [`SERVICE_NAME`] with the
//! RPC method as the operation, and its store error (if any) translated to a
//! [`Status`] here and nowhere else.

use std::future::Future;
use std::sync::Arc;

use portfolio_metrics::MetricSink;
use portfolio_store::{Education, Experience, Repository, Skill, StoreError, StoreResult};
use tonic::{Request, Response, Status};
use tracing::{debug, error};

use crate::proto;
use crate::proto::portfolio_service_server::{PortfolioService, PortfolioServiceServer};

/// Metric subject for RPC-level tracking.
pub const SERVICE_NAME: &str = "PortfolioService";

/// gRPC implementation of the portfolio catalog.
pub struct PortfolioServer {
    skills: Arc<dyn Repository<Record = Skill>>,
    experiences: Arc<dyn Repository<Record = Experience>>,
    educations: Arc<dyn Repository<Record = Education>>,
    sink: Arc<dyn MetricSink>,
}

impl PortfolioServer {
    pub fn new(
        skills: Arc<dyn Repository<Record = Skill>>,
        experiences: Arc<dyn Repository<Record = Experience>>,
        educations: Arc<dyn Repository<Record = Education>>,
        sink: Arc<dyn MetricSink>,
    ) -> Self {
        Self {
            skills,
            experiences,
            educations,
            sink,
        }
    }

    /// Get the tonic service for mounting on a gRPC server. The handler
    /// stays shared with the REST gateway.
    pub fn into_service(self: Arc<Self>) -> PortfolioServiceServer<Self> {
        PortfolioServiceServer::from_arc(self)
    }

    async fn observe<T, F>(&self, method: &'static str, call: F) -> Result<Response<T>, Status>
    where
        F: Future<Output = StoreResult<T>>,
    {
        debug!(method, "rpc request");
        let tracker = self.sink.start(SERVICE_NAME, method);

        match call.await {
            Ok(reply) => {
                let _ = tracker.succeeded();
                Ok(Response::new(reply))
            }
            Err(err) => {
                let _ = tracker.failed_with_error(&err);
                if err.is_not_found() {
                    debug!(method, error = %err, "record not found");
                } else {
                    error!(method, error = %err, "rpc failed");
                }
                Err(status_from_store(&err))
            }
        }
    }
}

/// Translate a repository error into a gRPC status.
pub fn status_from_store(err: &StoreError) -> Status {
    match err {
        StoreError::NotFound { .. } => Status::not_found(err.to_string()),
        StoreError::Database { .. } => Status::internal(err.to_string()),
    }
}

#[tonic::async_trait]
impl PortfolioService for PortfolioServer {
    // ── Skills ─────────────────────────────────────────────────────

    async fn get_all_skills(
        &self,
        _request: Request<proto::GetAllSkillsRequest>,
    ) -> Result<Response<proto::GetAllSkillsResponse>, Status> {
        self.observe("GetAllSkills", async {
            let skills = self.skills.list().await?;
            Ok::<_, StoreError>(proto::GetAllSkillsResponse {
                skills: skills.into_iter().map(Into::into).collect(),
            })
        })
        .await
    }

    async fn get_skill(
        &self,
        request: Request<proto::GetSkillRequest>,
    ) -> Result<Response<proto::GetSkillResponse>, Status> {
        let id = request.into_inner().id;
        self.observe("GetSkill", async {
            let skill = self.skills.get(id).await?;
            Ok::<_, StoreError>(proto::GetSkillResponse {
                skill: Some(skill.into()),
            })
        })
        .await
    }

    // ── Experiences ────────────────────────────────────────────────

    async fn get_all_experiences(
        &self,
        _request: Request<proto::GetAllExperiencesRequest>,
    ) -> Result<Response<proto::GetAllExperiencesResponse>, Status> {
        self.observe("GetAllExperiences", async {
            let experiences = self.experiences.list().await?;
            Ok::<_, StoreError>(proto::GetAllExperiencesResponse {
                experiences: experiences.into_iter().map(Into::into).collect(),
            })
        })
        .await
    }

    async fn get_experience(
        &self,
        request: Request<proto::GetExperienceRequest>,
    ) -> Result<Response<proto::GetExperienceResponse>, Status> {
        let id = request.into_inner().id;
        self.observe("GetExperience", async {
            let experience = self.experiences.get(id).await?;
            Ok::<_, StoreError>(proto::GetExperienceResponse {
                experience: Some(experience.into()),
            })
        })
        .await
    }

    // ── Educations ─────────────────────────────────────────────────

    async fn get_all_educations(
        &self,
        _request: Request<proto::GetAllEducationsRequest>,
    ) -> Result<Response<proto::GetAllEducationsResponse>, Status> {
        self.observe("GetAllEducations", async {
            let educations = self.educations.list().await?;
            Ok::<_, StoreError>(proto::GetAllEducationsResponse {
                educations: educations.into_iter().map(Into::into).collect(),
            })
        })
        .await
    }

    async fn get_education(
        &self,
        request: Request<proto::GetEducationRequest>,
    ) -> Result<Response<proto::GetEducationResponse>, Status> {
        let id = request.into_inner().id;
        self.observe("GetEducation", async {
            let education = self.educations.get(id).await?;
            Ok::<_, StoreError>(proto::GetEducationResponse {
                education: Some(education.into()),
            })
        })
        .await
    }
}
