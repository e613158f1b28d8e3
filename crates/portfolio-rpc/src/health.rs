//! Standard gRPC companion services: health checking and reflection.

use tonic_health::server::{health_reporter, HealthReporter};
use tonic_health::pb::health_server::{Health, HealthServer};
use tonic_reflection::server::v1::{ServerReflection, ServerReflectionServer};

use crate::proto::portfolio_service_server::PortfolioServiceServer;
use crate::proto::FILE_DESCRIPTOR_SET;
use crate::PortfolioServer;

/// `grpc.health.v1.Health` with `portfolio.v1.PortfolioService` marked as
/// serving. Keep the reporter to flip the status on shutdown.
pub async fn health_service() -> (HealthReporter, HealthServer<impl Health>) {
    let (mut reporter, service) = health_reporter();
    reporter
        .set_serving::<PortfolioServiceServer<PortfolioServer>>()
        .await;
    (reporter, service)
}

/// `grpc.reflection.v1.ServerReflection` over the portfolio descriptors.
pub fn reflection_service(
) -> Result<ServerReflectionServer<impl ServerReflection>, tonic_reflection::server::Error> {
    tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()
}
