//! portfolio-rpc: the `PortfolioService` gRPC surface.
//!
//! # Architecture
//!
//! ```text
//! tonic transport
//!   └── PortfolioServiceServer<PortfolioServer>
//!         ├── RPC tracking   (subject "PortfolioService", method name)
//!         ├── GetAll*/Get*   → Repository::list / Repository::get
//!         └── StoreError     → Status (NotFound | Internal)
//! grpc.health.v1.Health          (see [`health`])
//! grpc.reflection.v1.ServerReflection
//! ```
//!
//! Records are converted to their protobuf form in [`convert`]; absent
//! optional columns become unset fields, never zero values.

pub mod convert;
pub mod health;
pub mod server;

/// Generated protobuf types and gRPC service stubs.
pub mod proto {
    tonic::include_proto!("portfolio.v1");

    /// Encoded descriptors for every message and service in `portfolio.v1`.
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("portfolio_descriptor");
}

pub use health::{health_service, reflection_service};
pub use server::{status_from_store, PortfolioServer, SERVICE_NAME};
