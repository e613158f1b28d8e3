//! portfoliod: the portfolio catalog daemon.
//!
//! Assembles, in order: `.env` → configuration → logging → Postgres pool → metric
//! sink → instrumented repositories → `PortfolioServer` → gRPC server and
//! REST gateway. The gRPC port also serves `grpc.health.v1.Health` and
//! reflection. Runs until SIGINT/SIGTERM, then gives both servers
//! [`shutdown::GRACE_PERIOD`] to drain.
//!
//! # Usage
//!
//! ```text
//! DATABASE_URL=postgres://portfolio@localhost/portfolio \
//! STATSD_ADDRESS=localhost:8125 \
//! portfoliod --grpc-port 50051 --http-port 8080
//! ```

mod config;
mod logging;
mod shutdown;

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tokio::task::JoinError;
use tonic::transport::server::TcpIncoming;
use tracing::{info, warn};

use portfolio_metrics::{MetricSink, NopSink, StatsdSink};
use portfolio_rpc::PortfolioServer;
use portfolio_rpc::proto::portfolio_service_server::PortfolioServiceServer;
use portfolio_store::{Education, Experience, Instrumented, PgRepository, Skill};

use crate::config::Config;

const DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file(Path::new(".env"))?;
    let config = Config::parse();
    logging::init(&config.log_level, config.log_format)?;
    if env_file {
        info!("loaded environment from .env");
    }

    let statsd = config.statsd()?;
    let cors = portfolio_gateway::cors_layer(&config.allowed_origin)?;

    info!(
        grpc_port = config.grpc_port,
        http_port = config.http_port,
        "portfoliod starting"
    );

    // ── Database ─────────────────────────────────────────────────
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(DB_CONNECT_TIMEOUT)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("ping database")?;
    info!(max_connections = config.db_max_connections, "database pool ready");

    // ── Metrics ──────────────────────────────────────────────────
    let sink: Arc<dyn MetricSink> = match statsd {
        Some(statsd) => {
            let sink = StatsdSink::connect(&statsd)
                .await
                .context("connect to statsd")?;
            info!(
                host = %statsd.host,
                port = statsd.port,
                prefix = %statsd.prefix,
                "statsd metrics enabled"
            );
            Arc::new(sink)
        }
        None => {
            info!("STATSD_ADDRESS not set, metrics disabled");
            Arc::new(NopSink)
        }
    };

    // ── Repositories + service ───────────────────────────────────
    let skills = Instrumented::new(PgRepository::<Skill>::new(pool.clone()), Arc::clone(&sink));
    let experiences =
        Instrumented::new(PgRepository::<Experience>::new(pool.clone()), Arc::clone(&sink));
    let educations =
        Instrumented::new(PgRepository::<Education>::new(pool.clone()), Arc::clone(&sink));

    let service = Arc::new(PortfolioServer::new(
        Arc::new(skills),
        Arc::new(experiences),
        Arc::new(educations),
        Arc::clone(&sink),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── gRPC server ──────────────────────────────────────────────
    let grpc_addr = SocketAddr::from(([0, 0, 0, 0], config.grpc_port));
    let grpc_listener = tokio::net::TcpListener::bind(grpc_addr)
        .await
        .with_context(|| format!("bind gRPC server on {grpc_addr}"))?;
    let incoming = TcpIncoming::from_listener(grpc_listener, true, None)
        .map_err(|e| anyhow!("gRPC listener on {grpc_addr}: {e}"))?;

    let (mut health, health_service) = portfolio_rpc::health_service().await;
    let reflection = portfolio_rpc::reflection_service().context("build gRPC reflection")?;

    let mut grpc_shutdown = shutdown_rx.clone();
    let mut grpc = tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(health_service)
            .add_service(reflection)
            .add_service(Arc::clone(&service).into_service())
            .serve_with_incoming_shutdown(incoming, async move {
                let _ = grpc_shutdown.changed().await;
            }),
    );
    info!(%grpc_addr, "gRPC server listening");

    // ── REST gateway ─────────────────────────────────────────────
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("bind REST gateway on {http_addr}"))?;
    let router = portfolio_gateway::build_router(Arc::clone(&service), cors);

    let mut http_shutdown = shutdown_rx.clone();
    let mut http = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = http_shutdown.changed().await;
            })
            .await
    });
    info!(%http_addr, "REST gateway listening");
    for route in portfolio_gateway::ROUTES {
        info!(%route, "REST endpoint");
    }

    // ── Run until signalled ──────────────────────────────────────
    let outcome = tokio::select! {
        _ = shutdown::signal() => Ok(()),
        res = &mut grpc => Err(server_exited("gRPC", res)),
        res = &mut http => Err(server_exited("REST", res)),
    };

    health
        .set_not_serving::<PortfolioServiceServer<PortfolioServer>>()
        .await;
    let _ = shutdown_tx.send(true);

    let drain = async {
        if !grpc.is_finished() {
            let _ = (&mut grpc).await;
        }
        if !http.is_finished() {
            let _ = (&mut http).await;
        }
    };
    if tokio::time::timeout(shutdown::GRACE_PERIOD, drain).await.is_err() {
        warn!(
            grace_secs = shutdown::GRACE_PERIOD.as_secs(),
            "servers did not drain in time, aborting"
        );
        grpc.abort();
        http.abort();
    }

    pool.close().await;
    info!("portfoliod stopped");
    outcome
}

fn server_exited<E: Display>(name: &str, res: Result<Result<(), E>, JoinError>) -> anyhow::Error {
    match res {
        Ok(Ok(())) => anyhow!("{name} server stopped unexpectedly"),
        Ok(Err(e)) => anyhow!("{name} server failed: {e}"),
        Err(e) => anyhow!("{name} server task failed: {e}"),
    }
}
