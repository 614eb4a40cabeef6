//! CloudPilot API server.
//!
//! Backend for the cloud operations console: S3 bucket and website
//! deployment operations, CloudFront distributions, EC2 instance lifecycle,
//! and CloudWatch dashboards, exposed as a JSON HTTP API.
//!
//! # Usage
//!
//! ```text
//! LISTEN_ADDR=0.0.0.0:5000 cloudpilot-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN_ADDR` | `0.0.0.0:5000` | Bind address |
//! | `AWS_DEFAULT_REGION` | `us-east-1` | Default region |
//! | `AWS_ENDPOINT_URL` | *(unset)* | Provider endpoint override (local stacks) |
//! | `UPLOAD_CONCURRENCY` | `8` | Concurrent uploads per deployment |
//! | `CLOUD_CALL_TIMEOUT_SECS` | *(unset)* | Provider call timeout |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cloudpilot_api::CloudPilot;
use cloudpilot_aws::{
    AwsCompute, AwsDistributionProvisioner, AwsMetricsSource, AwsObjectStore, client,
};
use cloudpilot_core::Config;
use cloudpilot_http::ApiHttpService;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Construct the handler with its provider clients.
async fn build_handler(config: Config) -> CloudPilot {
    let sdk_config = client::load_sdk_config(&config).await;

    // Path-style addressing is only needed when an endpoint override is in
    // play; against real S3 the default virtual-hosted style is correct.
    let s3 = client::s3_client(&sdk_config, config.endpoint_url.is_some());

    CloudPilot::new(
        config,
        Arc::new(AwsObjectStore::new(s3)),
        Arc::new(AwsDistributionProvisioner::new(
            aws_sdk_cloudfront::Client::new(&sdk_config),
        )),
        Arc::new(AwsCompute::new(aws_sdk_ec2::Client::new(&sdk_config))),
        Arc::new(AwsMetricsSource::new(aws_sdk_cloudwatch::Client::new(
            &sdk_config,
        ))),
    )
}

/// Run the accept loop, serving connections until a shutdown signal is
/// received.
async fn serve(listener: TcpListener, service: ApiHttpService<CloudPilot>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_level)?;

    info!(
        region = %config.default_region,
        endpoint = ?config.endpoint_url,
        upload_concurrency = config.upload_concurrency,
        "initializing provider clients",
    );

    let listen = config.listen.clone();
    let handler = build_handler(config).await;
    let service = ApiHttpService::new(handler);

    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid bind address: {listen}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting CloudPilot server");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_default_log_level() {
        // EnvFilter parses the default config value.
        let config = Config::default();
        assert!(EnvFilter::try_new(&config.log_level).is_ok());
    }

    #[test]
    fn test_should_parse_default_listen_addr() {
        let config = Config::default();
        assert!(config.listen.parse::<SocketAddr>().is_ok());
    }
}
