//! HTTP server for the prompt flows (axum).
//!
//! Listens on `SERVE_ADDR` (default 127.0.0.1:8080) and exposes `/api/enhance`,
//! `/api/modify` and `/health`. Client identity for rate limiting comes from
//! `x-forwarded-for`, `x-real-ip` or the peer address.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`spawn_sweeper`].

mod app;
mod identity;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prompthancer::{FixedWindowLimiter, FlowConfig, PromptService};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use app::{router, AppState};

/// Serves `service` on an existing listener until `shutdown` resolves. Used by tests
/// (bind to 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    service: Arc<PromptService>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);
    let app = router(Arc::new(AppState { service }));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Periodically drops expired rate-limit windows so idle clients do not accumulate.
pub fn spawn_sweeper(limiter: Arc<FixedWindowLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = limiter.evict_expired();
            if evicted > 0 {
                debug!(evicted, remaining = limiter.len(), "rate-limit sweep");
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Runs the server from environment configuration. Listens on `addr`, else `SERVE_ADDR`,
/// else 127.0.0.1:8080. Stops on ctrl-c.
///
/// A missing provider credential does not stop the server: flow requests answer with a
/// configuration error record instead.
pub async fn run_serve(addr: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let flow_config = FlowConfig::from_env();
    let prompts = prompthancer::load_prompts_or_default(None)?;
    let api_key_var = flow_config.provider.api_key_var();
    let api_key = config::api_key(api_key_var);
    if api_key.is_none() {
        warn!("{} is not set; flow requests will report a configuration error", api_key_var);
    }

    let limiter = Arc::new(FixedWindowLimiter::new(flow_config.rate_limit));
    let service = Arc::new(PromptService::from_config(
        &flow_config,
        prompts,
        api_key,
        limiter.clone(),
    ));
    let sweeper = spawn_sweeper(limiter, flow_config.rate_limit_sweep);

    let addr = addr.unwrap_or(flow_config.serve_addr.as_str());
    let listener = TcpListener::bind(addr).await?;
    info!(provider = %flow_config.provider, "serving prompt flows");
    let result = run_serve_on_listener(listener, service, shutdown_signal()).await;
    sweeper.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompthancer::{ClientKey, RateLimitConfig};

    #[tokio::test]
    async fn sweeper_evicts_expired_windows() {
        let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig {
            max_requests: 5,
            window: Duration::from_millis(10),
        }));
        limiter.check_now(&ClientKey::from("192.0.2.50"));
        assert_eq!(limiter.len(), 1);

        let sweeper = spawn_sweeper(limiter.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        sweeper.abort();
        assert!(limiter.is_empty());
    }
}
