//! Shared helpers for e2e tests.

use std::sync::Arc;

use prompthancer::{
    FixedWindowLimiter, FlowPrompts, GenerativeModel, ModelBinding, PromptService,
    RateLimitConfig, ResponseParser,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Loads .env from the current directory so the server sees the same variables as the CLI.
pub fn load_dotenv() {
    let _ = dotenv::dotenv();
}

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Stops the server and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

pub fn service(models: ModelBinding, max_requests: u32) -> Arc<PromptService> {
    Arc::new(PromptService::new(
        Arc::new(FixedWindowLimiter::new(RateLimitConfig {
            max_requests,
            ..RateLimitConfig::default()
        })),
        models,
        FlowPrompts::new("enhance instruction", "modify instruction"),
        ResponseParser::default(),
    ))
}

pub fn model_service(model: Arc<dyn GenerativeModel>) -> Arc<PromptService> {
    service(ModelBinding::shared(model), 5)
}

/// Bind to a random port and spawn the server. Returns once the listener is bound.
pub async fn spawn_server(service: Arc<PromptService>) -> TestServer {
    load_dotenv();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::run_serve_on_listener(listener, service, async move {
        let _ = rx.await;
    }));
    TestServer {
        base_url: format!("http://{}", addr),
        shutdown: Some(tx),
        handle,
    }
}
