//! Learning Assistant RPC Server: coordinator envelopes over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "message":{"action":"generateSummary","videoId":"abc"}}
//! Response: {"id":1, "response":{"success":true,"summary":{...}}}
//!
//! Requests are handled concurrently; replies are written as they complete,
//! so they may come back out of order. Logs go to stderr.

use std::sync::Arc;
use std::time::Instant;

use learning_assistant::platform;
use learning_assistant::rpc_handler::handle_line;
use learning_assistant::services::coordinator::Coordinator;
use learning_assistant::types::config::AssistantConfig;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("learning_assistant=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = platform::get_data_dir().join("config.json");
    let config = match AssistantConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "invalid config");
            std::process::exit(1);
        }
    };
    let coordinator = Arc::new(Coordinator::canned(&config));

    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(reply) = rx.recv().await {
            let line = format!("{}\n", reply);
            if stdout.write_all(line.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let _ = tx.send(json!({ "event": "ready", "version": env!("CARGO_PKG_VERSION") }));
    info!("rpc server ready");

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        if !rate_limiter.check() {
            let id = serde_json::from_str::<Value>(&line)
                .ok()
                .and_then(|v| v.get("id").cloned())
                .unwrap_or(Value::Null);
            let _ = tx.send(json!({ "id": id, "error": "rate limit exceeded" }));
            continue;
        }

        let coordinator = Arc::clone(&coordinator);
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = handle_line(&coordinator, &line).await;
            let _ = tx.send(reply);
        });
    }

    info!(dispatched = coordinator.dispatched_count(), "stdin closed, draining replies");
    // In-flight handlers hold their own senders; the writer ends once they finish.
    drop(tx);
    let _ = writer.await;
}
