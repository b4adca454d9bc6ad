//! 控制抓取排程的 HTTP 介面

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{extract::State, routing::get, Router};
use tokio::net::TcpListener;

use crate::{
    logging,
    scheduler::{Poller, StartOutcome, StopOutcome},
};

pub const WELCOME: &str = "Welcome to the Financial Indices Fetcher! Use /start-fetching to begin and /stop-fetching to stop.";

pub fn router(poller: Arc<Poller>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/start-fetching", get(start_fetching))
        .route("/stop-fetching", get(stop_fetching))
        .with_state(poller)
}

/// 綁定 0.0.0.0:{port}，直到程序結束
pub async fn serve(port: u16, poller: Arc<Poller>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    logging::info_console(format!("Server running at http://localhost:{}", port));

    axum::serve(listener, router(poller)).await?;

    Ok(())
}

async fn index() -> &'static str {
    WELCOME
}

async fn start_fetching(State(poller): State<Arc<Poller>>) -> &'static str {
    match poller.start() {
        StartOutcome::Started => "Started fetching data.",
        StartOutcome::AlreadyRunning => "Fetching data is already running.",
    }
}

async fn stop_fetching(State(poller): State<Arc<Poller>>) -> &'static str {
    match poller.stop() {
        StopOutcome::Stopped => "Stopped fetching data.",
        StopOutcome::NotRunning => "Fetching data is not running.",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        declare::Symbol,
        test_support::{self, MemoryStore, StubSource},
        util,
    };

    fn poller() -> Arc<Poller> {
        let pipeline = test_support::pipeline(
            Arc::new(StubSource::default()),
            Arc::new(MemoryStore::default()),
            "indices",
        );

        Arc::new(
            Poller::new(vec![Symbol::new("NIFTY_50")], Duration::from_secs(1), pipeline)
                .expect("poller"),
        )
    }

    #[tokio::test]
    async fn test_handlers() {
        let poller = poller();

        assert_eq!(index().await, WELCOME);
        assert_eq!(
            stop_fetching(State(poller.clone())).await,
            "Fetching data is not running."
        );
        assert_eq!(
            start_fetching(State(poller.clone())).await,
            "Started fetching data."
        );
        assert_eq!(
            start_fetching(State(poller.clone())).await,
            "Fetching data is already running."
        );
        assert!(poller.is_running());
        assert_eq!(
            stop_fetching(State(poller.clone())).await,
            "Stopped fetching data."
        );
        assert!(!poller.is_running());
    }

    #[tokio::test]
    async fn test_routes_over_http() {
        let poller = poller();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = router(poller.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let base = format!("http://{}", addr);
        let get = |path: &str| {
            let url = format!("{}{}", base, path);
            async move { util::http::get(&url, None).await.expect("response") }
        };

        assert_eq!(get("/").await, WELCOME);
        assert_eq!(get("/start-fetching").await, "Started fetching data.");
        assert_eq!(get("/start-fetching").await, "Fetching data is already running.");
        assert_eq!(get("/stop-fetching").await, "Stopped fetching data.");
        assert_eq!(get("/stop-fetching").await, "Fetching data is not running.");
        assert!(!poller.is_running());
    }
}
