//! Startup and graceful-shutdown tests against real sockets.

use std::sync::Arc;
use std::time::Duration;

use api::lifecycle::{self, ServerError, ShutdownOutcome};
use api::{Config, Environment};
use axum::Router;
use axum::routing::get;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{Notify, oneshot};

fn app() -> Router {
    let config = Config {
        environment: Environment::Test,
        ..Config::default()
    };
    api::create_app(api::create_default_state(&config).unwrap())
}

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_bind_reports_address_in_use() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let err = lifecycle::bind(&addr).await.unwrap_err();
    assert!(matches!(err, ServerError::AddrInUse { .. }), "{err:?}");
    assert!(err.to_string().contains(&addr));
}

#[tokio::test]
async fn test_bind_reports_invalid_address() {
    let err = lifecycle::bind("not-an-address").await.unwrap_err();
    assert!(matches!(err, ServerError::Bind { .. }), "{err:?}");
}

#[tokio::test]
async fn test_serves_until_signal_then_drains() {
    let listener = lifecycle::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(lifecycle::serve(
        listener,
        app(),
        async {
            let _ = stop_rx.await;
        },
        Duration::from_secs(5),
    ));

    let response = raw_get(addr, "/api/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("\"status\":\"healthy\""));

    stop_tx.send(()).unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(outcome, ShutdownOutcome::Drained);
}

#[tokio::test]
async fn test_in_flight_request_finishes_during_drain() {
    let started = Arc::new(Notify::new());
    let slow = {
        let started = started.clone();
        Router::new().route(
            "/slow",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "finished"
                }
            }),
        )
    };

    let listener = lifecycle::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(lifecycle::serve(
        listener,
        slow,
        async {
            let _ = stop_rx.await;
        },
        Duration::from_secs(5),
    ));

    let client = tokio::spawn(raw_get(addr, "/slow"));
    started.notified().await;
    stop_tx.send(()).unwrap();

    let response = client.await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("finished"));

    let outcome = server.await.unwrap().unwrap();
    assert_eq!(outcome, ShutdownOutcome::Drained);
}

#[tokio::test]
async fn test_drain_is_bounded_by_grace_period() {
    let started = Arc::new(Notify::new());
    let stuck = {
        let started = started.clone();
        Router::new().route(
            "/stuck",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "too late"
                }
            }),
        )
    };

    let listener = lifecycle::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(lifecycle::serve(
        listener,
        stuck,
        async {
            let _ = stop_rx.await;
        },
        Duration::from_millis(200),
    ));

    let _client = tokio::spawn(raw_get(addr, "/stuck"));
    started.notified().await;
    stop_tx.send(()).unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("grace period was not enforced")
        .unwrap()
        .unwrap();
    assert_eq!(outcome, ShutdownOutcome::TimedOut);
}

#[tokio::test]
async fn test_new_connections_are_refused_after_signal() {
    let started = Arc::new(Notify::new());
    let slow = {
        let started = started.clone();
        Router::new().route(
            "/slow",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "finished"
                }
            }),
        )
    };

    let listener = lifecycle::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(lifecycle::serve(
        listener,
        slow,
        async {
            let _ = stop_rx.await;
        },
        Duration::from_secs(5),
    ));

    let client = tokio::spawn(raw_get(addr, "/slow"));
    started.notified().await;
    stop_tx.send(()).unwrap();

    let mut refused = false;
    for _ in 0..20 {
        match TcpStream::connect(addr).await {
            Err(err) if err.kind() == std::io::ErrorKind::ConnectionRefused => {
                refused = true;
                break;
            }
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    assert!(refused, "listener still accepting after shutdown signal");

    let response = client.await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");

    let outcome = server.await.unwrap().unwrap();
    assert_eq!(outcome, ShutdownOutcome::Drained);
}
