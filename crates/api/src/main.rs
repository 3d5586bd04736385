//! API server entry point.

use std::process::ExitCode;

use api::Config;
use api::lifecycle::{self, ShutdownOutcome};
use api::telemetry::{self, SERVICE_NAME};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Configuration and logging
    let config = Config::from_env();
    if let Err(err) = telemetry::init(&config) {
        eprintln!("failed to initialise logging: {err}");
        return ExitCode::FAILURE;
    }

    // 2. Metrics registry and application state
    let state = match api::create_default_state(&config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to build metrics registry");
            return ExitCode::FAILURE;
        }
    };
    let app = api::create_app(state);

    // 3. Bind; failure is fatal
    let addr = config.addr();
    let listener = match lifecycle::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(service = SERVICE_NAME, error = %err, "failed to start server");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        service = SERVICE_NAME,
        %addr,
        port = config.port,
        environment = %config.environment,
        version = %config.version,
        "server running"
    );
    tracing::info!(
        "health endpoint: http://{}:{}/api/health",
        config.host,
        config.port
    );

    // 4. Serve until SIGINT/SIGTERM, then drain with a bounded grace period
    match lifecycle::serve(
        listener,
        app,
        lifecycle::shutdown_signal(),
        config.shutdown_timeout,
    )
    .await
    {
        Ok(ShutdownOutcome::Drained) => {
            tracing::info!(service = SERVICE_NAME, "process terminated");
            ExitCode::SUCCESS
        }
        Ok(ShutdownOutcome::TimedOut) => {
            // Connection tasks may still be running; do not wait for them.
            std::process::exit(1);
        }
        Err(err) => {
            tracing::error!(service = SERVICE_NAME, error = %err, "server error");
            ExitCode::FAILURE
        }
    }
}
