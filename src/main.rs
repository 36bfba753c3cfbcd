// Main entry point - Session mount, server setup and teardown
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::session::{DashboardSession, SessionHandle};
use crate::infrastructure::config::load_config;
use crate::infrastructure::stream_surface::{StreamSurface, SurfaceSlot};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, health_check, stream_dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;
    let dashboard = &config.dashboard;

    // Create the rendering surface and mount the session on it
    let surface = SurfaceSlot::new();
    let session = DashboardSession::from_settings(
        dashboard,
        StreamSurface::new(surface.clone()),
        Utc::now(),
    )?;
    let skeleton = session.skeleton(dashboard.tick_interval_ms);
    let handle = SessionHandle::mount(session, dashboard.tick_interval());

    // Create application state
    let state = Arc::new(AppState {
        skeleton,
        surface: surface.clone(),
        viewer_buffer: config.server.viewer_buffer,
    });

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting automation-dashboard on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // The session is unmounted inside the shutdown future: an attached
    // viewer's stream only ends once its sink is disposed.
    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(handle.unmount_after(shutdown_signal()))
        .await;

    tracing::debug!(live_contexts = surface.live_contexts(), "Rendering surface released");

    served?;
    Ok(())
}

/// Build router (presentation layer)
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{DashboardPreset, DashboardSettings};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    #[tokio::test]
    async fn test_graceful_shutdown_with_attached_viewer() {
        let settings = DashboardSettings {
            tick_interval_ms: 20,
            seed: Some(9),
            ..DashboardSettings::preset(DashboardPreset::Fast)
        };
        let surface = SurfaceSlot::new();
        let session = DashboardSession::from_settings(
            &settings,
            StreamSurface::new(surface.clone()),
            Utc::now(),
        )
        .unwrap();
        let state = Arc::new(AppState {
            skeleton: session.skeleton(settings.tick_interval_ms),
            surface: surface.clone(),
            viewer_buffer: 16,
        });
        let handle = SessionHandle::mount(session, settings.tick_interval());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, router(state))
                .with_graceful_shutdown(handle.unmount_after(async move {
                    let _ = stop_rx.await;
                }))
                .await
        });

        let mut viewer = TcpStream::connect(addr).await.unwrap();
        viewer
            .write_all(b"GET /dashboard/stream HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut buf = vec![0u8; 4096];
        let read = viewer.read(&mut buf).await.unwrap();
        assert!(buf[..read].starts_with(b"HTTP/1.1 200"));
        assert_eq!(surface.live_contexts(), 1);

        stop_tx.send(()).unwrap();
        let served = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not drain with a viewer attached");
        served.unwrap().unwrap();
        assert_eq!(surface.live_contexts(), 0);

        // the viewer sees its stream end
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while viewer.read(&mut buf).await.unwrap_or(0) > 0 {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
