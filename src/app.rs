use std::sync::Arc;

use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::matrix::HazardMatrix;
use crate::services::{HazardService, RiskService};

/// Running lookup service
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Load the composite matrix and spawn the HTTP server
    ///
    /// Fails before binding if the matrix is missing or unreadable; there is no
    /// degraded mode without data.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading composite matrix from {:?}", config.matrix_path);
        let matrix_path = config.matrix_path.clone();
        let grid_step = config.lookup_grid_step;
        let matrix =
            tokio::task::spawn_blocking(move || HazardMatrix::load(&matrix_path, grid_step))
                .await??;
        info!(
            "Loaded {} grid cells (lookup step {}°)",
            matrix.len(),
            matrix.grid_step()
        );

        let app_state = AppState {
            hazard_service: HazardService::new(Arc::new(matrix)),
            risk_service: RiskService::default(),
        };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
