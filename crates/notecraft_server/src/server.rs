//! Listener lifecycle.

use crate::routes::{AppState, create_router};
use notecraft_config::WebConfig;
use notecraft_error::{NotecraftResult, ServerError, ServerErrorKind};
use notecraft_generators::NoteGenerator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serves the web interface until Ctrl+C.
///
/// # Errors
///
/// Returns a server error when the address cannot be bound or the server
/// stops abnormally.
pub async fn serve(web: &WebConfig, generator: Arc<NoteGenerator>) -> NotecraftResult<()> {
    let addr = format!("{}:{}", web.host, web.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: addr.clone(),
            message: e.to_string(),
        })
    })?;
    info!(%addr, "Web interface listening on http://{}", addr);

    let router = create_router(AppState::new(Arc::clone(&generator)));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    generator.release().await;
    info!("Web interface stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
