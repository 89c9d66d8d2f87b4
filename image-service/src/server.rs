use std::future::Future;

use eyre::Result;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::prometheus::setup_metrics_registry;
use crate::router;

pub async fn serve<F>(config: ServiceConfig, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = setup_metrics_registry()?;
    let app = router::router(router::State::new(config, metrics));

    tracing::info!("listening on {:?}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
