use crate::error::ServiceError;

/// Runs filesystem work off the async workers.
pub async fn run_blocking<R, E, F>(f: F) -> Result<R, ServiceError>
where
    R: Send + 'static,
    E: Into<ServiceError> + Send + 'static,
    F: FnOnce() -> Result<R, E> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?.map_err(Into::into)
}
