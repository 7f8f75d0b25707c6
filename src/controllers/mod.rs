//! tonic services translating protobuf requests into service calls.

use std::pin::Pin;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tonic::{Request, Status};
use tracing::error;

use crate::db::connection::PgPool;
use crate::error::KanbanError;
use crate::store::PgStore;

pub mod boards;
pub mod cards;
pub mod comments;
pub mod convert;
pub mod shares;

/// Metadata entry carrying the authenticated user id, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

pub type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

pub fn acting_user<T>(request: &Request<T>) -> Result<String, Status> {
    request
        .metadata()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|user_id| !user_id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Status::unauthenticated("Missing acting user"))
}

/// Runs `f` on the blocking pool against one pooled connection.
pub async fn with_store<T, F>(pool: &PgPool, f: F) -> Result<T, Status>
where
    F: FnOnce(&PgStore) -> Result<T, KanbanError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    let result = tokio::task::spawn_blocking(move || {
        let store = PgStore::from_pool(&pool)?;
        f(&store)
    })
    .await
    .map_err(|err| {
        error!(error = %err, "request worker failed");
        Status::internal("Request was aborted")
    })?;

    result.map_err(Status::from)
}

pub fn stream_items<T>(items: Vec<T>) -> ResponseStream<T>
where
    T: Send + 'static,
{
    let mut stream = tokio_stream::iter(items);
    let (sender, receiver) = mpsc::channel(1);

    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            match sender.send(Result::<T, Status>::Ok(item)).await {
                Ok(_) => {},
                Err(_err) => break
            }
        }
    });

    Box::pin(ReceiverStream::new(receiver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn acting_user_is_read_from_metadata() {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert(USER_ID_HEADER, " user-1 ".parse().unwrap());

        assert_eq!(acting_user(&request).unwrap(), "user-1");
    }

    #[test]
    fn missing_acting_user_is_unauthenticated() {
        let request = Request::new(());
        assert_eq!(acting_user(&request).unwrap_err().code(), Code::Unauthenticated);
    }
}
