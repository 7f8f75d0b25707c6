use std::sync::Arc;

use tokio::runtime::Handle;
use tonic::transport::{Channel, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kanban::{
    config::Config,
    controllers::{
        boards::BoardsController,
        cards::CardsController,
        comments::CommentsController,
        shares::SharesController,
    },
    db::connection::establish_connection,
    events::{EventBusPublisher, EventSink},
};
use proto::{
    kanban::{
        boards_service_server::BoardsServiceServer,
        cards_service_server::CardsServiceServer,
        comments_service_server::CommentsServiceServer,
        shares_service_server::SharesServiceServer,
    },
    eventbus::cards_events_service_client::CardsEventsServiceClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let pool = establish_connection(&config)?;

    let cards_events_service_client: CardsEventsServiceClient<Channel> =
        CardsEventsServiceClient::connect(config.eventbus_url.clone()).await?;
    let events: Arc<dyn EventSink> = Arc::new(EventBusPublisher::new(
        cards_events_service_client,
        Handle::current(),
    ));

    let boards_controller = BoardsController {
        pool: pool.clone()
    };
    let cards_controller = CardsController {
        pool: pool.clone(),
        events
    };
    let shares_controller = SharesController {
        pool: pool.clone()
    };
    let comments_controller = CommentsController {
        pool: pool.clone()
    };

    info!(address = %config.app_url, "kanban service listening");
    Server::builder()
        .add_service(BoardsServiceServer::new(boards_controller))
        .add_service(CardsServiceServer::new(cards_controller))
        .add_service(SharesServiceServer::new(shares_controller))
        .add_service(CommentsServiceServer::new(comments_controller))
        .serve(config.app_url)
        .await?;

    Ok(())
}
