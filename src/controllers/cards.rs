use std::sync::Arc;

use tonic::{Request, Response, Status};
use proto::kanban::{
    Card as ProtoCard,
    CardId,
    CreateCardRequest,
    DeleteResult,
    MoveCardRequest,
    UpdateCardRequest,
    cards_service_server::CardsService,
};

use crate::{
    controllers::{acting_user, with_store},
    db::connection::PgPool,
    domain::{CardUpdate, NewCard},
    events::EventSink,
    services::CardService,
};

pub struct CardsController {
    pub pool: PgPool,
    pub events: Arc<dyn EventSink>,
}

#[tonic::async_trait]
impl CardsService for CardsController {
    async fn get_card(
        &self,
        request: Request<CardId>,
    ) -> Result<Response<ProtoCard>, Status> {
        let actor = acting_user(&request)?;
        let card_id = request.into_inner().card_id;
        let events = self.events.clone();

        let card = with_store(&self.pool, move |store| {
            CardService::new(store, events.as_ref()).get_card(&actor, &card_id)
        }).await?;

        Ok(Response::new(card.into()))
    }

    async fn create_card(
        &self,
        request: Request<CreateCardRequest>,
    ) -> Result<Response<ProtoCard>, Status> {
        let actor = acting_user(&request)?;
        let CreateCardRequest { board_id, column_id, title, description, assigned_user_id } = request.into_inner();
        let new_card = NewCard {
            board_id,
            column_id,
            title,
            description,
            assigned_user_id: assigned_user_id.filter(|id| !id.is_empty()),
        };
        let events = self.events.clone();

        let card = with_store(&self.pool, move |store| {
            CardService::new(store, events.as_ref()).create_card(&actor, new_card)
        }).await?;

        Ok(Response::new(card.into()))
    }

    async fn update_card(
        &self,
        request: Request<UpdateCardRequest>,
    ) -> Result<Response<ProtoCard>, Status> {
        let actor = acting_user(&request)?;
        let UpdateCardRequest { card_id, title, description, assigned_user_id } = request.into_inner();
        let update = CardUpdate {
            title,
            description,
            assigned_user_id: assigned_user_id.filter(|id| !id.is_empty()),
        };
        let events = self.events.clone();

        let card = with_store(&self.pool, move |store| {
            CardService::new(store, events.as_ref()).update_card(&actor, &card_id, update)
        }).await?;

        Ok(Response::new(card.into()))
    }

    async fn move_card(
        &self,
        request: Request<MoveCardRequest>,
    ) -> Result<Response<ProtoCard>, Status> {
        let actor = acting_user(&request)?;
        let MoveCardRequest { card_id, column_id, position } = request.into_inner();
        let events = self.events.clone();

        let card = with_store(&self.pool, move |store| {
            CardService::new(store, events.as_ref()).move_card(&actor, &card_id, &column_id, position)
        }).await?;

        Ok(Response::new(card.into()))
    }

    async fn delete_card(
        &self,
        request: Request<CardId>,
    ) -> Result<Response<DeleteResult>, Status> {
        let actor = acting_user(&request)?;
        let card_id = request.into_inner().card_id;
        let events = self.events.clone();

        let deleted = with_store(&self.pool, move |store| {
            CardService::new(store, events.as_ref()).delete_card(&actor, &card_id)
        }).await?;

        Ok(Response::new(DeleteResult { deleted }))
    }
}
