use tonic::{Request, Response, Status};
use proto::kanban::{
    BoardId,
    DeleteResult,
    SearchUsersRequest,
    Share as ProtoShare,
    ShareBoardRequest,
    ShareId,
    Shares,
    UserSummary as ProtoUserSummary,
    shares_service_server::SharesService,
};

use crate::{
    controllers::{acting_user, convert::shared_user, stream_items, with_store, ResponseStream},
    db::connection::PgPool,
    services::ShareService,
};

pub struct SharesController {
    pub pool: PgPool
}

#[tonic::async_trait]
impl SharesService for SharesController {
    async fn share_board(
        &self,
        request: Request<ShareBoardRequest>,
    ) -> Result<Response<ProtoShare>, Status> {
        let actor = acting_user(&request)?;
        let ShareBoardRequest { board_id, user_id } = request.into_inner();

        let share = with_store(&self.pool, move |store| {
            ShareService::new(store).share_board(&actor, &board_id, &user_id)
        }).await?;

        Ok(Response::new(share.into()))
    }

    async fn remove_share(
        &self,
        request: Request<ShareId>,
    ) -> Result<Response<DeleteResult>, Status> {
        let actor = acting_user(&request)?;
        let share_id = request.into_inner().share_id;

        let deleted = with_store(&self.pool, move |store| {
            ShareService::new(store).remove_share(&actor, &share_id)
        }).await?;

        Ok(Response::new(DeleteResult { deleted }))
    }

    async fn list_shares(
        &self,
        request: Request<BoardId>,
    ) -> Result<Response<Shares>, Status> {
        let actor = acting_user(&request)?;
        let board_id = request.into_inner().board_id;

        let shares = with_store(&self.pool, move |store| {
            ShareService::new(store).list_shares(&actor, &board_id)
        }).await?;

        Ok(Response::new(Shares {
            shares: shares
                .into_iter()
                .map(|(share, user)| shared_user(share, user))
                .collect()
        }))
    }

    type SearchUsersStream = ResponseStream<ProtoUserSummary>;

    async fn search_users(
        &self,
        request: Request<SearchUsersRequest>,
    ) -> Result<Response<Self::SearchUsersStream>, Status> {
        acting_user(&request)?;
        let SearchUsersRequest { query, limit } = request.into_inner();

        let users = with_store(&self.pool, move |store| {
            ShareService::new(store).search_users(&query, limit.map(|limit| limit as usize))
        }).await?;

        let proto_users: Vec<ProtoUserSummary> = users
            .into_iter()
            .map(ProtoUserSummary::from)
            .collect();

        Ok(Response::new(stream_items(proto_users)))
    }
}
