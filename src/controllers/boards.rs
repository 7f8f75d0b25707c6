use tonic::{Request, Response, Status};
use proto::kanban::{
    Board as ProtoBoard,
    BoardDetails as ProtoBoardDetails,
    BoardId,
    Column as ProtoColumn,
    Columns,
    CompactResult,
    CreateBoardRequest,
    DeleteResult,
    Empty,
    ReorderColumnsRequest,
    UpdateBoardRequest,
    boards_service_server::BoardsService,
};

use crate::{
    controllers::{acting_user, stream_items, with_store, ResponseStream},
    db::connection::PgPool,
    domain::{BoardStatus, BoardUpdate, ColumnInput, ColumnPosition, NewBoard},
    services::BoardService,
};

pub struct BoardsController {
    pub pool: PgPool
}

#[tonic::async_trait]
impl BoardsService for BoardsController {
    async fn get_board(
        &self,
        request: Request<BoardId>,
    ) -> Result<Response<ProtoBoardDetails>, Status> {
        let actor = acting_user(&request)?;
        let board_id = request.into_inner().board_id;

        let details = with_store(&self.pool, move |store| {
            BoardService::new(store).get_board(&actor, &board_id)
        }).await?;

        Ok(Response::new(details.into()))
    }

    type ListBoardsStream = ResponseStream<ProtoBoard>;

    async fn list_boards(
        &self,
        request: Request<Empty>,
    ) -> Result<Response<Self::ListBoardsStream>, Status> {
        let actor = acting_user(&request)?;

        let boards = with_store(&self.pool, move |store| {
            BoardService::new(store).list_boards(&actor)
        }).await?;

        let proto_boards: Vec<ProtoBoard> = boards
            .into_iter()
            .map(ProtoBoard::from)
            .collect();

        Ok(Response::new(stream_items(proto_boards)))
    }

    async fn create_board(
        &self,
        request: Request<CreateBoardRequest>,
    ) -> Result<Response<ProtoBoardDetails>, Status> {
        let actor = acting_user(&request)?;
        let CreateBoardRequest { name, description } = request.into_inner();

        let details = with_store(&self.pool, move |store| {
            BoardService::new(store).create_board(&actor, NewBoard { name, description })
        }).await?;

        Ok(Response::new(details.into()))
    }

    async fn update_board(
        &self,
        request: Request<UpdateBoardRequest>,
    ) -> Result<Response<ProtoBoardDetails>, Status> {
        let actor = acting_user(&request)?;
        let UpdateBoardRequest { board_id, name, description, status, columns } = request.into_inner();

        let status = status
            .as_deref()
            .map(str::parse::<BoardStatus>)
            .transpose()
            .map_err(Status::from)?;
        let update = BoardUpdate {
            name,
            description,
            status,
            columns: columns.map(|set| {
                set.columns
                    .into_iter()
                    .map(ColumnInput::from)
                    .collect()
            }),
        };

        let details = with_store(&self.pool, move |store| {
            BoardService::new(store).update_board(&actor, &board_id, update)
        }).await?;

        Ok(Response::new(details.into()))
    }

    async fn reorder_columns(
        &self,
        request: Request<ReorderColumnsRequest>,
    ) -> Result<Response<Columns>, Status> {
        let actor = acting_user(&request)?;
        let ReorderColumnsRequest { board_id, columns } = request.into_inner();
        let positions: Vec<ColumnPosition> = columns
            .into_iter()
            .map(ColumnPosition::from)
            .collect();

        let columns = with_store(&self.pool, move |store| {
            BoardService::new(store).reorder_columns(&actor, &board_id, &positions)
        }).await?;

        Ok(Response::new(Columns {
            columns: columns.into_iter().map(ProtoColumn::from).collect()
        }))
    }

    async fn compact_board(
        &self,
        request: Request<BoardId>,
    ) -> Result<Response<CompactResult>, Status> {
        let actor = acting_user(&request)?;
        let board_id = request.into_inner().board_id;

        let updated = with_store(&self.pool, move |store| {
            BoardService::new(store).compact_board(&actor, &board_id)
        }).await?;

        Ok(Response::new(CompactResult {
            updated: u32::try_from(updated).unwrap_or(u32::MAX)
        }))
    }

    async fn delete_board(
        &self,
        request: Request<BoardId>,
    ) -> Result<Response<DeleteResult>, Status> {
        let actor = acting_user(&request)?;
        let board_id = request.into_inner().board_id;

        let deleted = with_store(&self.pool, move |store| {
            BoardService::new(store).delete_board(&actor, &board_id)
        }).await?;

        Ok(Response::new(DeleteResult { deleted }))
    }
}
