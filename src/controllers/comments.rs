use tonic::{Request, Response, Status};
use proto::kanban::{
    AddCommentRequest,
    CardId,
    Comment as ProtoComment,
    CommentId,
    Comments,
    DeleteResult,
    comments_service_server::CommentsService,
};

use crate::{
    controllers::{acting_user, with_store},
    db::connection::PgPool,
    services::CommentService,
};

pub struct CommentsController {
    pub pool: PgPool
}

#[tonic::async_trait]
impl CommentsService for CommentsController {
    async fn add_comment(
        &self,
        request: Request<AddCommentRequest>,
    ) -> Result<Response<ProtoComment>, Status> {
        let actor = acting_user(&request)?;
        let AddCommentRequest { card_id, content } = request.into_inner();

        let comment = with_store(&self.pool, move |store| {
            CommentService::new(store).add_comment(&actor, &card_id, &content)
        }).await?;

        Ok(Response::new(comment.into()))
    }

    async fn list_comments(
        &self,
        request: Request<CardId>,
    ) -> Result<Response<Comments>, Status> {
        let actor = acting_user(&request)?;
        let card_id = request.into_inner().card_id;

        let comments = with_store(&self.pool, move |store| {
            CommentService::new(store).list_comments(&actor, &card_id)
        }).await?;

        Ok(Response::new(Comments {
            comments: comments.into_iter().map(ProtoComment::from).collect()
        }))
    }

    async fn delete_comment(
        &self,
        request: Request<CommentId>,
    ) -> Result<Response<DeleteResult>, Status> {
        let actor = acting_user(&request)?;
        let comment_id = request.into_inner().comment_id;

        let deleted = with_store(&self.pool, move |store| {
            CommentService::new(store).delete_comment(&actor, &comment_id)
        }).await?;

        Ok(Response::new(DeleteResult { deleted }))
    }
}
