//! Conversions between protobuf messages and domain types.

use proto::kanban::{
    Board as ProtoBoard,
    BoardDetails as ProtoBoardDetails,
    Card as ProtoCard,
    Column as ProtoColumn,
    ColumnInput as ProtoColumnInput,
    ColumnPosition as ProtoColumnPosition,
    ColumnWithCards as ProtoColumnWithCards,
    Comment as ProtoComment,
    Share as ProtoShare,
    SharedUser as ProtoSharedUser,
    UserSummary as ProtoUserSummary,
};

use crate::domain::{
    Board, BoardDetails, BoardShare, Card, Column, ColumnInput, ColumnPosition, ColumnWithCards,
    Comment, UserSummary,
};

impl From<Board> for ProtoBoard {
    fn from(board: Board) -> Self {
        ProtoBoard {
            status: board.status.as_str().to_string(),
            id: board.id,
            name: board.name,
            description: board.description,
            owner_id: board.owner_id,
        }
    }
}

impl From<Column> for ProtoColumn {
    fn from(column: Column) -> Self {
        ProtoColumn {
            id: column.id,
            board_id: column.board_id,
            name: column.name,
            color: column.color,
            position: column.position,
        }
    }
}

impl From<Card> for ProtoCard {
    fn from(card: Card) -> Self {
        ProtoCard {
            id: card.id,
            board_id: card.board_id,
            column_id: card.column_id,
            title: card.title,
            description: card.description,
            position: card.position,
            assigned_user_id: card.assigned_user_id,
            created_by: card.created_by,
        }
    }
}

impl From<ColumnWithCards> for ProtoColumnWithCards {
    fn from(column: ColumnWithCards) -> Self {
        ProtoColumnWithCards {
            column: Some(column.column.into()),
            cards: column.cards.into_iter().map(ProtoCard::from).collect(),
        }
    }
}

impl From<BoardDetails> for ProtoBoardDetails {
    fn from(details: BoardDetails) -> Self {
        ProtoBoardDetails {
            board: Some(details.board.into()),
            columns: details
                .columns
                .into_iter()
                .map(ProtoColumnWithCards::from)
                .collect(),
        }
    }
}

impl From<BoardShare> for ProtoShare {
    fn from(share: BoardShare) -> Self {
        ProtoShare {
            id: share.id,
            board_id: share.board_id,
            user_id: share.user_id,
        }
    }
}

impl From<UserSummary> for ProtoUserSummary {
    fn from(user: UserSummary) -> Self {
        ProtoUserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

pub fn shared_user(share: BoardShare, user: UserSummary) -> ProtoSharedUser {
    ProtoSharedUser {
        share: Some(share.into()),
        user: Some(user.into()),
    }
}

impl From<Comment> for ProtoComment {
    fn from(comment: Comment) -> Self {
        ProtoComment {
            created_at: comment.created_at.timestamp(),
            id: comment.id,
            card_id: comment.card_id,
            user_id: comment.user_id,
            content: comment.content,
        }
    }
}

impl From<ProtoColumnInput> for ColumnInput {
    fn from(input: ProtoColumnInput) -> Self {
        ColumnInput {
            id: input.id.filter(|id| !id.is_empty()),
            name: input.name,
            color: input.color,
            position: input.position,
        }
    }
}

impl From<ProtoColumnPosition> for ColumnPosition {
    fn from(input: ProtoColumnPosition) -> Self {
        ColumnPosition {
            id: input.id,
            position: input.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_column_id_means_new_column() {
        let input: ColumnInput = ProtoColumnInput {
            id: Some(String::new()),
            name: "Review".to_string(),
            color: None,
            position: 2,
        }
        .into();

        assert_eq!(input, ColumnInput::new_column("Review", 2));
    }

    #[test]
    fn board_status_is_sent_as_text() {
        let board = Board::new("owner", "Sprint 1", None);
        let proto: ProtoBoard = board.into();
        assert_eq!(proto.status, "active");
        assert_eq!(proto.owner_id, "owner");
    }
}
