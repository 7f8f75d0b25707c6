pub mod board;
pub mod card;
pub mod column;
pub mod comment;
pub mod share;
pub mod user;
