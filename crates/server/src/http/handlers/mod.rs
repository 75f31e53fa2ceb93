pub mod admin;
pub mod comments;
pub mod likes;
pub mod views;
