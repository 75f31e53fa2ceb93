mod models;
mod validation;
pub mod week;

pub use models::{
    Anime, Avatar, Comment, CommentPage, PopularAnime, SortOrder, ThreadedComment, ViewCount,
};
pub use validation::{
    CommentText, NewComment, UserName, ValidationError, COMMENT_TEXT_MAX_CHARS,
    USER_NAME_MAX_CHARS,
};
