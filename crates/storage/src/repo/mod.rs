pub(crate) mod catalog;
pub(crate) mod comments;
pub(crate) mod likes;
pub(crate) mod pages;
pub(crate) mod views;

pub(crate) fn new_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
