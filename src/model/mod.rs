pub mod author;
pub mod comment;
pub mod issue;
pub mod label;
