pub mod format;
pub mod markup;
