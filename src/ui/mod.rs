pub mod compose;
pub mod font;
