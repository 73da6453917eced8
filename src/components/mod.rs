pub mod force_graph;
mod layout;
mod markdown;
mod papers;

pub use layout::{Footer, Header};
pub use markdown::Markdown;
pub use papers::PaperList;
