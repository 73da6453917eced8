pub mod chat_search;
pub mod home;
pub mod knowledge_graph;
pub mod not_found;
