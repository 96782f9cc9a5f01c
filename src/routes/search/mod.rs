mod handler;
mod model;

pub use handler::{ai_search, search};
pub use model::{AiSearchRequest, SearchPayload, SearchQuery};
