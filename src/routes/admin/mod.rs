mod handler;
mod model;

pub use handler::{
    block_identifier, cache_stats, clear_cache, rate_limit_status, unblock_identifier,
};
pub use model::{BlockRequest, BlockResponse, RateLimitStatusResponse, UnblockResponse};
