// In crates/web-server/src/types.rs

use engine::RankedView;
use serde::Serialize;

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The response to a watch toggle: the new membership plus the refreshed table.
#[derive(Debug, Serialize)]
pub struct WatchResponse {
    pub id: String,
    pub watched: bool,
    pub view: RankedView,
}
