pub mod auth;
pub mod response;

pub use auth::{authorize_middleware, caller_from_headers};
pub use response::{ApiResponse, ApiResult};
