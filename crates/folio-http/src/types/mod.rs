mod query;
mod request;
mod response;

pub use query::{Filter, Order, RowQuery};
pub use request::ApiRequest;
pub use response::{is_access_denied_status, ApiResponse};
