pub mod api;
pub mod error;
pub mod search;
pub mod token;

pub use api::{BookingApi, RecommendationApi};
pub use error::{ApiError, ApiResult};
