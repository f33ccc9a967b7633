pub mod auth;
pub mod booking;
pub mod flight;
pub mod recommendation;

pub use auth::{AuthData, LoginRequest, LoginResponse, LoginUser, ProfileUpdate, RegisterRequest, UserProfile};
pub use booking::{Booking, BookingStatus, BookingUpdateRequest, CreateBookingRequest};
pub use flight::Flight;
pub use recommendation::{DelayNotification, DelayReport, RebookingSuggestion, SuggestionsResponse};
