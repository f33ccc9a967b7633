pub mod models;
pub mod pii;

pub use models::{
    AuthData, Booking, BookingStatus, BookingUpdateRequest, CreateBookingRequest,
    DelayNotification, DelayReport, Flight, LoginRequest, LoginResponse, LoginUser,
    ProfileUpdate, RebookingSuggestion, RegisterRequest, SuggestionsResponse, UserProfile,
};
pub use pii::Redacted;
