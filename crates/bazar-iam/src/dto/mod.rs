//! Request and response DTOs for the authority API.

pub mod request;
pub mod response;

pub use request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
pub use response::{LoginResponse, MessageResponse, RefreshResponse, RegisterResponse};
