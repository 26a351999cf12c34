//! API models for request and response payloads

pub mod claim;
pub mod user;

pub use claim::{Claim, ClaimListing, ClaimPage, ListClaimsQuery, Paging};
pub use user::{
    AuthResponse, ChangePasswordRequest, NewUser, SignInRequest, SignUpRequest,
    UpdateUserRequest, User,
};
