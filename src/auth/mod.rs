//! Accounts and bearer sessions

mod accounts;
mod password;
mod tokens;

pub use accounts::{AccountView, AuthResponse, AuthService, TokenPair};
pub use password::{hash_password, verify_password};
pub use tokens::{generate_token, hash_token};
