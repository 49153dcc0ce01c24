pub mod reset_token;
pub mod user;

pub use reset_token::PasswordResetToken;
pub use user::{PublicUser, Role, User};
