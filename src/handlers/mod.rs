pub mod auth_handlers;
pub mod json;

pub use auth_handlers::{
    change_password_handler, forgot_password_handler, health_handler, list_users_handler,
    login_handler, me_handler, register_handler, reset_password_handler,
};
