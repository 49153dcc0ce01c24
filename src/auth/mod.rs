pub mod guard;
pub mod middleware;

pub use middleware::CurrentUser;
