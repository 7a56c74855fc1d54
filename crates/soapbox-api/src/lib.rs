pub mod auth;
pub mod error;
pub mod feedback;
pub mod forms;
pub mod middleware;
pub mod password;
pub mod users;

pub use auth::{AppState, AppStateInner};
