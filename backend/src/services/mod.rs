pub mod auth;
pub mod authorization;
pub mod notification;
pub mod password_reset;
