//! Data models shared across database access and API handlers.

pub mod password_reset;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod user;
