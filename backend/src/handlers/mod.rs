pub mod admin;
pub mod auth;
pub mod index;
pub mod password_reset;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
