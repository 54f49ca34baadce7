pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod user;
