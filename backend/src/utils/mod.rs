pub mod cookies;
pub mod email;
pub mod password;
pub mod signed_token;
pub mod time;

pub use password::*;
pub use time::*;
