//! Access decisions for the current request, independent of HTTP.
//!
//! Every guard takes the (possibly absent) user resolved from the session and
//! either hands it back or says why access is refused. Suspended accounts are
//! refused everywhere, even on routes that only ask for a login.

use crate::{
    error::AppError,
    models::user::{User, UserRole},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Nobody is logged in; the client should go authenticate.
    LoginRequired,
    /// Logged in, but not allowed here.
    Forbidden,
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::LoginRequired => AppError::LoginRequired,
            Denial::Forbidden => AppError::Forbidden,
        }
    }
}

pub fn require_login(user: Option<&User>) -> Result<&User, Denial> {
    let user = user.ok_or(Denial::LoginRequired)?;
    if !user.is_active() {
        return Err(Denial::Forbidden);
    }
    Ok(user)
}

pub fn require_role<'a>(user: Option<&'a User>, allowed: &[UserRole]) -> Result<&'a User, Denial> {
    let user = require_login(user)?;
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        Err(Denial::Forbidden)
    }
}
