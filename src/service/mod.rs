pub mod accounts;
pub mod auth;
pub mod config;
pub mod notify;
pub mod otp;
pub mod password;
pub mod session;
pub mod validation;

#[cfg(test)]
pub mod testing;
