pub mod otp;
pub mod session;
pub mod upload;
pub mod user;
