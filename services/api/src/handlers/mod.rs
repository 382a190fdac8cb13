pub mod chat;
pub mod health;
pub mod otp;
pub mod session;
pub mod upload;
pub mod user;
