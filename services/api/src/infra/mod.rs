pub mod blob;
pub mod db;
pub mod delivery;
pub mod otp;
pub mod otp_memory;
pub mod otp_redis;
pub mod password;
