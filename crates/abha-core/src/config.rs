/// Error returned when environment variables do not match the config shape.
pub use envy::Error as ConfigLoadError;

/// Loads service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `otp_ttl_secs` is read from
/// `OTP_TTL_SECS`, and so on. Use `#[serde(default = "...")]` for optional
/// settings.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Load from explicit key/value pairs instead of the process environment.
    fn from_pairs<I>(pairs: I) -> Result<Self, ConfigLoadError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
