use crate::domain::repository::OtpDelivery;
use crate::error::DeliveryError;

/// Development delivery channel: writes the code to the service log instead of
/// sending mail. Swap for a real mailer or SMS gateway in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOtpDelivery;

impl OtpDelivery for LogOtpDelivery {
    async fn deliver(&self, identity: &str, code: &str) -> Result<(), DeliveryError> {
        tracing::info!(target: "otp_delivery", identity, code, "otp issued");
        Ok(())
    }
}
