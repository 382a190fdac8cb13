// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Serialize seconds since the UNIX epoch (JWT `iat`/`exp`) as RFC 3339.
pub fn unix_secs_to_rfc3339<S>(secs: &u64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let dt = i64::try_from(*secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| ::serde::ser::Error::custom("timestamp out of range"))?;
    to_rfc3339_ms(&dt, s)
}
