//! # Startup Capability Check
//!
//! Every kind depends on the bundled zone database and on a clock whose
//! reading can be expressed as a local date-time. Both are verified once,
//! before any schema is handed out; a failure here is the only fatal
//! condition in the layer.

use chrono::SecondsFormat;

use crate::clock::Clock;
use crate::error::CapabilityError;
use crate::exact::{Instant, ZonedDateTime};
use crate::zone::TimeZone;

/// Zones that must resolve for the layer to operate.
const REQUIRED_ZONES: [&str; 2] = ["UTC", "Europe/Paris"];

/// Verify the zone database and the clock.
pub fn check(clock: &dyn Clock) -> Result<(), CapabilityError> {
    for zone in REQUIRED_ZONES {
        if TimeZone::from_id(zone).is_none() {
            tracing::error!(zone, "time zone database check failed");
            return Err(CapabilityError::TimeZoneDatabase {
                zone: zone.to_string(),
            });
        }
    }

    let now = clock.now();
    let zone = clock.time_zone();
    if ZonedDateTime::from_instant(Instant::from_utc(now), zone).is_none() {
        let moment = now.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        tracing::error!(%moment, zone = %zone, "clock reading not representable");
        return Err(CapabilityError::ClockOutOfRange {
            moment,
            zone: zone.id(),
        });
    }

    tracing::debug!(zone = %zone, "capability check passed");
    Ok(())
}
