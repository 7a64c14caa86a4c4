//! Timezone resolution and wall-clock to instant conversion.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{RfcError, RfcResult};

/// Resolver for timezone identifiers.
///
/// Maintains a cache of resolved zones keyed by the identifier the caller passed in.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a timezone identifier to a `chrono_tz::Tz`.
    ///
    /// Vendor prefixes, Windows zone names and IANA aliases are normalized first.
    ///
    /// ## Errors
    ///
    /// Returns `RfcError::UnknownTimezone` if the identifier cannot be resolved.
    ///
    /// ## Side Effects
    ///
    /// Caches successful resolutions to avoid repeated parsing.
    pub fn resolve(&mut self, tzid: &str) -> RfcResult<Tz> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(*tz);
        }

        let tz = lookup_zone(tzid)?;

        self.cache.insert(tzid.to_string(), tz);

        Ok(tz)
    }

    /// ## Summary
    /// Resolves `tzid`, falling back to `fallback` when the identifier is not a known zone.
    ///
    /// ## Side Effects
    ///
    /// Logs a warning when the fallback is used.
    pub fn resolve_or_default(&mut self, tzid: &str, fallback: Tz) -> Tz {
        match self.resolve(tzid) {
            Ok(tz) => tz,
            Err(error) => {
                tracing::warn!(%error, fallback = %fallback, "Invalid time zone, using fallback");
                fallback
            }
        }
    }
}

/// Resolves a timezone identifier without caching, normalizing vendor names first.
fn lookup_zone(tzid: &str) -> RfcResult<Tz> {
    Tz::from_str(tzid)
        .or_else(|_e| Tz::from_str(&normalize_tzid(tzid)))
        .map_err(|_e| RfcError::UnknownTimezone(tzid.to_string()))
}

/// ## Summary
/// Resolves the zone an individual value is annotated with, falling back to `fallback`.
///
/// ## Side Effects
///
/// Logs a warning when the fallback is used.
#[must_use]
pub fn zone_or_fallback(tzid: &str, fallback: Tz) -> Tz {
    lookup_zone(tzid).unwrap_or_else(|error| {
        tracing::warn!(%error, fallback = %fallback, "Invalid time zone, using fallback");
        fallback
    })
}

/// Normalizes vendor timezone identifiers to IANA names.
///
/// Strips `/mozilla.org/`-style prefixes, maps Windows zone names and
/// canonicalizes IANA aliases (`Europe/Kiev` -> `Europe/Kyiv`).
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let iana_parser = IanaParserExtended::new();

    if let Some(tz) = WindowsParser::new().parse(stripped, None) {
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Maps a wall-clock time in `zone` to a zoned instant.
///
/// A time inside a DST fold resolves to the earlier instant. A time inside a DST gap
/// is shifted forward by one hour, so `02:30` on a spring-forward night becomes `03:30`.
#[must_use]
pub fn resolve_local(local: NaiveDateTime, zone: Tz) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let shifted = local + TimeDelta::hours(1);
            zone.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| zone.from_utc_datetime(&local))
        }
    }
}

/// ## Summary
/// Reinterprets the wall-clock fields of `datetime` in `zone` ("keep local time").
///
/// `2024-05-01T00:00 America/New_York` forced to UTC is `2024-05-01T00:00Z`, a different
/// instant with the same calendar fields.
#[must_use]
pub fn force_zone<Z: TimeZone>(datetime: &DateTime<Z>, zone: Tz) -> DateTime<Tz> {
    resolve_local(datetime.naive_local(), zone)
}
