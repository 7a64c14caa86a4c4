//! Occurrence generation using the `rrule` crate.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};
use timegrid_core::constants::MAX_OCCURRENCES_PER_WINDOW;

use crate::error::RfcResult;
use crate::rfc::datetime::resolve_local;

/// A recurrence rule anchored at a start instant, with exclusions applied.
///
/// All instants are handled in UTC. Exclusions only take effect when they match an
/// occurrence's exact instant, as with `EXDATE`.
#[derive(Debug, Clone)]
pub struct RecurrenceGenerator {
    rrule_set: RRuleSet,
    anchor: DateTime<Utc>,
}

impl RecurrenceGenerator {
    /// ## Summary
    /// Builds a generator from an `RRULE` value (with or without the `RRULE:` prefix).
    ///
    /// A floating or date-only `UNTIL` is read as UTC wall-clock time; a date-only value
    /// covers the whole day.
    ///
    /// ## Errors
    ///
    /// Returns `RfcError::RecurrenceRule` if the rule is malformed or fails validation
    /// against the anchor.
    pub fn new(
        rule: &str,
        anchor: DateTime<Utc>,
        exclude_dates: &[DateTime<Utc>],
    ) -> RfcResult<Self> {
        Self::new_in_zone(rule, anchor, exclude_dates, chrono_tz::Tz::UTC)
    }

    /// ## Summary
    /// Like [`Self::new`], but a floating or date-only `UNTIL` is wall-clock time in `zone`.
    ///
    /// ## Errors
    ///
    /// Returns `RfcError::RecurrenceRule` if the rule is malformed or fails validation
    /// against the anchor.
    pub fn new_in_zone(
        rule: &str,
        anchor: DateTime<Utc>,
        exclude_dates: &[DateTime<Utc>],
        zone: chrono_tz::Tz,
    ) -> RfcResult<Self> {
        let rule = rule.trim();
        let rule_text = normalize_until(rule.strip_prefix("RRULE:").unwrap_or(rule), zone);

        let rrule = rule_text.parse::<RRule<Unvalidated>>()?;
        let mut rrule_set = rrule.build(anchor.with_timezone(&Tz::UTC))?;

        if !exclude_dates.is_empty() {
            let exdates: Vec<DateTime<Tz>> = exclude_dates
                .iter()
                .map(|dt| dt.with_timezone(&Tz::UTC))
                .collect();
            rrule_set = rrule_set.set_exdates(exdates);
        }

        tracing::trace!(
            rule = %rule_text,
            anchor = %anchor,
            excluded = exclude_dates.len(),
            "Built recurrence set"
        );

        Ok(Self { rrule_set, anchor })
    }

    /// ## Summary
    /// Returns every occurrence start in `[window_start, window_end]`, ascending.
    #[must_use]
    pub fn generate_occurrences(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        if window_end < window_start {
            return Vec::new();
        }

        // Widen the rrule bounds by a second and filter here, so both ends are inclusive.
        let result = self
            .rrule_set
            .clone()
            .after((window_start - TimeDelta::seconds(1)).with_timezone(&Tz::UTC))
            .before((window_end + TimeDelta::seconds(1)).with_timezone(&Tz::UTC))
            .all(MAX_OCCURRENCES_PER_WINDOW);

        if result.limited {
            tracing::warn!(
                anchor = %self.anchor,
                limit = MAX_OCCURRENCES_PER_WINDOW,
                "Recurrence expansion hit the occurrence limit"
            );
        }

        result
            .dates
            .into_iter()
            .map(|dt| dt.with_timezone(&Utc))
            .filter(|dt| *dt >= window_start && *dt <= window_end)
            .collect()
    }

    /// ## Summary
    /// Returns the earliest occurrence at or after the anchor, if any survives exclusion.
    #[must_use]
    pub fn first_occurrence(&self) -> Option<DateTime<Utc>> {
        self.rrule_set
            .clone()
            .all(1)
            .dates
            .into_iter()
            .next()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Rewrites a floating or date-only `UNTIL` as a UTC instant, since `rrule` only accepts
/// a UTC `UNTIL` with a UTC anchor. Values it cannot read are left for `rrule` to reject.
fn normalize_until(rule_text: &str, zone: chrono_tz::Tz) -> String {
    rule_text
        .split(';')
        .map(|part| match part.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("UNTIL") => {
                floating_until_to_utc(value.trim(), zone)
                    .map_or_else(|| part.to_string(), |until| format!("UNTIL={until}"))
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn floating_until_to_utc(value: &str, zone: chrono_tz::Tz) -> Option<String> {
    if value.ends_with(['Z', 'z']) {
        return None;
    }

    let local = if value.contains(['T', 't']) {
        NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?
    } else {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()?
            .and_hms_opt(23, 59, 59)?
    };

    Some(
        resolve_local(local, zone)
            .with_timezone(&Utc)
            .format("%Y%m%dT%H%M%SZ")
            .to_string(),
    )
}
