use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DAYS_IN_WEEK, DEFAULT_TIME_ZONE, ENV_PREFIX, MAX_NUMBER_OF_DAYS,
};
use crate::error::{CoreError, CoreResult};
use crate::types::OverlapType;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

/// Inputs the layout engine reads from its host calendar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// IANA zone the grid is rendered in
    pub time_zone: String,
    /// First day of the week, 1 = Monday .. 7 = Sunday
    pub first_day: u8,
    pub number_of_days: u8,
    /// Weekdays (1..=7) that are not rendered
    pub hide_week_days: Vec<u8>,
    /// Minutes under which two start times count as "the same" in overlap mode
    pub min_start_difference: u32,
    /// Timed events shorter than this are stretched to it
    pub min_regular_event_minutes: u32,
    pub overlap_type: OverlapType,
    pub use_all_day_event: bool,
    pub debounce_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            first_day: 1,
            number_of_days: MAX_NUMBER_OF_DAYS,
            hide_week_days: Vec::new(),
            min_start_difference: 15,
            min_regular_event_minutes: 1,
            overlap_type: OverlapType::NoOverlap,
            use_all_day_event: true,
            debounce_ms: 150,
        }
    }
}

impl LayoutConfig {
    /// ## Summary
    /// Checks the hard invariants of a calendar configuration.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if `number_of_days` is outside `1..=7`,
    /// `first_day` or any hidden weekday is outside `1..=7`, or every weekday is hidden.
    pub fn validate(&self) -> CoreResult<()> {
        if self.number_of_days == 0 || self.number_of_days > MAX_NUMBER_OF_DAYS {
            return Err(CoreError::InvalidConfiguration(format!(
                "number_of_days must be between 1 and {MAX_NUMBER_OF_DAYS}, got {}",
                self.number_of_days
            )));
        }

        if !is_week_day(self.first_day) {
            return Err(CoreError::InvalidConfiguration(format!(
                "first_day must be between 1 and 7, got {}",
                self.first_day
            )));
        }

        if let Some(day) = self.hide_week_days.iter().find(|day| !is_week_day(**day)) {
            return Err(CoreError::InvalidConfiguration(format!(
                "hide_week_days entries must be between 1 and 7, got {day}"
            )));
        }

        let hidden = (1..=DAYS_IN_WEEK)
            .filter(|day| self.hide_week_days.contains(day))
            .count();
        if hidden == usize::from(DAYS_IN_WEEK) {
            return Err(CoreError::InvalidConfiguration(
                "hide_week_days hides every day of the week".to_string(),
            ));
        }

        Ok(())
    }
}

const fn is_week_day(day: u8) -> bool {
    day >= 1 && day <= DAYS_IN_WEEK
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from an optional `timegrid.toml` and `TIMEGRID_*` environment
    /// variables into a `Settings`. Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let defaults = LayoutConfig::default();

        Ok(Config::builder()
            .set_default("layout.time_zone", defaults.time_zone)?
            .set_default("layout.first_day", i64::from(defaults.first_day))?
            .set_default("layout.number_of_days", i64::from(defaults.number_of_days))?
            .set_default("layout.hide_week_days", Vec::<i64>::new())?
            .set_default(
                "layout.min_start_difference",
                i64::from(defaults.min_start_difference),
            )?
            .set_default(
                "layout.min_regular_event_minutes",
                i64::from(defaults.min_regular_event_minutes),
            )?
            .set_default("layout.overlap_type", defaults.overlap_type.as_str())?
            .set_default("layout.use_all_day_event", defaults.use_all_day_event)?
            .set_default(
                "layout.debounce_ms",
                i64::try_from(defaults.debounce_ms).unwrap_or(i64::MAX),
            )?
            .set_default("logging.level", "debug")?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            // Env, e.g. TIMEGRID_LAYOUT__FIRST_DAY=7
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("layout.hide_week_days")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();
    tracing::debug!(file = CONFIG_FILE_NAME, prefix = ENV_PREFIX, "Loading configuration");

    let settings = Settings::load()?;
    settings.layout.validate()?;

    Ok(settings)
}
