/// Time unit constants shared across crates
pub const MILLISECONDS_IN_SECOND: i64 = 1_000;
pub const MILLISECONDS_IN_MINUTE: i64 = 60 * MILLISECONDS_IN_SECOND;
pub const MILLISECONDS_IN_HOUR: i64 = 60 * MILLISECONDS_IN_MINUTE;
pub const MILLISECONDS_IN_DAY: i64 = 24 * MILLISECONDS_IN_HOUR;

/// Longest visible range the grid renders at once
pub const MAX_NUMBER_OF_DAYS: u8 = 7;
pub const DAYS_IN_WEEK: u8 = 7;

/// Width multiplier applied to overlap-mode items that have something cascading over them
pub const OVERLAP_WIDTH_FACTOR: f64 = 1.7;

/// Upper bound on occurrences produced for one recurring event in a single window
pub const MAX_OCCURRENCES_PER_WINDOW: u16 = 1000;

/// Zone used when a configured or requested zone cannot be resolved
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Environment variable prefix for settings
pub const ENV_PREFIX: &str = "TIMEGRID";
pub const CONFIG_FILE_NAME: &str = "timegrid.toml";
