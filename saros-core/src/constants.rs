/// Number of numbered Saros series per eclipse kind.
pub const SAROS_SERIES_COUNT: usize = 180;

/// One Saros cycle in years (~18 years 11 days 8 hours).
pub const SAROS_PERIOD_YEARS: f64 = 18.031;

/// Default spacing threshold for the integrity checks, in years.
///
/// Adjacent members of a series are spaced by one Saros period; a silently
/// missing member shows up as a gap near two periods. 1.5 periods sits
/// strictly between the two, so normal spacing passes and an omission trips.
pub const DEFAULT_MAX_GAP_YEARS: f64 = SAROS_PERIOD_YEARS * 1.5;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Mean Julian year in seconds, used to express time gaps in years.
pub const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;

/// Julian Day Number of the Unix epoch (1970-01-01).
pub const UNIX_EPOCH_JDN: i64 = 2_440_588;
