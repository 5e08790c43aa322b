//! Job constants
//!
//! Centralized location for the fixed values shared by the parser, the
//! generator and the adapters.

// Date lines
pub const DATE_LINE_FORMAT: &str = "%Y%m%d %H:%M";
pub const DATE_LINE_LEN: usize = 14;
pub const DATE_LINE_SEPARATOR: char = 'T';

// Calendar events
pub const EVENT_TIME_ZONE: &str = "Eastern Standard Time";
pub const EVENT_TIME_ZONE_IANA: &str = "America/New_York";

// Subjects
pub const SUBJECT_ID_MARKER: &str = "id";
pub const SUBJECT_DELETE_PREFIX: &str = "delete";

// Synthetic traffic
pub const SYNTHETIC_ID_MIN: u32 = 10;
pub const SYNTHETIC_ID_MAX_EXCLUSIVE: u32 = 100;
pub const SYNTHETIC_SUBJECT_SUFFIX: &str = " Graph Function Workshop";
pub const SYNTHETIC_LINE_BREAK: &str = "\n\r";
pub const DEFAULT_SYNTHETIC_PER_MAILBOX: usize = 3;

// Calendar listing window (days relative to today)
pub const CALENDAR_DAYS_BACK: i64 = 5;
pub const CALENDAR_DAYS_AHEAD: i64 = 6;

// Scheduling and endpoints
pub const DEFAULT_SCHEDULE: &str = "0 */5 * * * *";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const MAILBOX_LIST_SEPARATOR: char = ';';
