/// Collection holding mentor directory records
pub const COLLECTION_MENTORS: &str = "mentors";

/// Collection holding user accounts (both roles)
pub const COLLECTION_USERS: &str = "users";

/// Collection holding the mentor dashboard planning list
pub const COLLECTION_TASKS: &str = "tasks";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Maximum profile photo size in bytes (5 MiB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Lowest star value a review may carry. There is no upper bound.
pub const MIN_REVIEW_STARS: i64 = 1;

/// Shown in place of the scheduling widget when a mentor has no URL.
pub const BOOKING_UNAVAILABLE_MESSAGE: &str = "Calendly URL not available for this mentor.";

/// Badge thresholds on completed sessions
pub const BADGE_GOLD_SESSIONS: u32 = 10;
pub const BADGE_SILVER_SESSIONS: u32 = 6;
