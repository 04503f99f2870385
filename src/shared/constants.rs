/// Default number of items returned by list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of items returned by list endpoints
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum number of photos accepted per report
pub const MAX_PHOTOS_PER_REPORT: usize = 5;

/// Maximum size of a single uploaded photo in bytes (5MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Maximum length of free-text status and display name fields
pub const MAX_SHORT_TEXT_LEN: u64 = 120;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Default role assigned to newly registered users
pub const ROLE_REPORTER: &str = "reporter";
