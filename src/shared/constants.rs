/// Default number of candidates returned by a search endpoint
pub const SEARCH_DEFAULT_LIMIT: usize = 100;

/// Maximum number of candidates a search endpoint may return
pub const SEARCH_MAX_LIMIT: usize = 500;
