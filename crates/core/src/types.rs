/// Content page primary keys.
pub type PageId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Ordered string map used for URL keyword arguments and route params.
pub type StringMap = indexmap::IndexMap<String, String>;
