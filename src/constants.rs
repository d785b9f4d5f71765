// Archive and entry selection
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";
pub const DEFAULT_ENTRY_SUFFIX: &str = ".xml";

// Output headers
pub const DOCUMENTS_HEADER: [&str; 2] = ["id", "level"];
pub const OBJECTS_HEADER: [&str; 2] = ["id", "name"];

// Document layout
pub const ROOT_ELEMENT: &str = "root";
pub const FIELD_ELEMENT: &str = "var";
pub const OBJECTS_ELEMENT: &str = "objects";
pub const OBJECT_ELEMENT: &str = "object";
pub const ID_FIELD: &str = "id";
pub const LEVEL_FIELD: &str = "level";

// Work distribution
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
pub const WORKER_THREAD_PREFIX: &str = "collector-worker";

/// Sink names carried by write errors
pub const DOCUMENTS_SINK: &str = "documents";
pub const OBJECTS_SINK: &str = "objects";

// Entry policy aliases
pub const FAIL_FAST_ALIASES: &[&str] = &["fail-fast", "failfast", "abort"];
pub const SKIP_ENTRY_ALIASES: &[&str] = &["skip-entry", "skip", "isolate"];
