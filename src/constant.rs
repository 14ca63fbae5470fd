/// Application name and metadata constants
pub const APP_NAME: &str = "Redline";

/// App related Magic Numbers
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// YAML document boundary marker, matched as a whole line
pub const DOCUMENT_SEPARATOR: &str = "---";
