// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Taskboard";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "taskboard";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".taskboard";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "taskboard.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TASKBOARD_CONFIG";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "TASKBOARD_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

pub const ENV_HOST: &str = "TASKBOARD_HOST";
pub const ENV_PORT: &str = "TASKBOARD_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TASKBOARD_LOG";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "TASKBOARD_DATA_DIR";

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable holding the JWT signing secret
pub const ENV_JWT_SECRET: &str = "TASKBOARD_JWT_SECRET";

/// File (inside the data directory) holding the generated JWT signing key
pub const JWT_KEY_FILENAME: &str = "jwt.key";

/// Length of the generated signing key in bytes
pub const JWT_KEY_LENGTH: usize = 32;

/// Environment variables for the bootstrap administrator
pub const ENV_ADMIN_EMAIL: &str = "TASKBOARD_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "TASKBOARD_ADMIN_PASSWORD";

/// Email used for the bootstrap administrator when none is configured
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@taskboard.local";

/// Cookie name for session token
pub const SESSION_COOKIE_NAME: &str = "taskboard_session";

/// Default token TTL in hours
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 8;

/// Minimum password length accepted for new credentials
pub const PASSWORD_MIN_LEN: u64 = 8;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "taskboard.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for general API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints (64 KB)
pub const AUTH_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Boards
// =============================================================================

/// Board role: owner (derived from boards.owner_id)
pub const BOARD_ROLE_OWNER: &str = "OWNER";

/// Board role: editor (read + write)
pub const BOARD_ROLE_EDITOR: &str = "EDITOR";

/// Board role: viewer (read-only)
pub const BOARD_ROLE_VIEWER: &str = "VIEWER";

/// Maximum board/section/column name length
pub const NAME_MAX_LEN: u64 = 200;

/// Maximum item title length
pub const TITLE_MAX_LEN: u64 = 500;

/// Maximum comment length
pub const COMMENT_MAX_LEN: u64 = 10_000;

/// Maximum options on a SELECT column
pub const SELECT_OPTIONS_MAX: usize = 100;

// =============================================================================
// Activity Log
// =============================================================================

/// Number of entries returned by the board activity listing
pub const ACTIVITY_LIST_LIMIT: u32 = 100;

/// Maximum stored length of old/new values (characters)
pub const ACTIVITY_VALUE_MAX_LEN: usize = 500;

/// Prefix given to deactivated users' names
pub const DEACTIVATED_USER_PREFIX: &str = "Deactivated User";
