//! SQLite schema definitions
//!
//! `position` stores the dense 0-based rank exposed as `order`. There is no unique
//! index on (parent, position): shifts update rows one at a time and would collide.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users (soft-deleted via is_active)
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    email TEXT NOT NULL UNIQUE CHECK(length(email) >= 3 AND email = lower(email)),
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'MEMBER' CHECK(role IN ('ADMIN', 'MEMBER')),
    is_active INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0, 1)),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_active_name ON users(is_active, name);

-- =============================================================================
-- 2. Boards
-- =============================================================================
CREATE TABLE IF NOT EXISTS boards (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    owner_id TEXT NOT NULL REFERENCES users(id),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_boards_owner ON boards(owner_id);

-- =============================================================================
-- 3. Board Members (OWNER row mirrors boards.owner_id)
-- =============================================================================
CREATE TABLE IF NOT EXISTS board_members (
    board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id),
    role TEXT NOT NULL CHECK(role IN ('OWNER', 'EDITOR', 'VIEWER')),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (board_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_board_members_user ON board_members(user_id);

-- =============================================================================
-- 4. Sections (ranked within board)
-- =============================================================================
CREATE TABLE IF NOT EXISTS sections (
    id TEXT PRIMARY KEY,
    board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    position INTEGER NOT NULL CHECK(position >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sections_board_position ON sections(board_id, position);

-- =============================================================================
-- 5. Custom column definitions (ranked within board)
-- =============================================================================
CREATE TABLE IF NOT EXISTS board_columns (
    id TEXT PRIMARY KEY,
    board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    data_type TEXT NOT NULL CHECK(data_type IN (
        'TEXT', 'LONG_TEXT', 'SELECT', 'USER', 'DATE', 'NUMBER', 'FORMULA'
    )),
    position INTEGER NOT NULL CHECK(position >= 0),
    options TEXT NOT NULL DEFAULT '[]' CHECK(json_valid(options)),
    formula_expression TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    CHECK(data_type != 'SELECT' OR json_array_length(options) > 0),
    CHECK(data_type != 'FORMULA' OR length(trim(coalesce(formula_expression, ''))) > 0)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_board_columns_name ON board_columns(board_id, name);
CREATE INDEX IF NOT EXISTS idx_board_columns_board_position ON board_columns(board_id, position);

-- =============================================================================
-- 6. Items (ranked within section)
-- =============================================================================
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    section_id TEXT NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
    title TEXT NOT NULL CHECK(length(title) >= 1),
    position INTEGER NOT NULL CHECK(position >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_section_position ON items(section_id, position);

-- =============================================================================
-- 7. Item values (sparse; absent row = unset)
-- =============================================================================
CREATE TABLE IF NOT EXISTS item_values (
    item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    column_id TEXT NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
    value TEXT NOT NULL CHECK(length(value) > 0),
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (item_id, column_id)
);

CREATE INDEX IF NOT EXISTS idx_item_values_column ON item_values(column_id);

-- =============================================================================
-- 8. Comments
-- =============================================================================
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    author_id TEXT NOT NULL REFERENCES users(id),
    content TEXT NOT NULL CHECK(length(content) >= 1),
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_item ON comments(item_id, created_at);

-- =============================================================================
-- 9. Activity log (append-only)
-- =============================================================================
CREATE TABLE IF NOT EXISTS activity_logs (
    id TEXT PRIMARY KEY,
    board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    actor_id TEXT NOT NULL REFERENCES users(id),
    action TEXT NOT NULL CHECK(action IN ('CREATE', 'UPDATE', 'DELETE', 'MOVE')),
    entity_type TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    old_value TEXT,
    new_value TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activity_logs_board_time ON activity_logs(board_id, created_at DESC);
"#;
