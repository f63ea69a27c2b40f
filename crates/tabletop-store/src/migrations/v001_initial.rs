//! v001 -- Initial schema creation.
//!
//! Users, campaigns, characters, the attribute/skill catalog, the character
//! join tables and campaign roles.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname      TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,              -- argon2id PHC string
    created_at    TEXT NOT NULL               -- RFC-3339
);

-- ----------------------------------------------------------------
-- Campaigns
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS campaigns (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    gm_id       INTEGER NOT NULL,             -- FK -> users(id)
    created_at  TEXT NOT NULL,

    FOREIGN KEY (gm_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_campaigns_gm_id ON campaigns(gm_id);

-- ----------------------------------------------------------------
-- Characters
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS characters (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    user_id     INTEGER NOT NULL,             -- FK -> users(id)
    campaign_id INTEGER,                      -- nullable FK -> campaigns(id)
    created_at  TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (campaign_id) REFERENCES campaigns(id)
);

CREATE INDEX IF NOT EXISTS idx_characters_user_id ON characters(user_id);
CREATE INDEX IF NOT EXISTS idx_characters_campaign_id ON characters(campaign_id);

-- ----------------------------------------------------------------
-- Attribute / skill catalog
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS attributes (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL UNIQUE,
    dice_type TEXT NOT NULL,                  -- e.g. "1d4"
    value     INTEGER NOT NULL DEFAULT 1      -- base value 1..=5
);

CREATE TABLE IF NOT EXISTS skills (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL UNIQUE,
    attribute_id INTEGER NOT NULL,            -- FK -> attributes(id)
    bonus        INTEGER NOT NULL DEFAULT 0,

    FOREIGN KEY (attribute_id) REFERENCES attributes(id)
);

-- ----------------------------------------------------------------
-- Character join tables (one row per pair by convention only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS character_attributes (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    character_id INTEGER NOT NULL,
    attribute_id INTEGER NOT NULL,
    value        INTEGER NOT NULL DEFAULT 1,

    FOREIGN KEY (character_id) REFERENCES characters(id),
    FOREIGN KEY (attribute_id) REFERENCES attributes(id)
);

CREATE INDEX IF NOT EXISTS idx_character_attributes_character
    ON character_attributes(character_id);

CREATE TABLE IF NOT EXISTS character_skills (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    character_id INTEGER NOT NULL,
    skill_id     INTEGER NOT NULL,
    bonus        INTEGER NOT NULL DEFAULT 0,

    FOREIGN KEY (character_id) REFERENCES characters(id),
    FOREIGN KEY (skill_id) REFERENCES skills(id)
);

CREATE INDEX IF NOT EXISTS idx_character_skills_character
    ON character_skills(character_id);

-- ----------------------------------------------------------------
-- Campaign roles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS character_roles (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    character_id INTEGER NOT NULL,
    user_id      INTEGER NOT NULL,
    campaign_id  INTEGER NOT NULL,
    role         TEXT NOT NULL,               -- "GM" | "Player"

    FOREIGN KEY (character_id) REFERENCES characters(id),
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (campaign_id) REFERENCES campaigns(id)
);

CREATE INDEX IF NOT EXISTS idx_character_roles_campaign ON character_roles(campaign_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
