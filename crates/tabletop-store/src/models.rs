//! Domain model structs persisted in the SQLite database.
//!
//! Every record struct derives `Serialize` so route handlers can hand it
//! straight back as JSON. Input structs derive `Deserialize` for the same
//! reason in the other direction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabletop_shared::types::{Patch, Role};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    /// Unique across users.
    pub email: String,
    /// argon2id PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// A campaign row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Owning user (game master).
    pub gm_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub description: String,
}

/// Campaign with its characters reduced to id + name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CampaignOverview {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub characters: Vec<CharacterSummary>,
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A character row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Owning user.
    pub user_id: i64,
    pub campaign_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterSummary {
    pub id: i64,
    pub name: String,
}

/// Input for creating a character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    /// attribute id -> value
    #[serde(default)]
    pub attributes: BTreeMap<i64, i64>,
    /// skill id -> bonus
    #[serde(default)]
    pub skills: BTreeMap<i64, i64>,
}

/// Partial update for a character. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<Option<String>>,
    /// attribute name -> value
    #[serde(default)]
    pub attributes: Patch<BTreeMap<String, i64>>,
    /// skill name -> bonus
    #[serde(default)]
    pub skills: Patch<BTreeMap<String, i64>>,
}

/// Optional filters for listing characters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CharacterFilter {
    pub user_id: Option<i64>,
    pub campaign_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A catalog attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
    /// Dice notation derived from `value`, e.g. `"1d4"`.
    pub dice_type: String,
    /// Base value, 1..=5.
    pub value: i64,
}

/// A catalog skill, tied to one attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub attribute_id: i64,
    /// Default bonus.
    pub bonus: i64,
}

/// All attributes plus skills grouped under their attribute's name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Catalog {
    pub attributes: Vec<Attribute>,
    pub grouped_skills: BTreeMap<String, Vec<Skill>>,
}

// ---------------------------------------------------------------------------
// Character sheet
// ---------------------------------------------------------------------------

/// Attribute value on a sheet, resolved to the catalog name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SheetAttribute {
    pub attribute_id: i64,
    pub name: String,
    pub value: i64,
    /// Die this value rolls, e.g. `"1d8"`.
    pub die: String,
}

/// Skill bonus on a sheet, resolved to the catalog name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SheetSkill {
    pub skill_id: i64,
    pub name: String,
    pub bonus: i64,
}

/// A character with all of its attribute values and skill bonuses loaded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CharacterSheet {
    #[serde(flatten)]
    pub character: Character,
    pub attributes: Vec<SheetAttribute>,
    pub skills: Vec<SheetSkill>,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// `character_roles` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterRole {
    pub id: i64,
    pub character_id: i64,
    pub user_id: i64,
    pub campaign_id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCharacterRole {
    pub character_id: i64,
    pub user_id: i64,
    pub campaign_id: i64,
    pub role: Role,
}
