//! Character CRUD.
//!
//! Creation, patching and deletion touch the character row together with its
//! `character_attributes` / `character_skills` join rows, so each runs inside
//! a single transaction. Dropping the transaction without committing rolls
//! everything back.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tabletop_shared::dice::Die;
use tabletop_shared::types::Patch;

use crate::database::{row_exists, timestamp_at, Database};
use crate::error::{not_found, Result, StoreError};
use crate::models::{
    Character, CharacterFilter, CharacterPatch, CharacterSheet, NewCharacter, SheetAttribute,
    SheetSkill,
};

const CHARACTER_COLUMNS: &str = "id, name, description, user_id, campaign_id, created_at";

impl Database {
    /// Create a character owned by `owner_id` along with its attribute values
    /// (keyed by attribute id) and skill bonuses (keyed by skill id).
    pub fn create_character(&mut self, owner_id: i64, new: NewCharacter) -> Result<Character> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("character name is required".into()));
        }

        for value in new.attributes.values() {
            check_range("attribute value", *value)?;
        }
        for bonus in new.skills.values() {
            check_range("skill bonus", *bonus)?;
        }

        let created_at = Utc::now();
        let tx = self.conn_mut().transaction()?;

        if let Some(campaign_id) = new.campaign_id {
            if !row_exists(&tx, "campaigns", campaign_id)? {
                return Err(StoreError::NotFound("campaign"));
            }
        }
        for attribute_id in new.attributes.keys() {
            if !row_exists(&tx, "attributes", *attribute_id)? {
                return Err(StoreError::UnknownAttribute(attribute_id.to_string()));
            }
        }
        for skill_id in new.skills.keys() {
            if !row_exists(&tx, "skills", *skill_id)? {
                return Err(StoreError::UnknownSkill(skill_id.to_string()));
            }
        }

        tx.execute(
            "INSERT INTO characters (name, description, user_id, campaign_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                name,
                new.description,
                owner_id,
                new.campaign_id,
                created_at.to_rfc3339()
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut insert_attr = tx.prepare(
                "INSERT INTO character_attributes (character_id, attribute_id, value)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (attribute_id, value) in &new.attributes {
                insert_attr.execute(params![id, attribute_id, value])?;
            }

            let mut insert_skill = tx.prepare(
                "INSERT INTO character_skills (character_id, skill_id, bonus)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (skill_id, bonus) in &new.skills {
                insert_skill.execute(params![id, skill_id, bonus])?;
            }
        }

        tx.commit()?;

        tracing::info!(
            character_id = id,
            owner_id,
            attributes = new.attributes.len(),
            skills = new.skills.len(),
            "character created"
        );

        Ok(Character {
            id,
            name: name.to_string(),
            description: new.description,
            user_id: owner_id,
            campaign_id: new.campaign_id,
            created_at,
        })
    }

    pub fn get_character(&self, id: i64) -> Result<Character> {
        load_character(self.conn(), id)
    }

    /// All characters, optionally narrowed to one owner and/or one campaign.
    pub fn list_characters(&self, filter: CharacterFilter) -> Result<Vec<Character>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters
             WHERE (?1 IS NULL OR user_id = ?1)
               AND (?2 IS NULL OR campaign_id = ?2)
             ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map(
            params![filter.user_id, filter.campaign_id],
            row_to_character,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The character with its attribute values and skill bonuses, resolved
    /// to catalog names.
    pub fn get_sheet(&self, id: i64) -> Result<CharacterSheet> {
        load_sheet(self.conn(), id)
    }

    /// Apply a partial update and return the resulting sheet.
    ///
    /// Attribute and skill entries are keyed by catalog name. Each one
    /// updates the character's existing join row or inserts a new one. A name
    /// missing from the catalog aborts the whole patch.
    pub fn update_character(&mut self, id: i64, patch: CharacterPatch) -> Result<CharacterSheet> {
        let tx = self.conn_mut().transaction()?;
        load_character(&tx, id)?;

        if let Patch::Set(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(StoreError::Validation("character name is required".into()));
            }
            tx.execute(
                "UPDATE characters SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
        }

        if let Patch::Set(description) = patch.description {
            tx.execute(
                "UPDATE characters SET description = ?1 WHERE id = ?2",
                params![description, id],
            )?;
        }

        if let Patch::Set(attributes) = patch.attributes {
            for (name, value) in attributes {
                check_range("attribute value", value)?;
                let Some(attribute_id) = lookup_id(&tx, "attributes", &name)? else {
                    return Err(StoreError::UnknownAttribute(name));
                };
                let updated = tx.execute(
                    "UPDATE character_attributes SET value = ?1
                     WHERE character_id = ?2 AND attribute_id = ?3",
                    params![value, id, attribute_id],
                )?;
                if updated == 0 {
                    tx.execute(
                        "INSERT INTO character_attributes (character_id, attribute_id, value)
                         VALUES (?1, ?2, ?3)",
                        params![id, attribute_id, value],
                    )?;
                }
            }
        }

        if let Patch::Set(skills) = patch.skills {
            for (name, bonus) in skills {
                check_range("skill bonus", bonus)?;
                let Some(skill_id) = lookup_id(&tx, "skills", &name)? else {
                    return Err(StoreError::UnknownSkill(name));
                };
                let updated = tx.execute(
                    "UPDATE character_skills SET bonus = ?1
                     WHERE character_id = ?2 AND skill_id = ?3",
                    params![bonus, id, skill_id],
                )?;
                if updated == 0 {
                    tx.execute(
                        "INSERT INTO character_skills (character_id, skill_id, bonus)
                         VALUES (?1, ?2, ?3)",
                        params![id, skill_id, bonus],
                    )?;
                }
            }
        }

        let sheet = load_sheet(&tx, id)?;
        tx.commit()?;

        tracing::info!(character_id = id, "character updated");
        Ok(sheet)
    }

    /// Delete a character with its join rows and campaign roles. Returns the
    /// deleted row.
    pub fn delete_character(&mut self, id: i64) -> Result<Character> {
        let tx = self.conn_mut().transaction()?;
        let character = load_character(&tx, id)?;

        tx.execute(
            "DELETE FROM character_skills WHERE character_id = ?1",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM character_attributes WHERE character_id = ?1",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM character_roles WHERE character_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM characters WHERE id = ?1", params![id])?;

        tx.commit()?;

        tracing::info!(character_id = id, "character deleted");
        Ok(character)
    }
}

fn load_character(conn: &Connection, id: i64) -> Result<Character> {
    conn.query_row(
        &format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = ?1"),
        params![id],
        row_to_character,
    )
    .map_err(not_found("character"))
}

fn load_sheet(conn: &Connection, id: i64) -> Result<CharacterSheet> {
    let character = load_character(conn, id)?;

    let mut stmt = conn.prepare(
        "SELECT ca.attribute_id, a.name, ca.value
         FROM character_attributes ca
         JOIN attributes a ON a.id = ca.attribute_id
         WHERE ca.character_id = ?1
         ORDER BY ca.id ASC",
    )?;
    let attributes = stmt
        .query_map(params![id], |row| {
            let value: i64 = row.get(2)?;
            Ok(SheetAttribute {
                attribute_id: row.get(0)?,
                name: row.get(1)?,
                value,
                die: Die::for_value(value).notation(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT cs.skill_id, s.name, cs.bonus
         FROM character_skills cs
         JOIN skills s ON s.id = cs.skill_id
         WHERE cs.character_id = ?1
         ORDER BY cs.id ASC",
    )?;
    let skills = stmt
        .query_map(params![id], |row| {
            Ok(SheetSkill {
                skill_id: row.get(0)?,
                name: row.get(1)?,
                bonus: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(CharacterSheet {
        character,
        attributes,
        skills,
    })
}

/// Attribute values and skill bonuses must fit in an `i32`.
fn check_range(what: &str, value: i64) -> Result<()> {
    if i32::try_from(value).is_err() {
        return Err(StoreError::Validation(format!(
            "{what} {value} is out of range"
        )));
    }
    Ok(())
}

/// Catalog id for a unique name in `attributes` or `skills`.
fn lookup_id(conn: &Connection, table: &'static str, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE name = ?1"),
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn row_to_character(row: &rusqlite::Row<'_>) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        user_id: row.get(3)?,
        campaign_id: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}
