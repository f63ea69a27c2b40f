use rusqlite::params;
use tabletop_shared::types::Role;

use crate::database::{row_exists, Database};
use crate::error::{Result, StoreError};
use crate::models::{CharacterRole, NewCharacterRole};

impl Database {
    /// Record a character's role in a campaign.
    pub fn create_role(&self, new: NewCharacterRole) -> Result<CharacterRole> {
        for (table, entity, id) in [
            ("campaigns", "campaign", new.campaign_id),
            ("characters", "character", new.character_id),
            ("users", "user", new.user_id),
        ] {
            if !row_exists(self.conn(), table, id)? {
                return Err(StoreError::NotFound(entity));
            }
        }

        self.conn().execute(
            "INSERT INTO character_roles (character_id, user_id, campaign_id, role)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                new.character_id,
                new.user_id,
                new.campaign_id,
                new.role.as_str()
            ],
        )?;
        let id = self.conn().last_insert_rowid();

        tracing::info!(
            role_id = id,
            character_id = new.character_id,
            campaign_id = new.campaign_id,
            role = %new.role,
            "role assigned"
        );

        Ok(CharacterRole {
            id,
            character_id: new.character_id,
            user_id: new.user_id,
            campaign_id: new.campaign_id,
            role: new.role,
        })
    }

    pub fn list_roles_for_campaign(&self, campaign_id: i64) -> Result<Vec<CharacterRole>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, character_id, user_id, campaign_id, role
             FROM character_roles WHERE campaign_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![campaign_id], row_to_role)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }
}

fn row_to_role(row: &rusqlite::Row<'_>) -> rusqlite::Result<CharacterRole> {
    let raw: String = row.get(4)?;
    let role = Role::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown role {raw:?}").into(),
        )
    })?;

    Ok(CharacterRole {
        id: row.get(0)?,
        character_id: row.get(1)?,
        user_id: row.get(2)?,
        campaign_id: row.get(3)?,
        role,
    })
}

#[cfg(test)]
mod tests {
    use tabletop_shared::types::Role;

    use crate::database::test_support::temp_db;
    use crate::error::StoreError;
    use crate::models::{NewCharacter, NewCharacterRole};

    #[test]
    fn create_and_list() {
        let (_dir, mut db) = temp_db();
        let gm = db.create_user("anna", "anna@example.com", "h").unwrap();
        let player = db.create_user("bob", "bob@example.com", "h").unwrap();
        let keep = db.create_campaign("Keep", "ruins", gm.id).unwrap();
        let other = db.create_campaign("Other", "elsewhere", gm.id).unwrap();
        let character = db
            .create_character(
                player.id,
                NewCharacter {
                    name: "Kaelith".into(),
                    campaign_id: Some(keep.id),
                    ..Default::default()
                },
            )
            .unwrap();

        let role = db
            .create_role(NewCharacterRole {
                character_id: character.id,
                user_id: player.id,
                campaign_id: keep.id,
                role: Role::Player,
            })
            .unwrap();
        assert_eq!(role.role, Role::Player);

        assert_eq!(db.list_roles_for_campaign(keep.id).unwrap(), vec![role]);
        assert!(db.list_roles_for_campaign(other.id).unwrap().is_empty());
    }

    #[test]
    fn unknown_character_is_rejected() {
        let (_dir, db) = temp_db();
        let gm = db.create_user("anna", "anna@example.com", "h").unwrap();
        let keep = db.create_campaign("Keep", "ruins", gm.id).unwrap();

        let err = db
            .create_role(NewCharacterRole {
                character_id: 404,
                user_id: gm.id,
                campaign_id: keep.id,
                role: Role::Gm,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("character")), "{err:?}");
    }

    #[test]
    fn unknown_user_is_rejected() {
        let (_dir, mut db) = temp_db();
        let gm = db.create_user("anna", "anna@example.com", "h").unwrap();
        let keep = db.create_campaign("Keep", "ruins", gm.id).unwrap();
        let character = db
            .create_character(
                gm.id,
                NewCharacter {
                    name: "Kaelith".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = db
            .create_role(NewCharacterRole {
                character_id: character.id,
                user_id: 404,
                campaign_id: keep.id,
                role: Role::Player,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("user")), "{err:?}");
        assert!(db.list_roles_for_campaign(keep.id).unwrap().is_empty());
    }
}
