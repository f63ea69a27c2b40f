use std::collections::HashMap;

use chrono::Utc;
use rusqlite::params;

use crate::database::{timestamp_at, Database};
use crate::error::{not_found, Result, StoreError};
use crate::models::{Campaign, CampaignOverview, CharacterSummary};

impl Database {
    /// Create a campaign owned by `gm_id`. A blank description is rejected.
    pub fn create_campaign(&self, name: &str, description: &str, gm_id: i64) -> Result<Campaign> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("campaign name is required".into()));
        }
        if description.trim().is_empty() {
            return Err(StoreError::Validation(
                "campaign description is required".into(),
            ));
        }

        let created_at = Utc::now();
        self.conn().execute(
            "INSERT INTO campaigns (name, description, gm_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, description, gm_id, created_at.to_rfc3339()],
        )?;
        let id = self.conn().last_insert_rowid();

        tracing::info!(campaign_id = id, gm_id, "campaign created");
        Ok(Campaign {
            id,
            name: name.to_string(),
            description: description.to_string(),
            gm_id,
            created_at,
        })
    }

    /// The bare campaign row, used for ownership checks.
    pub fn get_campaign_row(&self, id: i64) -> Result<Campaign> {
        self.conn()
            .query_row(
                "SELECT id, name, description, gm_id, created_at FROM campaigns WHERE id = ?1",
                params![id],
                row_to_campaign,
            )
            .map_err(not_found("campaign"))
    }

    /// A campaign with the id and name of each character in it.
    pub fn get_campaign(&self, id: i64) -> Result<CampaignOverview> {
        let campaign = self.get_campaign_row(id)?;

        let mut stmt = self
            .conn()
            .prepare("SELECT id, name FROM characters WHERE campaign_id = ?1 ORDER BY id ASC")?;
        let characters = stmt
            .query_map(params![id], row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(CampaignOverview {
            campaign,
            characters,
        })
    }

    pub fn list_campaigns(&self) -> Result<Vec<CampaignOverview>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, description, gm_id, created_at FROM campaigns ORDER BY id ASC",
        )?;
        let campaigns = stmt
            .query_map([], row_to_campaign)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut by_campaign: HashMap<i64, Vec<CharacterSummary>> = HashMap::new();
        let mut stmt = self.conn().prepare(
            "SELECT campaign_id, id, name FROM characters
             WHERE campaign_id IS NOT NULL ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                CharacterSummary {
                    id: row.get(1)?,
                    name: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (campaign_id, summary) = row?;
            by_campaign.entry(campaign_id).or_default().push(summary);
        }

        Ok(campaigns
            .into_iter()
            .map(|campaign| CampaignOverview {
                characters: by_campaign.remove(&campaign.id).unwrap_or_default(),
                campaign,
            })
            .collect())
    }
}

fn row_to_campaign(row: &rusqlite::Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        gm_id: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<CharacterSummary> {
    Ok(CharacterSummary {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
