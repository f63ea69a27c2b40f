//! Read access to the seeded attribute and skill catalog.

use std::collections::{BTreeMap, HashMap};

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::{Attribute, Catalog, Skill};

impl Database {
    pub fn list_attributes(&self) -> Result<Vec<Attribute>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, dice_type, value FROM attributes ORDER BY id ASC")?;
        let rows = stmt.query_map([], row_to_attribute)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, attribute_id, bonus FROM skills ORDER BY id ASC")?;
        let rows = stmt.query_map([], row_to_skill)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn find_attribute_by_name(&self, name: &str) -> Result<Option<Attribute>> {
        let attribute = self
            .conn()
            .query_row(
                "SELECT id, name, dice_type, value FROM attributes WHERE name = ?1",
                params![name],
                row_to_attribute,
            )
            .optional()?;
        Ok(attribute)
    }

    pub fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>> {
        let skill = self
            .conn()
            .query_row(
                "SELECT id, name, attribute_id, bonus FROM skills WHERE name = ?1",
                params![name],
                row_to_skill,
            )
            .optional()?;
        Ok(skill)
    }

    /// Every attribute, plus skills grouped under the name of the
    /// attribute they belong to.
    pub fn catalog(&self) -> Result<Catalog> {
        let attributes = self.list_attributes()?;
        let names: HashMap<i64, &str> = attributes
            .iter()
            .map(|a| (a.id, a.name.as_str()))
            .collect();

        let mut grouped_skills: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
        for skill in self.list_skills()? {
            // Orphans cannot exist while foreign keys are on.
            let Some(attribute) = names.get(&skill.attribute_id) else {
                continue;
            };
            grouped_skills
                .entry((*attribute).to_string())
                .or_default()
                .push(skill);
        }

        Ok(Catalog {
            attributes,
            grouped_skills,
        })
    }
}

fn row_to_attribute(row: &rusqlite::Row<'_>) -> rusqlite::Result<Attribute> {
    Ok(Attribute {
        id: row.get(0)?,
        name: row.get(1)?,
        dice_type: row.get(2)?,
        value: row.get(3)?,
    })
}

fn row_to_skill(row: &rusqlite::Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        attribute_id: row.get(2)?,
        bonus: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::database::test_support::temp_db;
    use crate::migrations::v002_seed_catalog::{ATTRIBUTES, SKILLS};

    #[test]
    fn seeded_catalog_is_complete() {
        let (_dir, db) = temp_db();

        let attributes = db.list_attributes().unwrap();
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ATTRIBUTES);
        assert!(attributes
            .iter()
            .all(|a| a.value == 1 && a.dice_type == "1d4"));

        assert_eq!(db.list_skills().unwrap().len(), SKILLS.len());
    }

    #[test]
    fn lookup_by_name() {
        let (_dir, db) = temp_db();

        let fiz = db.find_attribute_by_name("Физ форма").unwrap().unwrap();
        let athletics = db.find_skill_by_name("Атлетика").unwrap().unwrap();
        assert_eq!(athletics.attribute_id, fiz.id);
        assert_eq!(athletics.bonus, 0);

        assert!(db.find_attribute_by_name("Удача").unwrap().is_none());
        assert!(db.find_skill_by_name("Алхимия").unwrap().is_none());
    }

    #[test]
    fn skills_are_grouped_by_attribute_name() {
        let (_dir, db) = temp_db();
        let catalog = db.catalog().unwrap();

        assert_eq!(catalog.attributes.len(), 9);
        assert_eq!(catalog.grouped_skills.len(), 9);
        let charisma: Vec<&str> = catalog.grouped_skills["Харизма"]
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(charisma, ["Убеждение", "Имитация", "Лидерство", "Обман", "Торг"]);
    }
}
