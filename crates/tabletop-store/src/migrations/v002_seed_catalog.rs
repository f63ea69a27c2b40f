//! v002 -- Seed the attribute and skill catalog.
//!
//! Every attribute starts at base value 1 (a d4); every skill carries a
//! default bonus of 0. Rows are keyed by their unique name, so re-running
//! the seed is harmless.

use rusqlite::{params, Connection};
use tabletop_shared::dice::Die;

const BASE_VALUE: i64 = 1;

/// Attribute names in display order.
pub const ATTRIBUTES: [&str; 9] = [
    "Физ форма",
    "Сноровка",
    "Восприятие",
    "Мудрость",
    "Интеллект",
    "Интуиция",
    "Харизма",
    "Сила воли",
    "Эмпатия",
];

/// `(skill, governing attribute)` pairs.
pub const SKILLS: [(&str, &str); 45] = [
    ("Атлетика", "Физ форма"),
    ("Ратное дело", "Физ форма"),
    ("Блокирование", "Физ форма"),
    ("Рукопашный бой", "Физ форма"),
    ("Выживание*", "Физ форма"),
    ("Проворство", "Сноровка"),
    ("Фехтование", "Сноровка"),
    ("Скрытность", "Сноровка"),
    ("Боевое искусство", "Сноровка"),
    ("Уклонение", "Сноровка"),
    ("Внимательность", "Восприятие"),
    ("Стрелковое оружие", "Восприятие"),
    ("Огнестрельное оружие", "Восприятие"),
    ("Метание", "Восприятие"),
    ("Реакция", "Восприятие"),
    ("Эрудиция", "Мудрость"),
    ("Тактика", "Мудрость"),
    ("Языки*", "Мудрость"),
    ("Авторитет", "Мудрость"),
    ("Ритуализм", "Мудрость"),
    ("Знания", "Интеллект"),
    ("Анализ", "Интеллект"),
    ("Матрица", "Интеллект"),
    ("Пиротехника", "Интеллект"),
    ("Артефакторика", "Интеллект"),
    ("Понимание", "Интуиция"),
    ("Смекалка", "Интуиция"),
    ("Чутьё", "Интуиция"),
    ("Концептуализация", "Интуиция"),
    ("Прорицание", "Интуиция"),
    ("Убеждение", "Харизма"),
    ("Имитация", "Харизма"),
    ("Лидерство", "Харизма"),
    ("Обман", "Харизма"),
    ("Торг", "Харизма"),
    ("Давление", "Сила воли"),
    ("Хладнокровие", "Сила воли"),
    ("Решительность", "Сила воли"),
    ("Превозмогание", "Сила воли"),
    ("Концентрация", "Сила воли"),
    ("Влияние", "Эмпатия"),
    ("Оценка поведения", "Эмпатия"),
    ("Выступление", "Эмпатия"),
    ("Проницательность", "Эмпатия"),
    ("Самоанализ", "Эмпатия"),
];

/// Apply the seed migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    let dice_type = Die::for_value(BASE_VALUE).notation();

    let mut insert_attr = conn.prepare(
        "INSERT OR IGNORE INTO attributes (name, dice_type, value) VALUES (?1, ?2, ?3)",
    )?;
    for name in ATTRIBUTES {
        insert_attr.execute(params![name, dice_type, BASE_VALUE])?;
    }

    let mut insert_skill = conn.prepare(
        "INSERT OR IGNORE INTO skills (name, attribute_id, bonus)
         SELECT ?1, id, 0 FROM attributes WHERE name = ?2",
    )?;
    for (skill, attribute) in SKILLS {
        insert_skill.execute(params![skill, attribute])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_skill_names_a_seeded_attribute() {
        for (skill, attribute) in SKILLS {
            assert!(ATTRIBUTES.contains(&attribute), "{skill} -> {attribute}");
        }
    }

    #[test]
    fn five_skills_per_attribute() {
        for attribute in ATTRIBUTES {
            let count = SKILLS.iter().filter(|(_, a)| *a == attribute).count();
            assert_eq!(count, 5, "{attribute}");
        }
    }
}
