//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use crate::core::navigator::Navigator;
use crate::core::store::ContentStore;

/// Three thinkers. Kant's glossary is listed К before А on purpose; Hegel has
/// eight letters (one of them empty); Nietzsche has a short bio and a letter
/// outside the alphabet.
pub const STORE_JSON: &str = r#"{
  "kant": {
    "display_name": "Иммануил Кант",
    "bio": "Иммануил Кант родился в 1724 году в Кёнигсберге.\nОн преподавал в университете более сорока лет. Его главный труд называется «Критика чистого разума». Кант никогда не покидал родной город надолго.\nОн умер в 1804 году.",
    "glossary": {
      "К": [
        { "term": "Категорический императив", "definition": "Безусловный моральный закон." }
      ],
      "А": [
        { "term": "Априори", "definition": "Знание, не зависящее от опыта." },
        { "term": "Антиномия", "definition": "Противоречие между двумя одинаково обоснованными суждениями." }
      ]
    }
  },
  "hegel": {
    "display_name": "Георг Гегель",
    "bio": "Георг Вильгельм Фридрих Гегель, немецкий философ.",
    "glossary": {
      "Я": [],
      "С": [{ "term": "Снятие", "definition": "Отрицание с сохранением." }],
      "Д": [{ "term": "Диалектика", "definition": "Учение о развитии через противоречия." }],
      "А": [{ "term": "Абсолют", "definition": "Безусловное начало." }],
      "Н": [{ "term": "Негация", "definition": "Отрицание." }],
      "Б": [{ "term": "Бытие", "definition": "Начало логики." }],
      "О": [{ "term": "Опосредование", "definition": "Связь через другое." }],
      "В": [{ "term": "Всеобщее", "definition": "Понятие в его единстве." }]
    }
  },
  "nietzsche": {
    "display_name": "Фридрих Ницше",
    "bio": "Немецкий мыслитель.",
    "glossary": {
      "Z": [{ "term": "Zarathustra", "definition": "Пророк сверхчеловека." }],
      "В": [{ "term": "Воля к власти", "definition": "Основное стремление жизни." }]
    }
  }
}"#;

/// Parses [`STORE_JSON`].
pub fn test_store() -> ContentStore {
    ContentStore::from_json(STORE_JSON).expect("fixture store parses")
}

/// A navigator over the fixture store with the given page budget.
pub fn test_navigator(budget: usize) -> Navigator {
    Navigator::new(Arc::new(test_store()), budget)
}
