//! Persona persistence. Creation is an atomic insert-if-absent keyed on
//! (user_id, name) so concurrent pipeline runs cannot create duplicates.

use chrono::{DateTime, Utc};
use sentira_core::repository::{PersonaRepository, PersonaUpsert};
use sentira_types::error::RepositoryError;
use sentira_types::persona::Persona;
use sqlx::FromRow;
use uuid::Uuid;

use super::{encode_json, map_sqlx, SqliteStore};

#[derive(FromRow)]
struct PersonaRow {
    persona_id: String,
    user_id: String,
    name: String,
    description: String,
    personality_traits: String,
    communication_style: String,
    emotional_tendencies: String,
    interaction_count: i64,
    avatar_type: String,
    created_at: String,
    updated_at: String,
}

impl PersonaRow {
    fn into_persona(self) -> Option<Persona> {
        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        };
        let persona = Persona {
            id: Uuid::parse_str(&self.persona_id).ok()?,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            personality_traits: serde_json::from_str(&self.personality_traits).ok()?,
            communication_style: self.communication_style,
            emotional_tendencies: serde_json::from_str(&self.emotional_tendencies).ok()?,
            avatar_type: self.avatar_type,
            interaction_count: self.interaction_count,
            created_at: parse(&self.created_at)?,
            updated_at: parse(&self.updated_at)?,
        };
        Some(persona)
    }
}

fn row_to_persona(row: PersonaRow) -> Option<Persona> {
    let id = row.persona_id.clone();
    let persona = row.into_persona();
    if persona.is_none() {
        tracing::warn!(persona_id = %id, "skipping malformed personas row");
    }
    persona
}

impl PersonaRepository for SqliteStore {
    async fn create_if_absent(
        &self,
        persona: &Persona,
    ) -> Result<PersonaUpsert, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO personas
                 (persona_id, user_id, name, description, personality_traits,
                  communication_style, emotional_tendencies, interaction_count,
                  avatar_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, name) DO NOTHING",
        )
        .bind(persona.id.to_string())
        .bind(&persona.user_id)
        .bind(&persona.name)
        .bind(&persona.description)
        .bind(encode_json(&persona.personality_traits)?)
        .bind(&persona.communication_style)
        .bind(encode_json(&persona.emotional_tendencies)?)
        .bind(persona.interaction_count)
        .bind(&persona.avatar_type)
        .bind(persona.created_at.to_rfc3339())
        .bind(persona.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 1 {
            return Ok(PersonaUpsert::Created(persona.clone()));
        }
        let existing = self
            .find_by_name(&persona.user_id, &persona.name)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(PersonaUpsert::Existing(existing))
    }

    async fn get_persona(&self, persona_id: Uuid) -> Result<Option<Persona>, RepositoryError> {
        let row: Option<PersonaRow> =
            sqlx::query_as("SELECT * FROM personas WHERE persona_id = ?")
                .bind(persona_id.to_string())
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        Ok(row.and_then(row_to_persona))
    }

    async fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Persona>, RepositoryError> {
        let row: Option<PersonaRow> =
            sqlx::query_as("SELECT * FROM personas WHERE user_id = ? AND name = ?")
                .bind(user_id)
                .bind(name)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        Ok(row.and_then(row_to_persona))
    }

    async fn list_personas(&self, user_id: &str) -> Result<Vec<Persona>, RepositoryError> {
        let rows: Vec<PersonaRow> =
            sqlx::query_as("SELECT * FROM personas WHERE user_id = ? ORDER BY created_at")
                .bind(user_id)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        Ok(rows.into_iter().filter_map(row_to_persona).collect())
    }

    async fn increment_interaction_count(
        &self,
        persona_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE personas
             SET interaction_count = interaction_count + 1, updated_at = ?
             WHERE persona_id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(persona_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::store;
    use super::*;
    use sentira_core::repository::UserRepository;

    #[tokio::test]
    async fn test_create_if_absent_then_existing() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let persona = Persona::default_companion("u1");
        let first = store.create_if_absent(&persona).await.unwrap();
        assert!(matches!(first, PersonaUpsert::Created(_)));

        let duplicate = Persona::default_companion("u1");
        let second = store.create_if_absent(&duplicate).await.unwrap();
        match second {
            PersonaUpsert::Existing(p) => assert_eq!(p.id, persona.id),
            PersonaUpsert::Created(_) => panic!("duplicate name must not create"),
        }

        assert_eq!(store.list_personas("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_different_users() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();
        store.ensure_profile("u2").await.unwrap();

        let created = store
            .create_if_absent(&Persona::default_companion("u1"))
            .await
            .unwrap();
        assert!(matches!(created, PersonaUpsert::Created(_)));
        let created = store
            .create_if_absent(&Persona::default_companion("u2"))
            .await
            .unwrap();
        assert!(matches!(created, PersonaUpsert::Created(_)));
    }

    #[tokio::test]
    async fn test_increment_interaction_count() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let persona = Persona::default_companion("u1");
        store.create_if_absent(&persona).await.unwrap();
        store.increment_interaction_count(persona.id).await.unwrap();
        store.increment_interaction_count(persona.id).await.unwrap();

        let stored = store.get_persona(persona.id).await.unwrap().unwrap();
        assert_eq!(stored.interaction_count, 2);
    }

    #[tokio::test]
    async fn test_increment_missing_persona() {
        let (_dir, store) = store().await;
        let err = store
            .increment_interaction_count(Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
