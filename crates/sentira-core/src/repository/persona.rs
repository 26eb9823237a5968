use sentira_types::error::RepositoryError;
use sentira_types::persona::Persona;
use uuid::Uuid;

/// Outcome of an insert-if-absent: either this call created the persona,
/// or someone else already had.
#[derive(Debug, Clone)]
pub enum PersonaUpsert {
    Created(Persona),
    Existing(Persona),
}

impl PersonaUpsert {
    pub fn into_persona(self) -> Persona {
        match self {
            PersonaUpsert::Created(p) | PersonaUpsert::Existing(p) => p,
        }
    }
}

/// Persona persistence. Names are unique per user; creation must be
/// atomic under concurrent pipeline runs.
pub trait PersonaRepository: Send + Sync {
    /// Insert the persona unless one with the same (user, name) already
    /// exists, returning whichever row ends up stored.
    fn create_if_absent(
        &self,
        persona: &Persona,
    ) -> impl std::future::Future<Output = Result<PersonaUpsert, RepositoryError>> + Send;

    fn get_persona(
        &self,
        persona_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Persona>, RepositoryError>> + Send;

    fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Persona>, RepositoryError>> + Send;

    fn list_personas(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Persona>, RepositoryError>> + Send;

    /// Bump the interaction counter for the persona that spoke a reply.
    fn increment_interaction_count(
        &self,
        persona_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
