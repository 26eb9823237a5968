//! Storage ports. Implementations live in the infra crate; the pipeline
//! and report engine are generic over these traits.

mod interaction;
mod memory;
mod persona;
mod user;

pub use interaction::InteractionRepository;
pub use memory::MemoryRepository;
pub use persona::{PersonaRepository, PersonaUpsert};
pub use user::UserRepository;
