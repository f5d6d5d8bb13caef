mod provider;
mod schema;
mod tutor;

// Public API of the generation subsystem.
pub use provider::{
    GeminiConfig, GeminiProvider, GenerationProvider, GenerationRequest, InMemoryProvider,
};
pub use schema::{ResponseSchema, SchemaKind};
pub use tutor::{DEFAULT_MODEL, TutorService};
