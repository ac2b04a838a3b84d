//! SurrealDB repository implementations.

mod comment;
mod complaint;
mod response;
mod settings;
mod user;

pub use comment::SurrealCommentRepository;
pub use complaint::SurrealComplaintRepository;
pub use response::SurrealResponseRepository;
pub use settings::SurrealSettingsRepository;
pub use user::SurrealUserRepository;
