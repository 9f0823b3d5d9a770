/// Persistence
///
/// All SQL lives here. Handlers pass in identities that have already been
/// authenticated; nothing in this module checks credentials.

pub mod chirps;
pub mod refresh_tokens;
pub mod users;

pub use chirps::ChirpRecord;
pub use refresh_tokens::RefreshTokenRecord;
pub use users::UserRecord;
