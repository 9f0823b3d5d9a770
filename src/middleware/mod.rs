/// Middleware module
///
/// Route-level JWT guard and the file-server hit counter.

mod hit_counter;
mod jwt_middleware;

pub use hit_counter::HitCounter;
pub use jwt_middleware::AuthenticatedUser;
pub use jwt_middleware::JwtMiddleware;
