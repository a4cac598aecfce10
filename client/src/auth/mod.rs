pub mod guards;
pub mod session;

pub use guards::{Navigation, Route, RouteAccess, can_access, enter, resolve, resolve_path};
pub use session::{SessionContext, SessionStore, SessionStoreError, StoredSession};
