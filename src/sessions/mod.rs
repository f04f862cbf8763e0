mod service;
mod store;

pub use service::{QueryResult, SessionQuery, SessionService};
pub use store::SessionStore;
