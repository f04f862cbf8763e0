pub mod session;

pub use session::{truncate_to_seconds, CodingSession};
