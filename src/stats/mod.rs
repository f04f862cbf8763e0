//! Pure analytics over session history: trailing-window filtering,
//! duration totals, ordering, and goal projection.

mod aggregate;
mod goal;
mod sort;
mod window;

pub use aggregate::{aggregate, Totals};
pub use goal::{project_goal, GoalProjection};
pub use sort::{sort_sessions, SortPolicy};
pub use window::{filter_window, TimeUnit, Window};
