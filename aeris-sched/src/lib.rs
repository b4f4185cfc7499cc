pub mod grid;
pub mod overlap;
pub mod resolver;

pub use grid::base_grid;
pub use overlap::{intersect, NoCommonAvailability};
pub use resolver::{AvailabilityResolver, ScheduleError, TURNAROUND_MINUTES};
