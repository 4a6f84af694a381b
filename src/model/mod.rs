/// Domain records shared by ingestion, planning and export.
pub mod types;
/// School weekdays and localized name parsing.
pub mod weekday;

pub use types::{
    ActivitySlot, DeliveryMode, DeliveryPlan, Holiday, PlannedActivity, SchoolActivities,
};
pub use weekday::Weekday;
