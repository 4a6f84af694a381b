/// Weekly consolidation of school activities into deliveries.
pub mod builder;
/// Weekday grouping and route ordering over built plans.
pub mod summary;
pub mod week;

pub use builder::build_delivery_plans;
pub use summary::WeekSummary;
pub use week::TargetWeek;
