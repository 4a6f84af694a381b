/// CSV export of delivery plans.
pub mod export;
/// Schedule sheet ingestion.
pub mod schedule;
