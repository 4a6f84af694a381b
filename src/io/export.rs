//! CSV export for delivery plans.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::DeliveryPlan;

/// Column header for plan CSV export.
const HEADER: &str = "delivery_date,weekday,school,address,activities,\
                       weekdays,students,consolidated,rationale";

/// Exports delivery plans to a CSV file at the given path.
///
/// Writes a header row followed by one row per plan, in plan order.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(plans: &[DeliveryPlan], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(plans, buf)
}

/// Writes delivery plans as CSV to any writer.
///
/// Activities are joined as `CODE@Weekday` separated by `;`, and source
/// weekdays by `;`.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(plans: &[DeliveryPlan], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for p in plans {
        let activities: Vec<String> = p
            .activities
            .iter()
            .map(|a| format!("{}@{}", a.activity_code, a.weekday))
            .collect();
        let weekdays: Vec<&str> = p.source_weekdays().iter().map(|d| d.as_str()).collect();

        wtr.write_record(&[
            p.delivery_date.to_string(),
            p.delivery_weekday.to_string(),
            p.school.name.clone(),
            p.school.address.clone(),
            activities.join(";"),
            weekdays.join(";"),
            p.total_students().to_string(),
            p.consolidated.to_string(),
            p.rationale.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{ActivitySlot, DeliveryMode, SchoolActivities, Weekday};
    use crate::plan::{TargetWeek, build_delivery_plans};

    fn plans() -> Vec<DeliveryPlan> {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        let schools = vec![
            SchoolActivities::new("Escola Mar", "Carrer del Mar 3, Barcelona", monday)
                .with_slot(
                    ActivitySlot::new(Weekday::Monday, "Matí", "TC1", Some(monday)).with_students(20),
                )
                .with_slot(
                    ActivitySlot::new(Weekday::Wednesday, "Tarda", "CO2", Some(monday))
                        .with_students(18),
                ),
            SchoolActivities::new("Escola Turó", "", monday)
                .with_slot(ActivitySlot::new(Weekday::Tuesday, "Matí", "RB1", Some(monday))),
        ];
        build_delivery_plans(&schools, TargetWeek::containing(monday), DeliveryMode::AdHoc, &[])
    }

    #[test]
    fn header_matches_schema() {
        let mut buf = Vec::new();
        write_csv(&plans(), &mut buf).expect("write csv");
        let output = String::from_utf8(buf).expect("utf-8 output");
        let first_line = output.lines().next().expect("header line");
        assert_eq!(
            first_line,
            "delivery_date,weekday,school,address,activities,weekdays,students,consolidated,rationale"
        );
    }

    #[test]
    fn one_row_per_plan_and_parseable() {
        let mut buf = Vec::new();
        write_csv(&plans(), &mut buf).expect("write csv");

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr
            .records()
            .collect::<Result<_, _>>()
            .expect("parseable rows");
        assert_eq!(rows.len(), 2);

        // Quoted address with a comma survives.
        assert_eq!(&rows[0][3], "Carrer del Mar 3, Barcelona");
        assert_eq!(&rows[0][4], "TC1@Monday;CO2@Wednesday");
        assert_eq!(&rows[0][5], "Monday;Wednesday");
        assert_eq!(&rows[0][6], "38");
        assert_eq!(&rows[0][7], "true");
        assert_eq!(&rows[1][1], "Tuesday");
        assert_eq!(&rows[1][7], "false");
    }

    #[test]
    fn deterministic_output() {
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&plans(), &mut buf1).expect("write csv");
        write_csv(&plans(), &mut buf2).expect("write csv");
        assert_eq!(buf1, buf2);
    }
}
