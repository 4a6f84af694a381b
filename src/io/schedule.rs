//! Schedule sheet ingestion: flattens CSV rows into per-school activity lists.
//!
//! One row describes one activity occurrence. Columns are matched by header
//! name (case- and accent-insensitive, Catalan/Spanish/English aliases), so
//! exports with reordered or extra columns load unchanged.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::model::{ActivitySlot, SchoolActivities, Weekday};
use crate::plan::week::parse_date;

/// Schedule loading error with its location and a description.
#[derive(Debug)]
pub struct ScheduleError {
    /// File path, or `"line N"` for row-level problems.
    pub location: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schedule error: {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ScheduleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    School,
    Address,
    Weekday,
    Turn,
    Activity,
    CourseStart,
    StartTime,
    Students,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'à' | 'á' => 'a',
                'è' | 'é' => 'e',
                'í' | 'ï' => 'i',
                'ò' | 'ó' => 'o',
                'ú' | 'ü' => 'u',
                'ç' => 'c',
                ' ' | '-' => '_',
                other => other,
            })
            .collect();

        match key.as_str() {
            "school" | "escola" | "centre" | "centro" | "colegio" => Some(Column::School),
            "address" | "adreca" | "direccion" => Some(Column::Address),
            "weekday" | "day" | "dia" => Some(Column::Weekday),
            "turn" | "torn" | "turno" => Some(Column::Turn),
            "activity" | "activitat" | "actividad" | "code" | "codi" => Some(Column::Activity),
            "course_start" | "start_date" | "data_inici" | "fecha_inicio" => {
                Some(Column::CourseStart)
            }
            "start_time" | "time" | "hora" | "hora_inici" => Some(Column::StartTime),
            "students" | "alumnes" | "alumnos" => Some(Column::Students),
            _ => None,
        }
    }
}

const REQUIRED: &[(Column, &str)] = &[
    (Column::School, "school"),
    (Column::Weekday, "weekday"),
    (Column::Activity, "activity"),
];

/// Loads a schedule CSV file.
///
/// # Arguments
///
/// * `path` - CSV file with a header row
/// * `today` - Course start for schools whose rows carry no valid date
///
/// # Errors
///
/// Returns a `ScheduleError` if the file cannot be opened, a required column
/// is missing, or the CSV is structurally invalid. Individual bad rows are
/// skipped with a warning instead, and bytes that are not valid UTF-8 (such
/// as Latin-1 exports) are replaced rather than failing the load.
pub fn load_schedule(path: &Path, today: NaiveDate) -> Result<Vec<SchoolActivities>, ScheduleError> {
    let file = File::open(path).map_err(|e| ScheduleError {
        location: path.display().to_string(),
        message: format!("cannot open: {e}"),
    })?;
    read_schedule(file, today).map_err(|mut e| {
        e.location = format!("{}: {}", path.display(), e.location);
        e
    })
}

/// Reads schedule rows from any reader. See [`load_schedule`].
///
/// # Errors
///
/// Returns a `ScheduleError` on missing required columns or malformed CSV.
pub fn read_schedule(reader: impl Read, today: NaiveDate) -> Result<Vec<SchoolActivities>, ScheduleError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.byte_headers().map_err(|e| ScheduleError {
        location: "header".to_string(),
        message: e.to_string(),
    })?;
    let mut columns: HashMap<Column, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(col) = Column::from_header(&String::from_utf8_lossy(header)) {
            columns.entry(col).or_insert(idx);
        }
    }
    for (col, name) in REQUIRED {
        if !columns.contains_key(col) {
            return Err(ScheduleError {
                location: "header".to_string(),
                message: format!("missing required column \"{name}\""),
            });
        }
    }

    let mut schools: Vec<SchoolBuilder> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0_usize;

    for (row_idx, record) in rdr.byte_records().enumerate() {
        // Header is line 1.
        let line = row_idx + 2;
        let record = record.map_err(|e| ScheduleError {
            location: format!("line {line}"),
            message: e.to_string(),
        })?;
        let fields: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        if fields.iter().any(|f| matches!(f, Cow::Owned(_))) {
            warn!(line, "row contains invalid UTF-8, bad bytes replaced");
        }
        let field = |col: Column| {
            columns
                .get(&col)
                .and_then(|idx| fields.get(*idx))
                .map_or("", |f| f.as_ref())
        };

        let name = field(Column::School);
        if name.is_empty() {
            warn!(line, "row without school name skipped");
            skipped += 1;
            continue;
        }
        let weekday = match field(Column::Weekday).parse::<Weekday>() {
            Ok(day) => day,
            Err(e) => {
                warn!(line, school = name, "{e}, row skipped");
                skipped += 1;
                continue;
            }
        };

        let mut slot = ActivitySlot::new(
            weekday,
            field(Column::Turn),
            field(Column::Activity),
            parse_date(field(Column::CourseStart)),
        );
        slot.start_time = parse_time(field(Column::StartTime));
        slot.student_count = field(Column::Students).parse().ok();

        let pos = *index.entry(name.to_string()).or_insert_with(|| {
            schools.push(SchoolBuilder::new(name, field(Column::Address)));
            schools.len() - 1
        });
        schools[pos].push(slot, field(Column::Address));
    }

    info!(schools = schools.len(), skipped, "schedule loaded");
    Ok(schools.into_iter().map(|b| b.finish(today)).collect())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    ["%H:%M", "%H:%M:%S", "%H.%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

/// Accumulates one school's rows before its course start is known.
struct SchoolBuilder {
    name: String,
    address: String,
    course_start: Option<NaiveDate>,
    slots: Vec<ActivitySlot>,
}

impl SchoolBuilder {
    fn new(name: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            course_start: None,
            slots: Vec::new(),
        }
    }

    fn push(&mut self, slot: ActivitySlot, address: &str) {
        // First valid date wins; later rows never overwrite it.
        if self.course_start.is_none() {
            self.course_start = slot.course_start;
        }
        if self.address.is_empty() && !address.is_empty() {
            self.address = address.to_string();
        }
        self.slots.push(slot);
    }

    fn finish(self, today: NaiveDate) -> SchoolActivities {
        let mut school =
            SchoolActivities::new(self.name, self.address, self.course_start.unwrap_or(today));
        for slot in self.slots {
            school.push(slot);
        }
        school
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    const SHEET: &str = "\
Escola,Adreça,Dia,Torn,Activitat,Data inici,Hora,Alumnes
Escola Mar,Carrer del Mar 3,Dilluns,Matí,TC1,19/10/2026,09:30,22
Escola Mar,,Dimecres,Tarda,CO2,2026-10-19,15:00,
,Carrer Perdut 1,Dilluns,Matí,XX1,19/10/2026,,
Escola Turó,,Dissabte,Matí,RB1,19/10/2026,,
Escola Turó,,Dijous,Matí,RB2,,,abc
";

    #[test]
    fn groups_rows_by_school_in_source_order() {
        let schools = read_schedule(SHEET.as_bytes(), date(2026, 10, 21)).expect("sheet loads");
        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].name, "Escola Mar");
        assert_eq!(schools[0].address, "Carrer del Mar 3");
        assert_eq!(schools[0].slot_count(), 2);

        let monday = &schools[0].slots(Weekday::Monday)[0];
        assert_eq!(monday.activity_code, "TC1");
        assert_eq!(monday.course_start, Some(date(2026, 10, 19)));
        assert_eq!(monday.start_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(monday.student_count, Some(22));
    }

    #[test]
    fn school_without_valid_date_defaults_to_today() {
        let today = date(2026, 10, 21);
        let schools = read_schedule(SHEET.as_bytes(), today).expect("sheet loads");
        let turo = schools
            .iter()
            .find(|s| s.name == "Escola Turó")
            .expect("Escola Turó loaded");
        assert_eq!(turo.course_start, today);
        assert_eq!(turo.address, "Escola Turó, Barcelona");
        // Weekend row dropped, undated row kept with no course start.
        let slots = turo.slots(Weekday::Thursday);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].course_start, None);
        assert_eq!(slots[0].student_count, None);
    }

    #[test]
    fn first_valid_date_is_authoritative() {
        let sheet = "\
school,weekday,activity,course_start
A,Monday,X1,not a date
A,Tuesday,X2,2026-10-20
A,Wednesday,X3,2026-11-02
";
        let schools = read_schedule(sheet.as_bytes(), date(2026, 1, 1)).expect("sheet loads");
        assert_eq!(schools[0].course_start, date(2026, 10, 20));
    }

    #[test]
    fn latin1_bytes_do_not_drop_other_rows() {
        let sheet: &[u8] = b"school,address,weekday,activity,course_start\n\
A,Carrer 1,Monday,X1,2026-10-19\n\
B,Pla\xe7a 2,Tuesday,X2,2026-10-19\n\
C,Carrer 3,Friday,X3,2026-10-19\n";
        let schools = read_schedule(sheet, date(2026, 10, 21)).expect("sheet loads");
        let names: Vec<&str> = schools.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(schools[1].address, "Pla\u{FFFD}a 2");
        assert_eq!(schools[1].slots(Weekday::Tuesday)[0].activity_code, "X2");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let sheet = "school,turn\nA,Matí\n";
        let err = read_schedule(sheet.as_bytes(), date(2026, 1, 1));
        assert!(err.is_err_and(|e| e.message.contains("weekday")));
    }
}
