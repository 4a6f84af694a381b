//! School weekdays and localized day-name parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A school day. Weekends never carry activities or deliveries.
///
/// Ordering follows the calendar: `Monday < Tuesday < … < Friday`, which is
/// also the scan order used when choosing a delivery date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All school days in scan order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Days elapsed since the Monday of the same week.
    pub fn days_from_monday(self) -> u64 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
        }
    }

    /// English display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a day name is not a recognized school day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWeekday(pub String);

impl fmt::Display for UnknownWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weekday \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownWeekday {}

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    /// Accepts Catalan, Spanish and English names, full or abbreviated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'à' | 'á' => 'a',
                'è' | 'é' => 'e',
                'í' | 'ï' => 'i',
                'ò' | 'ó' => 'o',
                'ú' | 'ü' => 'u',
                other => other,
            })
            .collect();

        match folded.as_str() {
            "dilluns" | "lunes" | "monday" | "mon" | "dl" | "l" => Ok(Weekday::Monday),
            "dimarts" | "martes" | "tuesday" | "tue" | "dt" | "m" => Ok(Weekday::Tuesday),
            "dimecres" | "miercoles" | "wednesday" | "wed" | "dc" | "x" => Ok(Weekday::Wednesday),
            "dijous" | "jueves" | "thursday" | "thu" | "dj" | "j" => Ok(Weekday::Thursday),
            "divendres" | "viernes" | "friday" | "fri" | "dv" | "v" => Ok(Weekday::Friday),
            _ => Err(UnknownWeekday(s.trim().to_string())),
        }
    }
}
