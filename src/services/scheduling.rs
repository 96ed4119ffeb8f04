use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})\s*(AM|PM)").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());

/// Source of "now" for rejecting past appointments.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Opening hours as `[open, close)` in 24-hour clock hours.
#[derive(Debug, Clone, Copy)]
pub struct ClinicHours {
    pub open: u32,
    pub close: u32,
}

impl Default for ClinicHours {
    fn default() -> Self {
        Self { open: 7, close: 20 }
    }
}

impl ClinicHours {
    pub fn contains(&self, hour: u32) -> bool {
        self.open <= hour && hour < self.close
    }

    /// "7:00 AM – 8:00 PM"
    pub fn to_human_readable(&self) -> String {
        format!("{} – {}", fmt_hour(self.open), fmt_hour(self.close))
    }
}

fn fmt_hour(hour: u32) -> String {
    let period = if hour % 24 < 12 { "AM" } else { "PM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12}:00 {period}")
}

#[derive(Debug, PartialEq)]
pub enum SchedulingError {
    MissingTime,
    MissingDate,
    InvalidDate,
    InPast,
    OutsideClinicHours { hours: String },
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::MissingTime => {
                write!(f, "Please include a time in 12-hour format (e.g. 10:00 AM).")
            }
            SchedulingError::MissingDate => {
                write!(f, "Please include a date in MM/DD/YYYY format (e.g. 03/15/2026).")
            }
            SchedulingError::InvalidDate => {
                write!(f, "Invalid date. Please verify the day and month are correct.")
            }
            SchedulingError::InPast => {
                write!(
                    f,
                    "That date and time has already passed. Please choose a future appointment."
                )
            }
            SchedulingError::OutsideClinicHours { hours } => {
                write!(
                    f,
                    "Sorry, our clinic is closed at that time. We are open {hours} only."
                )
            }
        }
    }
}

/// Parse "MM/DD/YYYY H:MM AM|PM" out of free text and check it is a future
/// slot inside clinic hours.
pub fn validate_datetime(
    input: &str,
    now: NaiveDateTime,
    hours: ClinicHours,
) -> Result<NaiveDateTime, SchedulingError> {
    let upper = input.to_uppercase();
    let time = TIME_RE.captures(&upper).ok_or(SchedulingError::MissingTime)?;

    let mut hour: u32 = time[1].parse().map_err(|_| SchedulingError::InvalidDate)?;
    let minute: u32 = time[2].parse().map_err(|_| SchedulingError::InvalidDate)?;
    match &time[3] {
        "PM" if hour != 12 => hour += 12,
        "AM" if hour == 12 => hour = 0,
        _ => {}
    }

    let date = DATE_RE.captures(input).ok_or(SchedulingError::MissingDate)?;
    let month: u32 = date[1].parse().map_err(|_| SchedulingError::InvalidDate)?;
    let day: u32 = date[2].parse().map_err(|_| SchedulingError::InvalidDate)?;
    let year: i32 = date[3].parse().map_err(|_| SchedulingError::InvalidDate)?;

    let at = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or(SchedulingError::InvalidDate)?;

    if at <= now {
        return Err(SchedulingError::InPast);
    }

    if !hours.contains(hour) {
        return Err(SchedulingError::OutsideClinicHours {
            hours: hours.to_human_readable(),
        });
    }

    Ok(at)
}

/// True when the text carries something shaped like an MM/DD/YYYY date.
pub fn has_date_token(input: &str) -> bool {
    DATE_RE.is_match(input)
}
