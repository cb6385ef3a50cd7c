use std::fmt::{ Display, Formatter };

use chrono::{ DateTime, Datelike, NaiveDate, NaiveDateTime, Utc };

pub const INVALID_DATE: &str = "Invalid Date";

// Largest magnitude a JS-style epoch timestamp may have (100,000,000 days).
// chrono stops a little earlier, around 8.2e15, and values past its range are
// reported as invalid.
const MAX_EPOCH_MS: f64 = 8.64e15;

const MS_PER_SECOND: f64 = 1000.0;
const MS_PER_MINUTE: f64 = MS_PER_SECOND * 60.0;
const MS_PER_HOUR: f64 = MS_PER_MINUTE * 60.0;
const MS_PER_DAY: f64 = MS_PER_HOUR * 24.0;
const MS_PER_WEEK: f64 = MS_PER_DAY * 7.0;
// Fixed approximations, not calendar months/years.
const MS_PER_MONTH: f64 = MS_PER_DAY * 30.0;
const MS_PER_YEAR: f64 = MS_PER_DAY * 365.0;

/// Anything the formatters accept as a point in time.
#[derive(Clone, Debug, PartialEq)]
pub enum Timestamp {
    DateTime(DateTime<Utc>),
    Iso(String),
    /// Milliseconds since the Unix epoch. Valid up to chrono's range
    /// (years -262143..=262142), which is narrower than the JS `Date` range.
    Epoch(f64),
}

impl Timestamp {
    /// `None` when the value does not denote a valid date.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::Iso(s) => parse_iso(s),
            Self::Epoch(ms) => {
                if !ms.is_finite() || ms.abs() > MAX_EPOCH_MS {
                    return None;
                }
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self::Iso(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self::Iso(s)
    }
}

impl From<f64> for Timestamp {
    fn from(ms: f64) -> Self {
        Self::Epoch(ms)
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self::Epoch(ms as f64)
    }
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-less forms are taken as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    // Reduced forms: "2025-04" is April 1st, "2025" is January 1st.
    let full = match s.len() {
        4 => format!("{}-01-01", s),
        7 if s.as_bytes()[4] == b'-' => format!("{}-01", s),
        _ => s.to_string(),
    };
    NaiveDate::parse_from_str(&full, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericStyle {
    Numeric,
    TwoDigit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Long,
    Short,
    Narrow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthStyle {
    Numeric,
    TwoDigit,
    Long,
    Short,
    Narrow,
}

/// Which date fields to print and how. Fields left `None` are omitted; if all
/// are `None` the output is the numeric `M/D/YYYY` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateFormatOptions {
    pub weekday: Option<TextStyle>,
    pub year: Option<NumericStyle>,
    pub month: Option<MonthStyle>,
    pub day: Option<NumericStyle>,
}

impl Default for DateFormatOptions {
    /// "April 14, 2025"
    fn default() -> Self {
        Self {
            weekday: None,
            year: Some(NumericStyle::Numeric),
            month: Some(MonthStyle::Long),
            day: Some(NumericStyle::Numeric),
        }
    }
}

impl DateFormatOptions {
    /// "4/14/2025"
    pub fn numeric() -> Self {
        Self {
            weekday: None,
            year: Some(NumericStyle::Numeric),
            month: Some(MonthStyle::Numeric),
            day: Some(NumericStyle::Numeric),
        }
    }

    pub fn with_weekday(mut self, style: TextStyle) -> Self {
        self.weekday = Some(style);
        self
    }
}

/// Formats a timestamp in en-US, e.g. "April 14, 2025".
///
/// Returns [`INVALID_DATE`] if the input does not parse to a valid date.
pub fn format_date(date: impl Into<Timestamp>, options: &DateFormatOptions) -> String {
    match date.into().to_datetime() {
        Some(dt) => render_date(&dt, options),
        None => INVALID_DATE.to_string(),
    }
}

fn render_date(dt: &DateTime<Utc>, options: &DateFormatOptions) -> String {
    let options = if
        options.weekday.is_none() &&
        options.year.is_none() &&
        options.month.is_none() &&
        options.day.is_none()
    {
        DateFormatOptions::numeric()
    } else {
        *options
    };

    let year = options.year.map(|style| match style {
        NumericStyle::Numeric => dt.year().to_string(),
        NumericStyle::TwoDigit => format!("{:02}", dt.year().rem_euclid(100)),
    });
    let day = options.day.map(|style| match style {
        NumericStyle::Numeric => dt.day().to_string(),
        NumericStyle::TwoDigit => format!("{:02}", dt.day()),
    });
    let weekday = options.weekday.map(|style| {
        let long = dt.format("%A").to_string();
        match style {
            TextStyle::Long => long,
            TextStyle::Short => dt.format("%a").to_string(),
            TextStyle::Narrow => long.chars().take(1).collect(),
        }
    });

    let body = match options.month {
        Some(MonthStyle::Numeric) | Some(MonthStyle::TwoDigit) => {
            let month = if options.month == Some(MonthStyle::TwoDigit) {
                format!("{:02}", dt.month())
            } else {
                dt.month().to_string()
            };
            [Some(month), day, year].into_iter().flatten().collect::<Vec<_>>().join("/")
        }
        Some(style) => {
            let long = dt.format("%B").to_string();
            let month = match style {
                MonthStyle::Short => dt.format("%b").to_string(),
                MonthStyle::Narrow => long.chars().take(1).collect(),
                _ => long,
            };
            match (day, year) {
                (Some(d), Some(y)) => format!("{} {}, {}", month, d, y),
                (Some(d), None) => format!("{} {}", month, d),
                (None, Some(y)) => format!("{} {}", month, y),
                (None, None) => month,
            }
        }
        None => [day, year].into_iter().flatten().collect::<Vec<_>>().join(" "),
    };

    match weekday {
        Some(w) if body.is_empty() => w,
        Some(w) => format!("{}, {}", w, body),
        None => body,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl RelativeUnit {
    fn name(&self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// A signed distance in a single unit. Negative values lie in the past.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelativeTime {
    pub value: i64,
    pub unit: RelativeUnit,
}

impl Display for RelativeTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use RelativeUnit::*;

        let phrase = match (self.unit, self.value) {
            (Second, 0) => Some("now"),
            (Minute, 0) => Some("this minute"),
            (Hour, 0) => Some("this hour"),
            (Day, 0) => Some("today"),
            (Day, -1) => Some("yesterday"),
            (Day, 1) => Some("tomorrow"),
            (Week, 0) => Some("this week"),
            (Week, -1) => Some("last week"),
            (Week, 1) => Some("next week"),
            (Month, 0) => Some("this month"),
            (Month, -1) => Some("last month"),
            (Month, 1) => Some("next month"),
            (Year, 0) => Some("this year"),
            (Year, -1) => Some("last year"),
            (Year, 1) => Some("next year"),
            _ => None,
        };
        if let Some(phrase) = phrase {
            return f.write_str(phrase);
        }

        let magnitude = self.value.unsigned_abs();
        let plural = if magnitude == 1 { "" } else { "s" };
        let count = group_thousands(magnitude);
        if self.value < 0 {
            write!(f, "{} {}{} ago", count, self.unit.name(), plural)
        } else {
            write!(f, "in {} {}{}", count, self.unit.name(), plural)
        }
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// Half-way cases round toward positive infinity, so -1.5 becomes -1.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Picks the coarsest unit whose rounded magnitude stays under its rollover.
fn select_unit(elapsed_ms: i64) -> RelativeTime {
    let elapsed = elapsed_ms as f64;
    let steps = [
        (RelativeUnit::Second, MS_PER_SECOND, 60),
        (RelativeUnit::Minute, MS_PER_MINUTE, 60),
        (RelativeUnit::Hour, MS_PER_HOUR, 24),
        (RelativeUnit::Day, MS_PER_DAY, 7),
        (RelativeUnit::Week, MS_PER_WEEK, 4),
        (RelativeUnit::Month, MS_PER_MONTH, 12),
    ];
    for (unit, ms, rollover) in steps {
        let value = round_half_up(elapsed / ms);
        if value.abs() < rollover {
            return RelativeTime { value, unit };
        }
    }
    RelativeTime { value: round_half_up(elapsed / MS_PER_YEAR), unit: RelativeUnit::Year }
}

fn elapsed_ms(date: &DateTime<Utc>, now: &DateTime<Utc>) -> Option<i64> {
    date.timestamp_millis().checked_sub(now.timestamp_millis())
}

/// Distance from `now` to `date`, or `None` if `date` is invalid or the
/// distance cannot be represented.
pub fn relative_time(date: impl Into<Timestamp>, now: DateTime<Utc>) -> Option<RelativeTime> {
    let date = date.into().to_datetime()?;
    elapsed_ms(&date, &now).map(select_unit)
}

/// Renders a timestamp relative to `now` (default: the current time), e.g.
/// "2 hours ago" or "in 3 days".
///
/// Falls back to [`format_date`] if the distance cannot be computed.
pub fn format_relative_time(date: impl Into<Timestamp>, now: Option<DateTime<Utc>>) -> String {
    let timestamp = date.into();
    let Some(date) = timestamp.to_datetime() else {
        return INVALID_DATE.to_string();
    };
    let now = now.unwrap_or_else(Utc::now);

    match elapsed_ms(&date, &now) {
        Some(ms) => select_unit(ms).to_string(),
        None => {
            log::error!("Error formatting relative time: {} is out of range from {}", date, now);
            format_date(timestamp, &DateFormatOptions::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{ Duration, TimeZone };

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 14, 12, 0, 0).unwrap()
    }

    fn at(offset: Duration) -> DateTime<Utc> {
        reference() + offset
    }

    #[test]
    fn test_format_date_accepts_all_input_types() {
        let expected = "April 14, 2025";
        let options = DateFormatOptions::default();
        assert_eq!(format_date(reference(), &options), expected);
        assert_eq!(format_date("2025-04-14", &options), expected);
        assert_eq!(format_date("2025-04-14T08:30:00Z", &options), expected);
        assert_eq!(format_date("2025-04-14T08:30:00", &options), expected);
        assert_eq!(format_date(1_744_588_800_000_i64, &options), expected);
        assert_eq!(format_date(1_744_588_800_000.0_f64, &options), expected);
        assert_eq!(format_date("2025-04", &options), "April 1, 2025");
        assert_eq!(format_date("2025", &options), "January 1, 2025");
        assert_eq!(
            Timestamp::from("2025-04").to_datetime(),
            Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).single()
        );
        assert_eq!(format_date("2025-13", &options), INVALID_DATE);
    }

    #[test]
    fn test_epoch_range_stops_at_chrono_limit() {
        let options = DateFormatOptions::default();
        let last = DateTime::<Utc>::MAX_UTC.timestamp_millis() as f64;
        assert_ne!(format_date(last, &options), INVALID_DATE);
        assert_eq!(format_date(last + 86_400_000.0, &options), INVALID_DATE);
        assert_eq!(format_date(8.5e15_f64, &options), INVALID_DATE);
    }

    #[test]
    fn test_format_date_invalid_inputs() {
        let options = DateFormatOptions::default();
        assert_eq!(format_date("not a date", &options), INVALID_DATE);
        assert_eq!(format_date("2025-02-30", &options), INVALID_DATE);
        assert_eq!(format_date(f64::NAN, &options), INVALID_DATE);
        assert_eq!(format_date(9e15_f64, &options), INVALID_DATE);
    }

    #[test]
    fn test_format_date_option_variants() {
        let dt = reference();
        assert_eq!(format_date(dt, &DateFormatOptions::numeric()), "4/14/2025");
        assert_eq!(
            format_date(dt, &DateFormatOptions::default().with_weekday(TextStyle::Long)),
            "Monday, April 14, 2025"
        );
        let short = DateFormatOptions {
            weekday: Some(TextStyle::Short),
            year: Some(NumericStyle::TwoDigit),
            month: Some(MonthStyle::Short),
            day: Some(NumericStyle::TwoDigit),
        };
        assert_eq!(format_date(dt, &short), "Mon, Apr 14, 25");
        let month_year = DateFormatOptions { day: None, ..DateFormatOptions::default() };
        assert_eq!(format_date(dt, &month_year), "April 2025");
        let empty = DateFormatOptions { weekday: None, year: None, month: None, day: None };
        assert_eq!(format_date(dt, &empty), "4/14/2025");
    }

    #[test]
    fn test_relative_seconds_stay_in_seconds() {
        let rel = relative_time(at(Duration::seconds(-30)), reference()).unwrap();
        assert_eq!(rel, RelativeTime { value: -30, unit: RelativeUnit::Second });
        assert_eq!(rel.to_string(), "30 seconds ago");
    }

    #[test]
    fn test_relative_rollover_is_strict() {
        let rel = relative_time(at(Duration::seconds(-60)), reference()).unwrap();
        assert_eq!(rel.unit, RelativeUnit::Minute);
        assert_eq!(rel.to_string(), "1 minute ago");

        let rel = relative_time(at(Duration::seconds(-59)), reference()).unwrap();
        assert_eq!(rel.unit, RelativeUnit::Second);
    }

    #[test]
    fn test_relative_minutes_hours_days() {
        let rel = relative_time(at(Duration::seconds(-90)), reference()).unwrap();
        assert_eq!(rel, RelativeTime { value: -1, unit: RelativeUnit::Minute });

        let rel = relative_time(at(Duration::hours(-2)), reference()).unwrap();
        assert_eq!(rel.to_string(), "2 hours ago");

        let rel = relative_time(at(Duration::hours(-25)), reference()).unwrap();
        assert_eq!(rel.unit, RelativeUnit::Day);
        assert_eq!(rel.to_string(), "yesterday");

        let rel = relative_time(at(Duration::days(3)), reference()).unwrap();
        assert_eq!(rel.to_string(), "in 3 days");
    }

    #[test]
    fn test_relative_uses_fixed_month_and_year_lengths() {
        let rel = relative_time(at(Duration::days(-14)), reference()).unwrap();
        assert_eq!(rel.to_string(), "2 weeks ago");

        // 28 days is four weeks, which rolls over into months.
        let rel = relative_time(at(Duration::days(-28)), reference()).unwrap();
        assert_eq!(rel, RelativeTime { value: -1, unit: RelativeUnit::Month });

        let rel = relative_time(at(Duration::days(-70)), reference()).unwrap();
        assert_eq!(rel.to_string(), "2 months ago");

        // 360 days is 12 thirty-day months, so it rolls into years.
        let rel = relative_time(at(Duration::days(-360)), reference()).unwrap();
        assert_eq!(rel.unit, RelativeUnit::Year);
        assert_eq!(rel.to_string(), "last year");

        let rel = relative_time(at(Duration::days(3650)), reference()).unwrap();
        assert_eq!(rel.to_string(), "in 10 years");
    }

    #[test]
    fn test_relative_zero_is_now() {
        assert_eq!(format_relative_time(reference(), Some(reference())), "now");
    }

    #[test]
    fn test_relative_invalid_input() {
        assert_eq!(format_relative_time("garbage", Some(reference())), INVALID_DATE);
        assert_eq!(relative_time(f64::INFINITY, reference()), None);
    }

    #[test]
    fn test_relative_spans_full_date_range() {
        let rel = relative_time(DateTime::<Utc>::MAX_UTC, DateTime::<Utc>::MIN_UTC).unwrap();
        assert_eq!(rel.unit, RelativeUnit::Year);
        assert!(rel.value > 0);
    }

    #[test]
    fn test_large_counts_are_grouped() {
        let rel = RelativeTime { value: -12_345, unit: RelativeUnit::Year };
        assert_eq!(rel.to_string(), "12,345 years ago");
    }
}
