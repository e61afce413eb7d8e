use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// A cell copied from an input sheet. Values are kept in their source type so the report can
/// write them back unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Excel serial date/time (days since 1899-12-30).
    DateTime(f64),
    /// Excel serial duration (fraction of days).
    Duration(f64),
    DateTimeIso(String),
    DurationIso(String),
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text used for matching and for the preview table.
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Float(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    CellValue::Duration(dt.as_f64())
                } else {
                    CellValue::DateTime(dt.as_f64())
                }
            }
            Data::DateTimeIso(s) => CellValue::DateTimeIso(s.clone()),
            Data::DurationIso(s) => CellValue::DurationIso(s.clone()),
            Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Float(v) => {
                if *v == (*v as i64) as f64 && v.abs() < 1e10 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) if *serial < 1.0 => write!(f, "{}", dt.format("%H:%M:%S")),
                Some(dt) if serial.fract() == 0.0 => write!(f, "{}", dt.format("%d.%m.%Y")),
                Some(dt) => write!(f, "{}", dt.format("%d.%m.%Y %H:%M:%S")),
                None => write!(f, "{}", serial),
            },
            CellValue::Duration(days) => {
                let total = (days * 86_400.0).round() as i64;
                write!(
                    f,
                    "{:02}:{:02}:{:02}",
                    total / 3600,
                    (total % 3600) / 60,
                    total % 60
                )
            }
            CellValue::DateTimeIso(s) | CellValue::DurationIso(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

// Excel serial 0 is 1899-12-30 once the 1900 leap-year bug is accounted for.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(Duration::milliseconds(millis))
}
