use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{ProcessError, ProcessResult};

const SHEET_DATE_FORMAT: &str = "%d.%m.%Y";

/// Result of reading a sheet name as a `dd.mm.yyyy` date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetName {
    Dated(NaiveDate),
    NotADate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatedSheet {
    pub name: String,
    pub date: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotADate,
    NoTeamLeaderColumn,
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedSheet {
    pub name: String,
    pub reason: SkipReason,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NotADate => "name is not a dd.mm.yyyy date",
            SkipReason::NoTeamLeaderColumn => "no team leader column",
            SkipReason::Empty => "sheet is empty",
        }
    }
}

pub fn parse_sheet_name(name: &str) -> SheetName {
    if !has_date_shape(name) {
        return SheetName::NotADate;
    }

    match NaiveDate::parse_from_str(name, SHEET_DATE_FORMAT) {
        Ok(date) => SheetName::Dated(date),
        Err(_) => SheetName::NotADate,
    }
}

/// `DD.MM.YYYY`, ASCII digits only.
fn has_date_shape(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

/// Parses a date typed by the user. Same rule as sheet names, surrounding whitespace ignored.
pub fn parse_date_input(text: &str) -> ProcessResult<NaiveDate> {
    match parse_sheet_name(text.trim()) {
        SheetName::Dated(date) => Ok(date),
        SheetName::NotADate => Err(ProcessError::InvalidDate(text.trim().to_string())),
    }
}

/// Splits sheet names into date sheets (sorted by date, workbook order for ties) and skipped
/// sheets (workbook order).
pub fn catalog_sheets<S: AsRef<str>>(names: &[S]) -> (Vec<DatedSheet>, Vec<SkippedSheet>) {
    let mut dated = Vec::with_capacity(names.len());
    let mut skipped = Vec::new();

    for name in names {
        let name = name.as_ref();
        match parse_sheet_name(name) {
            SheetName::Dated(date) => dated.push(DatedSheet {
                name: name.to_string(),
                date,
            }),
            SheetName::NotADate => {
                debug!(sheet = name, "skipping sheet without a date name");
                skipped.push(SkippedSheet {
                    name: name.to_string(),
                    reason: SkipReason::NotADate,
                });
            }
        }
    }

    dated.sort_by_key(|sheet| sheet.date);
    (dated, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_literal_day_month_year() {
        assert_eq!(
            parse_sheet_name("01.01.2024"),
            SheetName::Dated(date(2024, 1, 1))
        );
        assert_eq!(
            parse_sheet_name("31.12.1999"),
            SheetName::Dated(date(1999, 12, 31))
        );
        assert_eq!(
            parse_sheet_name("29.02.2024"),
            SheetName::Dated(date(2024, 2, 29))
        );
    }

    #[test]
    fn every_day_of_a_year_round_trips() {
        let mut day = date(2023, 1, 1);
        while day.year() == 2023 {
            assert_eq!(
                parse_sheet_name(&format_sheet_date(day)),
                SheetName::Dated(day)
            );
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn rejects_non_conforming_names() {
        for name in [
            "Sheet1",
            "Summary",
            "31.02.2024",
            "29.02.2023",
            "00.01.2024",
            "01.13.2024",
            "1.1.2024",
            "01.01.24",
            "01/01/2024",
            "2024.01.01",
            " 01.01.2024",
            "01.01.2024 ",
            "01.01.+024",
            "",
        ] {
            assert_eq!(parse_sheet_name(name), SheetName::NotADate, "{name:?}");
        }
    }

    #[test]
    fn user_dates_are_trimmed() {
        assert_eq!(parse_date_input(" 05.01.2024 ").unwrap(), date(2024, 1, 5));
        assert!(matches!(
            parse_date_input("5.1.2024"),
            Err(ProcessError::InvalidDate(text)) if text == "5.1.2024"
        ));
    }

    #[test]
    fn catalog_sorts_by_date_and_keeps_skips_in_order() {
        let names = ["03.01.2024", "Notes", "01.01.2024", "31.02.2024", "02.01.2024"];
        let (dated, skipped) = catalog_sheets(&names);

        let dated_names: Vec<&str> = dated.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(dated_names, vec!["01.01.2024", "02.01.2024", "03.01.2024"]);

        let skipped_names: Vec<&str> = skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped_names, vec!["Notes", "31.02.2024"]);
        assert!(skipped.iter().all(|s| s.reason == SkipReason::NotADate));
    }
}
