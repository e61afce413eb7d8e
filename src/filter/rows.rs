use std::collections::HashSet;

use crate::excel::{Row, Sheet};
use crate::filter::criteria::leader_key;
use crate::filter::{DatedSheet, FilterCriteria};

const TEAM_LEADER_HEADERS: [&str; 4] = ["team leader", "team_leader", "teamleader", "supervisor"];

/// Index of the first header that names a team leader column.
pub fn find_team_leader_column(header: &[String]) -> Option<usize> {
    header.iter().position(|name| {
        let name = name.to_lowercase();
        TEAM_LEADER_HEADERS.iter().any(|term| name.contains(term))
    })
}

/// Date sheets inside the criteria range, in date order.
pub fn select_sheets<'a>(
    dated: &'a [DatedSheet],
    criteria: &FilterCriteria,
) -> Vec<&'a DatedSheet> {
    dated
        .iter()
        .filter(|sheet| criteria.contains(sheet.date))
        .collect()
}

/// Rows of `sheet` whose team leader matches, in sheet order. `None` means the sheet has no
/// team leader column at all.
pub fn filter_rows(sheet: &Sheet, criteria: &FilterCriteria) -> Option<Vec<Row>> {
    let column = &sheet.header[find_team_leader_column(&sheet.header)?];

    Some(
        sheet
            .rows
            .iter()
            .filter(|row| row.get(column).is_some_and(|cell| criteria.matches_leader(cell)))
            .cloned()
            .collect(),
    )
}

/// Distinct team leader values across `sheets`, first spelling wins, sorted case-insensitively.
pub fn discover_team_leaders<'a, I>(sheets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Sheet>,
{
    let mut seen = HashSet::new();
    let mut leaders = Vec::new();

    for sheet in sheets {
        let Some(idx) = find_team_leader_column(&sheet.header) else {
            continue;
        };
        let column = &sheet.header[idx];

        for row in &sheet.rows {
            let Some(cell) = row.get(column) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }

            let name = cell.display_text().trim().to_string();
            if seen.insert(leader_key(&name)) {
                leaders.push(name);
            }
        }
    }

    leaders.sort_by_key(|name| leader_key(name));
    leaders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::CellValue;
    use chrono::NaiveDate;

    fn sheet(name: &str, header: &[&str], rows: &[&[&str]]) -> Sheet {
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|values| {
                header
                    .iter()
                    .zip(values.iter())
                    .map(|(h, v)| {
                        let cell = if v.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::String(v.to_string())
                        };
                        (h.clone(), cell)
                    })
                    .collect()
            })
            .collect();
        Sheet {
            name: name.to_string(),
            header,
            rows,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn team_leader_column_detection() {
        let header = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        assert_eq!(find_team_leader_column(&header(&["Name", "Team Leader"])), Some(1));
        assert_eq!(find_team_leader_column(&header(&["TEAM_LEADER", "x"])), Some(0));
        assert_eq!(find_team_leader_column(&header(&["Name", "Supervisor"])), Some(1));
        assert_eq!(find_team_leader_column(&header(&["Name", "AHT"])), None);
    }

    #[test]
    fn keeps_matching_rows_in_order() {
        let sheet = sheet(
            "01.01.2024",
            &["Name", "Team Leader", "AHT"],
            &[
                &["Agent 1", "John", "00:05:30"],
                &["Agent 2", "Sarah", "00:07:45"],
                &["Agent 3", "john", "00:04:50"],
                &["Agent 4", "", "00:08:30"],
            ],
        );
        let criteria = FilterCriteria::new("John", date(1), date(1)).unwrap();

        let rows = filter_rows(&sheet, &criteria).unwrap();
        let names: Vec<String> = rows.iter().map(|r| r["Name"].to_string()).collect();
        assert_eq!(names, vec!["Agent 1", "Agent 3"]);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["Name", "Team Leader", "AHT"]);
    }

    #[test]
    fn sheet_without_leader_column_yields_none() {
        let sheet = sheet("01.01.2024", &["Name", "AHT"], &[&["Agent 1", "00:05:30"]]);
        let criteria = FilterCriteria::new("John", date(1), date(1)).unwrap();
        assert!(filter_rows(&sheet, &criteria).is_none());
    }

    #[test]
    fn unknown_leader_yields_empty() {
        let sheet = sheet("01.01.2024", &["Name", "Team Leader"], &[&["Agent 1", "John"]]);
        let criteria = FilterCriteria::new("Nobody", date(1), date(1)).unwrap();
        assert_eq!(filter_rows(&sheet, &criteria).unwrap().len(), 0);
    }

    #[test]
    fn selects_closed_range() {
        let dated: Vec<DatedSheet> = (1..=5)
            .map(|d| DatedSheet {
                name: format!("{:02}.01.2024", d),
                date: date(d),
            })
            .collect();
        let criteria = FilterCriteria::new("John", date(2), date(4)).unwrap();

        let names: Vec<&str> = select_sheets(&dated, &criteria)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["02.01.2024", "03.01.2024", "04.01.2024"]);

        let missing = FilterCriteria::new("John", date(9), date(9)).unwrap();
        assert!(select_sheets(&dated, &missing).is_empty());
    }

    #[test]
    fn discovers_distinct_leaders() {
        let a = sheet(
            "01.01.2024",
            &["Name", "Team Leader"],
            &[&["A1", "Sarah"], &["A2", "john"], &["A3", ""]],
        );
        let b = sheet(
            "02.01.2024",
            &["Supervisor", "Name"],
            &[&["Mike", "A4"], &["JOHN", "A5"], &["Sarah ", "A6"]],
        );
        let c = sheet("03.01.2024", &["Name"], &[&["A7"]]);

        assert_eq!(discover_team_leaders([&a, &b, &c]), vec!["john", "Mike", "Sarah"]);
    }
}
