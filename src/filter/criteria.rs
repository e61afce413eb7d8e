use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ProcessError, ProcessResult};
use crate::excel::CellValue;

/// Team leader plus an inclusive date range. Can only be built with `start <= end` and a
/// non-blank team leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    team_leader: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl FilterCriteria {
    pub fn new(team_leader: &str, start: NaiveDate, end: NaiveDate) -> ProcessResult<Self> {
        let team_leader = team_leader.trim();
        if team_leader.is_empty() {
            return Err(ProcessError::NoTeamLeader);
        }

        if start > end {
            return Err(ProcessError::InvalidDateRange { start, end });
        }

        Ok(Self {
            team_leader: team_leader.to_string(),
            start,
            end,
        })
    }

    pub fn team_leader(&self) -> &str {
        &self.team_leader
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn matches_leader(&self, cell: &CellValue) -> bool {
        if cell.is_empty() {
            return false;
        }
        same_leader(&cell.display_text(), &self.team_leader)
    }
}

/// Team leader names compare trimmed and case-insensitively.
pub fn same_leader(a: &str, b: &str) -> bool {
    leader_key(a) == leader_key(b)
}

pub(crate) fn leader_key(name: &str) -> String {
    name.trim().to_lowercase()
}
