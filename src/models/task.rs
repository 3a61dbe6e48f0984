use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// 计划中的一天
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub date: NaiveDate,
    #[serde(rename = "task")]
    pub label: String,
    #[serde(default)]
    pub done: bool,
}

impl Step {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// `YYYY-MM-DD`；保留原始字符串，读取时再解析
    pub deadline: String,
    #[serde(rename = "type")]
    pub category: Category,
    /// Snapshot of `deadline - creation day`, never recomputed
    pub days_left: i64,
    pub plan: Vec<Step>,
    #[serde(default)]
    pub celebrated: bool,
}

impl Task {
    pub fn new(
        name: String,
        deadline: NaiveDate,
        category: Category,
        days_left: i64,
        plan: Vec<Step>,
    ) -> Self {
        Self {
            name,
            deadline: deadline.format(DATE_FORMAT).to_string(),
            category,
            days_left,
            plan,
            celebrated: false,
        }
    }

    /// Parsed deadline, `None` when the stored string is malformed
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date(&self.deadline)
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
