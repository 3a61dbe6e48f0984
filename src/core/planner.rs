//! Turns a deadline and a category into a day-by-day checklist

use chrono::{Days, NaiveDate};

use crate::error::{GuardianError, Result};
use crate::models::{Category, Step, Task};

/// `generate` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub days_left: i64,
    pub plan: Vec<Step>,
}

/// Build the plan for a deadline seen from `today`.
///
/// One step per day starting today, capped by both the remaining days and
/// the category template. Fails when the deadline is not strictly in the
/// future.
pub fn generate(deadline: NaiveDate, category: Category, today: NaiveDate) -> Result<GeneratedPlan> {
    let days_left = (deadline - today).num_days();

    if days_left <= 0 {
        return Err(GuardianError::InvalidDeadline { deadline, today });
    }

    let plan = category
        .template()
        .iter()
        .take(days_left as usize)
        .enumerate()
        .filter_map(|(i, label)| {
            today
                .checked_add_days(Days::new(i as u64))
                .map(|date| Step::new(date, *label))
        })
        .collect();

    Ok(GeneratedPlan { days_left, plan })
}

/// Create a fresh task for a submission
pub fn plan_task(
    name: &str,
    deadline: NaiveDate,
    category: Category,
    today: NaiveDate,
) -> Result<Task> {
    let GeneratedPlan { days_left, plan } = generate(deadline, category, today)?;

    Ok(Task::new(
        name.trim().to_string(),
        deadline,
        category,
        days_left,
        plan,
    ))
}
