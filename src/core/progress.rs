//! Derived values recomputed on every render: percent, risk, badges, level

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Step, Task};

/// 徽章等级阈值
const MASTER_BADGES: u32 = 10;
const ACHIEVER_BADGES: u32 = 5;
const BEGINNER_BADGES: u32 = 1;

/// 紧急程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Risk {
    High,
    Medium,
    Safe,
}

impl Risk {
    pub fn label(self) -> &'static str {
        match self {
            Risk::High => "Nguy cơ cao",
            Risk::Medium => "Cần chú ý",
            Risk::Safe => "An toàn",
        }
    }
}

/// Upper bounds (inclusive) of the high and medium risk bands, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high_max: i64,
    pub medium_max: i64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_max: 2,
            medium_max: 4,
        }
    }
}

impl RiskThresholds {
    pub fn with_medium_max(medium_max: i64) -> Self {
        let defaults = Self::default();
        Self {
            medium_max: medium_max.max(defaults.high_max),
            ..defaults
        }
    }

    pub fn classify(&self, days_left: i64) -> Risk {
        if days_left <= self.high_max {
            Risk::High
        } else if days_left <= self.medium_max {
            Risk::Medium
        } else {
            Risk::Safe
        }
    }
}

/// 徽章等级（仅用于显示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    None,
    Beginner,
    Achiever,
    Master,
}

impl Level {
    pub fn from_badges(badges: u32) -> Self {
        if badges >= MASTER_BADGES {
            Level::Master
        } else if badges >= ACHIEVER_BADGES {
            Level::Achiever
        } else if badges >= BEGINNER_BADGES {
            Level::Beginner
        } else {
            Level::None
        }
    }

    pub fn title(self) -> Option<&'static str> {
        match self {
            Level::Master => Some("👑 Bậc thầy deadline"),
            Level::Achiever => Some("🥈 Chiến binh chăm chỉ"),
            Level::Beginner => Some("🥉 Tân binh"),
            Level::None => None,
        }
    }
}

/// Live days until the stored deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining(i64),
    /// 存储的截止日期无法解析
    Invalid,
}

impl Countdown {
    pub fn of(task: &Task, today: NaiveDate) -> Self {
        match task.deadline_date() {
            Some(deadline) => Countdown::Remaining((deadline - today).num_days()),
            None => Countdown::Invalid,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Countdown::Remaining(days) if days > 0 => format!("Còn {} ngày", days),
            Countdown::Remaining(0) => "Hạn chót hôm nay".to_string(),
            Countdown::Remaining(days) => format!("Quá hạn {} ngày", -days),
            Countdown::Invalid => "Deadline không hợp lệ".to_string(),
        }
    }
}

/// Everything the presentation layer shows for one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub risk: Risk,
    pub countdown: Countdown,
    /// 1 when this evaluation earns the task's badge, else 0
    pub badge_delta: u32,
}

impl Evaluation {
    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}

pub fn completed_count(plan: &[Step]) -> usize {
    plan.iter().filter(|s| s.done).count()
}

/// `floor(100 * done / len)`, 0 for an empty plan
pub fn percent(plan: &[Step]) -> u8 {
    if plan.is_empty() {
        return 0;
    }
    (completed_count(plan) * 100 / plan.len()) as u8
}

pub fn evaluate(task: &Task, today: NaiveDate, thresholds: &RiskThresholds) -> Evaluation {
    let completed = completed_count(&task.plan);
    let percent = percent(&task.plan);
    let badge_delta = u32::from(percent == 100 && !task.celebrated);

    Evaluation {
        completed,
        total: task.plan.len(),
        percent,
        risk: thresholds.classify(task.days_left),
        countdown: Countdown::of(task, today),
        badge_delta,
    }
}

/// Apply the badge rule to one task. Returns true when a badge was awarded.
pub fn celebrate(task: &mut Task, badges: &mut u32) -> bool {
    if percent(&task.plan) == 100 && !task.celebrated {
        task.celebrated = true;
        *badges += 1;
        return true;
    }
    false
}

/// 仪表盘统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub badges: u32,
    pub level: Level,
    pub total_tasks: usize,
    pub urgent_tasks: usize,
    pub completed_tasks: usize,
}

impl Dashboard {
    pub fn build(tasks: &[Task], badges: u32, thresholds: &RiskThresholds) -> Self {
        Self {
            badges,
            level: Level::from_badges(badges),
            total_tasks: tasks.len(),
            urgent_tasks: tasks
                .iter()
                .filter(|t| thresholds.classify(t.days_left) == Risk::High)
                .count(),
            completed_tasks: tasks.iter().filter(|t| percent(&t.plan) == 100).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::planner::plan_task;
    use crate::models::{parse_date, Category};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn essay() -> Task {
        // 3 天，3 个步骤
        plan_task("Essay", date("2024-01-04"), Category::Essay, date("2024-01-01")).unwrap()
    }

    #[test]
    fn test_percent_floors() {
        let mut task = essay();
        assert_eq!(percent(&task.plan), 0);

        task.plan[0].done = true;
        assert_eq!(percent(&task.plan), 33);

        task.plan[1].done = true;
        assert_eq!(percent(&task.plan), 66);

        task.plan[2].done = true;
        assert_eq!(percent(&task.plan), 100);
    }

    #[test]
    fn test_percent_empty_plan() {
        assert_eq!(percent(&[]), 0);
    }

    #[test]
    fn test_percent_monotonic() {
        let mut task =
            plan_task("Exam", date("2024-01-10"), Category::ExamPrep, date("2024-01-01")).unwrap();
        let mut last = percent(&task.plan);

        for i in 0..task.plan.len() {
            task.plan[i].done = true;
            let now = percent(&task.plan);
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_badge_awarded_once() {
        let mut task = essay();
        let mut badges = 0;

        for step in &mut task.plan {
            step.done = true;
        }

        assert!(celebrate(&mut task, &mut badges));
        assert!(task.celebrated);
        assert_eq!(badges, 1);

        // 再次渲染不重复颁发
        for _ in 0..5 {
            assert!(!celebrate(&mut task, &mut badges));
        }
        assert_eq!(badges, 1);
    }

    #[test]
    fn test_unchecking_keeps_celebration() {
        let mut task = essay();
        let mut badges = 0;
        task.plan.iter_mut().for_each(|s| s.done = true);
        celebrate(&mut task, &mut badges);

        task.plan[0].done = false;
        assert!(!celebrate(&mut task, &mut badges));
        task.plan[0].done = true;
        assert!(!celebrate(&mut task, &mut badges));

        assert!(task.celebrated);
        assert_eq!(badges, 1);
    }

    #[test]
    fn test_evaluate_badge_delta() {
        let thresholds = RiskThresholds::default();
        let mut task = essay();
        let today = date("2024-01-01");

        assert_eq!(evaluate(&task, today, &thresholds).badge_delta, 0);

        task.plan.iter_mut().for_each(|s| s.done = true);
        let eval = evaluate(&task, today, &thresholds);
        assert_eq!(eval.badge_delta, 1);
        assert_eq!(eval.completed, 3);
        assert_eq!(eval.total, 3);
        assert!(eval.is_complete());

        task.celebrated = true;
        assert_eq!(evaluate(&task, today, &thresholds).badge_delta, 0);
    }

    #[test]
    fn test_risk_boundaries() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.classify(1), Risk::High);
        assert_eq!(thresholds.classify(2), Risk::High);
        assert_eq!(thresholds.classify(3), Risk::Medium);
        assert_eq!(thresholds.classify(4), Risk::Medium);
        assert_eq!(thresholds.classify(5), Risk::Safe);
    }

    #[test]
    fn test_risk_boundaries_wide_medium() {
        let thresholds = RiskThresholds::with_medium_max(5);
        assert_eq!(thresholds.classify(2), Risk::High);
        assert_eq!(thresholds.classify(5), Risk::Medium);
        assert_eq!(thresholds.classify(6), Risk::Safe);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(Level::from_badges(0), Level::None);
        assert_eq!(Level::from_badges(1), Level::Beginner);
        assert_eq!(Level::from_badges(4), Level::Beginner);
        assert_eq!(Level::from_badges(5), Level::Achiever);
        assert_eq!(Level::from_badges(9), Level::Achiever);
        assert_eq!(Level::from_badges(10), Level::Master);
        assert!(Level::None.title().is_none());
    }

    #[test]
    fn test_countdown_live_and_invalid() {
        let mut task = essay();
        assert_eq!(Countdown::of(&task, date("2024-01-02")), Countdown::Remaining(2));
        assert_eq!(Countdown::of(&task, date("2024-01-06")), Countdown::Remaining(-2));
        assert_eq!(Countdown::Remaining(-2).describe(), "Quá hạn 2 ngày");

        task.deadline = "not-a-date".to_string();
        let eval = evaluate(&task, date("2024-01-02"), &RiskThresholds::default());
        assert_eq!(eval.countdown, Countdown::Invalid);
        assert_eq!(eval.countdown.describe(), "Deadline không hợp lệ");
        // 风险等级使用创建时的快照
        assert_eq!(eval.risk, Risk::Medium);
    }

    #[test]
    fn test_dashboard_counts() {
        let thresholds = RiskThresholds::default();
        let mut done = essay();
        done.plan.iter_mut().for_each(|s| s.done = true);
        let urgent =
            plan_task("Quiz", date("2024-01-03"), Category::ShortAssignment, date("2024-01-01")).unwrap();
        let relaxed =
            plan_task("Talk", date("2024-02-01"), Category::Presentation, date("2024-01-01")).unwrap();

        let dashboard = Dashboard::build(&[done, urgent, relaxed], 6, &thresholds);
        assert_eq!(dashboard.total_tasks, 3);
        assert_eq!(dashboard.urgent_tasks, 1);
        assert_eq!(dashboard.completed_tasks, 1);
        assert_eq!(dashboard.level, Level::Achiever);
    }
}
