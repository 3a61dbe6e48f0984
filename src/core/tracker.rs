//! User-scoped session over a [`TaskStore`]

use chrono::NaiveDate;
use tracing::{info, warn};

use super::planner::plan_task;
use super::progress::{self, Dashboard, Evaluation, RiskThresholds};
use crate::error::{GuardianError, Result, StoreError};
use crate::fs::TaskStore;
use crate::models::{Category, Database, Task, UserRecord};

/// A badge earned during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub task_index: usize,
    pub task_name: String,
    pub badges: u32,
}

/// 一个用户的任务会话。所有修改都会立即整体写回存储。
pub struct Tracker<S: TaskStore> {
    store: S,
    db: Database,
    username: String,
    thresholds: RiskThresholds,
}

impl<S: TaskStore> Tracker<S> {
    /// Load the collection and log `username` in, creating the record on
    /// first use. A corrupt store is an error.
    #[allow(dead_code)]
    pub fn open(store: S, username: &str) -> Result<Self> {
        Self::open_with(store, username, false)
    }

    /// Like [`open`](Self::open); with `recover` set, a corrupt store is moved
    /// aside and the session starts from an empty collection.
    pub fn open_with(store: S, username: &str, recover: bool) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GuardianError::InvalidUsername);
        }

        let db = match store.load() {
            Ok(db) => db,
            Err(StoreError::CorruptState { path, source }) if recover => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "database is corrupt, starting with an empty collection"
                );
                store.quarantine()?;
                Database::default()
            }
            Err(e) => return Err(e.into()),
        };

        let mut tracker = Self {
            store,
            db,
            username: username.to_string(),
            thresholds: RiskThresholds::default(),
        };

        if tracker.db.provision(username) {
            info!(user = username, "new user provisioned");
            tracker.save()?;
        }

        Ok(tracker)
    }

    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn record(&self) -> &UserRecord {
        // provision() 保证记录存在
        self.db
            .get(&self.username)
            .expect("current user is provisioned on open")
    }

    pub fn tasks(&self) -> &[Task] {
        &self.record().tasks
    }

    pub fn task(&self, index: usize) -> Result<&Task> {
        self.tasks()
            .get(index)
            .ok_or(GuardianError::TaskNotFound(index))
    }

    pub fn badges(&self) -> u32 {
        self.record().badges
    }

    fn save(&self) -> Result<()> {
        self.store.save(&self.db)?;
        Ok(())
    }

    /// Apply `change` to a copy of the current user's record, save the copy
    /// and only then swap it in. A failed change or save leaves the session
    /// exactly as it was.
    fn commit<T>(&mut self, change: impl FnOnce(&mut UserRecord) -> Result<T>) -> Result<T> {
        let mut db = self.db.clone();
        let record = db
            .get_mut(&self.username)
            .expect("current user is provisioned on open");

        let value = change(record)?;
        self.store.save(&db)?;
        self.db = db;
        Ok(value)
    }

    /// Generate a plan for a submission and append it. Returns the new index.
    pub fn create_task(
        &mut self,
        name: &str,
        deadline: NaiveDate,
        category: Category,
        today: NaiveDate,
    ) -> Result<usize> {
        let task = plan_task(name, deadline, category, today)?;
        self.append(task)
    }

    pub fn append(&mut self, task: Task) -> Result<usize> {
        let (name, category, steps) = (task.name.clone(), task.category, task.plan.len());
        let index = self.commit(|record| {
            record.tasks.push(task);
            Ok(record.tasks.len() - 1)
        })?;

        info!(
            user = %self.username,
            task = %name,
            category = ?category,
            steps,
            "task added"
        );
        Ok(index)
    }

    /// Delete a task. Badges it already earned are kept.
    pub fn remove(&mut self, index: usize) -> Result<Task> {
        let task = self.commit(|record| {
            if index >= record.tasks.len() {
                return Err(GuardianError::TaskNotFound(index));
            }
            Ok(record.tasks.remove(index))
        })?;

        info!(user = %self.username, task = %task.name, "task removed");
        Ok(task)
    }

    #[allow(dead_code)]
    pub fn update(&mut self, index: usize, task: Task) -> Result<()> {
        self.commit(|record| {
            let slot = record
                .tasks
                .get_mut(index)
                .ok_or(GuardianError::TaskNotFound(index))?;
            *slot = task;
            Ok(())
        })
    }

    /// Set a step's checkbox, apply the badge rule and save.
    /// Returns the award when this change completed the task.
    pub fn set_step_done(&mut self, task: usize, step: usize, done: bool) -> Result<Option<Award>> {
        let award = self.commit(|record| {
            record
                .tasks
                .get_mut(task)
                .ok_or(GuardianError::TaskNotFound(task))?
                .plan
                .get_mut(step)
                .ok_or(GuardianError::StepNotFound { task, step })?
                .done = done;
            Ok(apply_badge_rule(record, task))
        })?;

        self.log_awards(award.as_slice());
        Ok(award)
    }

    pub fn toggle_step(&mut self, task: usize, step: usize) -> Result<Option<Award>> {
        let done = self
            .task(task)?
            .plan
            .get(step)
            .ok_or(GuardianError::StepNotFound { task, step })?
            .done;
        self.set_step_done(task, step, !done)
    }

    /// Per-render pass: apply the badge rule to every task and save
    /// unconditionally. Returns the badges earned by this pass.
    pub fn refresh(&mut self) -> Result<Vec<Award>> {
        let awards = self.commit(|record| {
            Ok((0..record.tasks.len())
                .filter_map(|i| apply_badge_rule(record, i))
                .collect::<Vec<Award>>())
        })?;

        self.log_awards(&awards);
        Ok(awards)
    }

    fn log_awards(&self, awards: &[Award]) {
        for award in awards {
            info!(
                user = %self.username,
                task = %award.task_name,
                badges = award.badges,
                "badge awarded"
            );
        }
    }

    pub fn evaluations(&self, today: NaiveDate) -> Vec<Evaluation> {
        self.tasks()
            .iter()
            .map(|t| progress::evaluate(t, today, &self.thresholds))
            .collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(self.tasks(), self.badges(), &self.thresholds)
    }
}

/// 对单个任务应用徽章规则
fn apply_badge_rule(record: &mut UserRecord, index: usize) -> Option<Award> {
    let task = record.tasks.get_mut(index)?;

    if !progress::celebrate(task, &mut record.badges) {
        return None;
    }

    Some(Award {
        task_index: index,
        task_name: task.name.clone(),
        badges: record.badges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{JsonFileStore, MemoryStore};
    use crate::models::parse_date;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-01-01")
    }

    fn tracker() -> Tracker<MemoryStore> {
        Tracker::open(MemoryStore::default(), "an").unwrap()
    }

    #[test]
    fn test_open_provisions_and_saves() {
        let tracker = tracker();
        assert_eq!(tracker.store().save_count(), 1);
        assert!(tracker.tasks().is_empty());
        assert_eq!(tracker.badges(), 0);
        assert!(tracker.store().snapshot().get("an").is_some());
    }

    #[test]
    fn test_open_existing_user_does_not_save() {
        let mut db = Database::default();
        db.provision("an");
        let tracker = Tracker::open(MemoryStore::new(db), "an").unwrap();
        assert_eq!(tracker.store().save_count(), 0);
    }

    #[test]
    fn test_blank_username_rejected() {
        let err = Tracker::open(MemoryStore::default(), "   ").err().unwrap();
        assert!(matches!(err, GuardianError::InvalidUsername));
    }

    #[test]
    fn test_create_task_appends_and_saves() {
        let mut tracker = tracker();
        let index = tracker
            .create_task("Essay", date("2024-01-04"), Category::Essay, today())
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(tracker.tasks()[0].plan.len(), 3);
        assert_eq!(tracker.store().save_count(), 2);
        assert_eq!(tracker.store().snapshot().get("an").unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_invalid_deadline_creates_nothing() {
        let mut tracker = tracker();
        let err = tracker
            .create_task("Late", today(), Category::Essay, today())
            .unwrap_err();

        assert!(matches!(err, GuardianError::InvalidDeadline { .. }));
        assert!(tracker.tasks().is_empty());
        assert_eq!(tracker.store().save_count(), 1);
    }

    #[test]
    fn test_completing_all_steps_awards_one_badge() {
        let mut tracker = tracker();
        tracker
            .create_task("Essay", date("2024-01-04"), Category::Essay, today())
            .unwrap();

        assert_eq!(tracker.set_step_done(0, 0, true).unwrap(), None);
        assert_eq!(tracker.set_step_done(0, 1, true).unwrap(), None);
        let award = tracker.set_step_done(0, 2, true).unwrap().unwrap();

        assert_eq!(award.task_index, 0);
        assert_eq!(award.badges, 1);
        assert!(tracker.tasks()[0].celebrated);

        // 下一次渲染再次勾选，不重复加徽章
        for step in 0..3 {
            assert_eq!(tracker.set_step_done(0, step, true).unwrap(), None);
        }
        assert!(tracker.refresh().unwrap().is_empty());
        assert!(tracker.refresh().unwrap().is_empty());
        assert_eq!(tracker.badges(), 1);
    }

    #[test]
    fn test_refresh_awards_externally_completed_task() {
        let mut tracker = tracker();
        let mut task =
            plan_task("Quiz", date("2024-01-02"), Category::ShortAssignment, today()).unwrap();
        task.plan.iter_mut().for_each(|s| s.done = true);
        tracker.append(task).unwrap();

        let awards = tracker.refresh().unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].task_name, "Quiz");
        assert_eq!(tracker.badges(), 1);
        assert_eq!(tracker.store().snapshot().get("an").unwrap().badges, 1);
    }

    #[test]
    fn test_refresh_always_saves() {
        let mut tracker = tracker();
        let before = tracker.store().save_count();
        tracker.refresh().unwrap();
        tracker.refresh().unwrap();
        assert_eq!(tracker.store().save_count(), before + 2);
    }

    #[test]
    fn test_toggle_step() {
        let mut tracker = tracker();
        tracker
            .create_task("Talk", date("2024-01-10"), Category::Presentation, today())
            .unwrap();

        tracker.toggle_step(0, 1).unwrap();
        assert!(tracker.tasks()[0].plan[1].done);
        tracker.toggle_step(0, 1).unwrap();
        assert!(!tracker.tasks()[0].plan[1].done);
    }

    #[test]
    fn test_out_of_range_indexes() {
        let mut tracker = tracker();
        tracker
            .create_task("Quiz", date("2024-01-05"), Category::ShortAssignment, today())
            .unwrap();

        assert!(matches!(
            tracker.set_step_done(3, 0, true),
            Err(GuardianError::TaskNotFound(3))
        ));
        assert!(matches!(
            tracker.toggle_step(0, 7),
            Err(GuardianError::StepNotFound { task: 0, step: 7 })
        ));
        assert!(matches!(tracker.remove(1), Err(GuardianError::TaskNotFound(1))));
        let task = tracker.tasks()[0].clone();
        assert!(matches!(tracker.update(2, task), Err(GuardianError::TaskNotFound(2))));
    }

    #[test]
    fn test_remove_keeps_badges() {
        let mut tracker = tracker();
        tracker
            .create_task("Quiz", date("2024-01-02"), Category::ShortAssignment, today())
            .unwrap();
        tracker.set_step_done(0, 0, true).unwrap();
        assert_eq!(tracker.badges(), 1);

        let removed = tracker.remove(0).unwrap();
        assert_eq!(removed.name, "Quiz");
        assert!(tracker.tasks().is_empty());
        assert_eq!(tracker.badges(), 1);
    }

    #[test]
    fn test_update_replaces_task() {
        let mut tracker = tracker();
        tracker
            .create_task("Draft", date("2024-01-03"), Category::Essay, today())
            .unwrap();

        let mut task = tracker.tasks()[0].clone();
        task.name = "Final".to_string();
        tracker.update(0, task).unwrap();

        assert_eq!(tracker.store().snapshot().get("an").unwrap().tasks[0].name, "Final");
    }

    #[test]
    fn test_users_are_namespaced() {
        let mut an = tracker();
        an.create_task("A", date("2024-01-03"), Category::Essay, today())
            .unwrap();

        let store = MemoryStore::new(an.store().snapshot());
        let binh = Tracker::open(store, "binh").unwrap();

        assert!(binh.tasks().is_empty());
        let names: Vec<String> = binh
            .store()
            .snapshot()
            .summaries()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["an".to_string(), "binh".to_string()]);
    }

    #[test]
    fn test_dashboard_and_evaluations() {
        let mut tracker = tracker();
        tracker
            .create_task("Quiz", date("2024-01-02"), Category::ShortAssignment, today())
            .unwrap();
        tracker
            .create_task("Talk", date("2024-01-20"), Category::Presentation, today())
            .unwrap();

        let dashboard = tracker.dashboard();
        assert_eq!(dashboard.total_tasks, 2);
        assert_eq!(dashboard.urgent_tasks, 1);

        let evals = tracker.evaluations(date("2024-01-05"));
        assert_eq!(evals.len(), 2);
        assert_eq!(evals[1].total, 5);
    }

    #[test]
    fn test_corrupt_file_fails_or_recovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{\"an\": ").unwrap();

        let err = Tracker::open(JsonFileStore::new(&path), "an").err().unwrap();
        assert!(matches!(err, GuardianError::Store(StoreError::CorruptState { .. })));

        let tracker = Tracker::open_with(JsonFileStore::new(&path), "an", true).unwrap();
        assert!(tracker.tasks().is_empty());
        assert!(tracker.store().corrupt_backup_path().exists());
        // 新文件已写入
        assert!(JsonFileStore::new(&path).load().unwrap().get("an").is_some());
    }

    #[test]
    fn test_persists_across_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");

        {
            let mut tracker = Tracker::open(JsonFileStore::new(&path), "an").unwrap();
            tracker
                .create_task("Quiz", date("2024-01-02"), Category::ShortAssignment, today())
                .unwrap();
            tracker.set_step_done(0, 0, true).unwrap();
        }

        let tracker = Tracker::open(JsonFileStore::new(&path), "an").unwrap();
        assert_eq!(tracker.tasks().len(), 1);
        assert!(tracker.tasks()[0].celebrated);
        assert_eq!(tracker.badges(), 1);
    }

    #[test]
    fn test_failed_save_leaves_session_unchanged() {
        let mut tracker = tracker();
        tracker.store().set_fail_saves(true);

        // 重试两次都失败，不应产生重复任务
        for _ in 0..2 {
            let err = tracker
                .create_task("Essay", date("2024-01-04"), Category::Essay, today())
                .unwrap_err();
            assert!(matches!(err, GuardianError::Store(StoreError::Io { .. })));
            assert!(tracker.tasks().is_empty());
        }

        tracker.store().set_fail_saves(false);
        tracker.refresh().unwrap();
        assert!(tracker.store().snapshot().get("an").unwrap().tasks.is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back_step_and_badge() {
        let mut tracker = tracker();
        tracker
            .create_task("Quiz", date("2024-01-02"), Category::ShortAssignment, today())
            .unwrap();

        tracker.store().set_fail_saves(true);
        assert!(tracker.set_step_done(0, 0, true).is_err());
        assert!(!tracker.tasks()[0].plan[0].done);
        assert!(!tracker.tasks()[0].celebrated);
        assert_eq!(tracker.badges(), 0);

        assert!(tracker.remove(0).is_err());
        assert_eq!(tracker.tasks().len(), 1);

        let mut renamed = tracker.tasks()[0].clone();
        renamed.name = "Renamed".to_string();
        assert!(tracker.update(0, renamed).is_err());
        assert_eq!(tracker.tasks()[0].name, "Quiz");

        tracker.store().set_fail_saves(false);
        let award = tracker.set_step_done(0, 0, true).unwrap();
        assert_eq!(award.map(|a| a.badges), Some(1));
    }
}
