use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::task::Task;

/// 单个用户的数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub badges: u32,
}

/// `dlg user list` 的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub name: String,
    pub tasks: usize,
    pub badges: u32,
}

/// The whole persisted collection: username -> record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    pub users: BTreeMap<String, UserRecord>,
}

impl Database {
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(username)
    }

    /// 首次登录的用户自动创建空记录，返回是否新建
    pub fn provision(&mut self, username: &str) -> bool {
        if self.users.contains_key(username) {
            return false;
        }
        self.users
            .insert(username.to_string(), UserRecord::default());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Every user with task and badge counts, sorted by name
    pub fn summaries(&self) -> Vec<UserSummary> {
        self.users
            .iter()
            .map(|(name, record)| UserSummary {
                name: name.clone(),
                tasks: record.tasks.len(),
                badges: record.badges,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_sorted_with_counts() {
        let mut db = Database::default();
        db.provision("vy");
        db.provision("an");
        db.get_mut("vy").unwrap().badges = 2;

        assert_eq!(
            db.summaries(),
            vec![
                UserSummary { name: "an".to_string(), tasks: 0, badges: 0 },
                UserSummary { name: "vy".to_string(), tasks: 0, badges: 2 },
            ]
        );
    }

    #[test]
    fn test_provision_only_once() {
        let mut db = Database::default();
        assert!(db.provision("an"));
        db.get_mut("an").unwrap().badges = 3;

        assert!(!db.provision("an"));
        assert_eq!(db.get("an").unwrap().badges, 3);
    }

    #[test]
    fn test_namespaced_json_shape() {
        let mut db = Database::default();
        db.provision("binh");

        let value = serde_json::to_value(&db).unwrap();
        assert_eq!(value["binh"]["badges"], 0);
        assert!(value["binh"]["tasks"].as_array().unwrap().is_empty());
    }
}
