use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GuardianError;

/// 作业类型
///
/// 序列化时使用界面上的显示名称（与旧版 database.json 兼容），
/// 反序列化时也接受英文名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Thuyết trình", alias = "Presentation")]
    Presentation,
    #[serde(rename = "Bài luận", alias = "Essay")]
    Essay,
    #[serde(rename = "Ôn thi", alias = "ExamPrep")]
    ExamPrep,
    #[serde(rename = "Bài tập ngắn", alias = "ShortAssignment")]
    ShortAssignment,
}

const PRESENTATION_STAGES: &[&str] = &[
    "Lên ý tưởng",
    "Nghiên cứu tài liệu",
    "Làm slide",
    "Chỉnh sửa slide",
    "Luyện tập",
];

const ESSAY_STAGES: &[&str] = &[
    "Tìm tài liệu",
    "Lập dàn ý",
    "Viết bản nháp",
    "Chỉnh sửa",
    "Hoàn thiện",
];

const EXAM_PREP_STAGES: &[&str] = &[
    "Ôn lý thuyết",
    "Làm bài tập cơ bản",
    "Làm đề nâng cao",
    "Tổng hợp kiến thức",
    "Ôn lại điểm yếu",
];

const SHORT_ASSIGNMENT_STAGES: &[&str] = &["Hiểu đề", "Làm bài", "Kiểm tra lại"];

impl Category {
    /// 所有类型，按界面显示顺序
    pub const ALL: [Category; 4] = [
        Category::Presentation,
        Category::Essay,
        Category::ExamPrep,
        Category::ShortAssignment,
    ];

    /// Ordered stage labels, one per working day
    pub fn template(self) -> &'static [&'static str] {
        match self {
            Category::Presentation => PRESENTATION_STAGES,
            Category::Essay => ESSAY_STAGES,
            Category::ExamPrep => EXAM_PREP_STAGES,
            Category::ShortAssignment => SHORT_ASSIGNMENT_STAGES,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Presentation => "Thuyết trình",
            Category::Essay => "Bài luận",
            Category::ExamPrep => "Ôn thi",
            Category::ShortAssignment => "Bài tập ngắn",
        }
    }

    /// 命令行使用的英文名
    pub fn key(self) -> &'static str {
        match self {
            Category::Presentation => "presentation",
            Category::Essay => "essay",
            Category::ExamPrep => "exam-prep",
            Category::ShortAssignment => "short-assignment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = GuardianError;

    /// Accepts the CLI key, the English variant name (any case, `-`/`_`
    /// ignored) or the Vietnamese display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        Category::ALL
            .into_iter()
            .find(|c| {
                c.display_name() == trimmed
                    || c.key().replace('-', "") == normalized
                    || format!("{:?}", c).to_lowercase() == normalized
            })
            .ok_or_else(|| GuardianError::InvalidCategory(trimmed.to_string()))
    }
}
