pub mod api;
pub mod courses;
pub mod progression;
pub mod quests;

use chrono::{DateTime, Duration, Utc};

/// Everything the dialogue carries for one player between messages.
/// The backend owns the courses; the player snapshot and the daily quest
/// list live here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub player: Player,
    pub quests: Vec<Quest>,
}

impl Session {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            player: Player::starting(name),
            quests: vec![Quest {
                id: 1,
                title: "Изучить React Hooks".to_string(),
                description: "Пройди 3 урока по React Hooks и реши практические задачи"
                    .to_string(),
                experience_reward: 50,
                difficulty: QuestDifficulty::Medium,
                status: QuestStatus::Pending,
                assigned_date: now,
                deadline: now + Duration::days(1),
                category: "Программирование".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub intelligence: u32,
    pub discipline: u32,
    pub stamina: u32,
    pub available_points: u32,
    pub total_quests_completed: u32,
}

impl Player {
    /// Snapshot a fresh player starts from until the backend syncs one.
    pub fn starting(name: String) -> Self {
        Self {
            id: 1,
            name,
            level: 5,
            experience: 245,
            experience_to_next_level: 500,
            intelligence: 12,
            discipline: 8,
            stamina: 10,
            available_points: 2,
            total_quests_completed: 23,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub experience_reward: u32,
    pub difficulty: QuestDifficulty,
    pub status: QuestStatus,
    pub assigned_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Boss,
}

impl QuestDifficulty {
    pub fn label(&self) -> &'static str {
        match self {
            QuestDifficulty::Easy => "ЛЁГКИЙ",
            QuestDifficulty::Medium => "СРЕДНИЙ",
            QuestDifficulty::Hard => "СЛОЖНЫЙ",
            QuestDifficulty::Boss => "БОСС",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: CourseCategory,
    pub goal: String,
    pub current_level: CourseLevel,
    pub target_level: CourseLevel,
    pub duration: u32,
    pub difficulty: CourseDifficulty,
    pub progress: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub estimated_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseCategory {
    #[default]
    Study,
    Fitness,
    Creative,
    Personal,
    Other,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 5] = [
        CourseCategory::Study,
        CourseCategory::Fitness,
        CourseCategory::Creative,
        CourseCategory::Personal,
        CourseCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CourseCategory::Study => "Учеба",
            CourseCategory::Fitness => "Фитнес",
            CourseCategory::Creative => "Творчество",
            CourseCategory::Personal => "Личное",
            CourseCategory::Other => "Другое",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CourseCategory::Study => "🎓",
            CourseCategory::Fitness => "💪",
            CourseCategory::Creative => "🎨",
            CourseCategory::Personal => "🌟",
            CourseCategory::Other => "🔧",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 4] = [
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
        CourseLevel::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Начинающий",
            CourseLevel::Intermediate => "Средний",
            CourseLevel::Advanced => "Продвинутый",
            CourseLevel::Expert => "Эксперт",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl CourseDifficulty {
    pub const ALL: [CourseDifficulty; 3] = [
        CourseDifficulty::Easy,
        CourseDifficulty::Medium,
        CourseDifficulty::Hard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CourseDifficulty::Easy => "Легкий",
            CourseDifficulty::Medium => "Средний",
            CourseDifficulty::Hard => "Сложный",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.label() == label)
    }
}

/// Payload for POST /courses. Every field is required, tags may be empty.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub category: CourseCategory,
    pub goal: String,
    pub current_level: CourseLevel,
    pub target_level: CourseLevel,
    pub duration: u32,
    pub difficulty: CourseDifficulty,
    pub tags: Vec<String>,
    pub estimated_hours: u32,
}

/// One course-creation form in flight. Fields fill front to back, one
/// message per field; `next_step` names the first hole.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CourseDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CourseCategory>,
    pub goal: Option<String>,
    pub current_level: Option<CourseLevel>,
    pub target_level: Option<CourseLevel>,
    pub duration: Option<u32>,
    pub difficulty: Option<CourseDifficulty>,
    pub tags: Vec<String>,
    pub tags_done: bool,
    pub estimated_hours: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStep {
    Title,
    Description,
    Category,
    Goal,
    CurrentLevel,
    TargetLevel,
    Duration,
    Difficulty,
    Tags,
    EstimatedHours,
    Done,
}

impl CourseDraft {
    pub fn next_step(&self) -> DraftStep {
        if self.title.is_none() {
            return DraftStep::Title;
        }
        if self.description.is_none() {
            return DraftStep::Description;
        }
        if self.category.is_none() {
            return DraftStep::Category;
        }
        if self.goal.is_none() {
            return DraftStep::Goal;
        }
        if self.current_level.is_none() {
            return DraftStep::CurrentLevel;
        }
        if self.target_level.is_none() {
            return DraftStep::TargetLevel;
        }
        if self.duration.is_none() {
            return DraftStep::Duration;
        }
        if self.difficulty.is_none() {
            return DraftStep::Difficulty;
        }
        if !self.tags_done {
            return DraftStep::Tags;
        }
        if self.estimated_hours.is_none() {
            return DraftStep::EstimatedHours;
        }
        DraftStep::Done
    }

    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn into_request(self) -> Option<CreateCourseRequest> {
        Some(CreateCourseRequest {
            title: self.title?,
            description: self.description?,
            category: self.category?,
            goal: self.goal?,
            current_level: self.current_level?,
            target_level: self.target_level?,
            duration: self.duration?,
            difficulty: self.difficulty?,
            tags: self.tags,
            estimated_hours: self.estimated_hours?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_fills_front_to_back() {
        let mut draft = CourseDraft::default();
        assert_eq!(draft.next_step(), DraftStep::Title);

        draft.title = Some("Изучение React".to_string());
        assert_eq!(draft.next_step(), DraftStep::Description);

        draft.description = Some("Курс по React".to_string());
        draft.category = Some(CourseCategory::Study);
        draft.goal = Some("Написать приложение".to_string());
        draft.current_level = Some(CourseLevel::Beginner);
        draft.target_level = Some(CourseLevel::Intermediate);
        draft.duration = Some(30);
        draft.difficulty = Some(CourseDifficulty::Medium);
        assert_eq!(draft.next_step(), DraftStep::Tags);

        draft.tags_done = true;
        assert_eq!(draft.next_step(), DraftStep::EstimatedHours);

        draft.estimated_hours = Some(50);
        assert_eq!(draft.next_step(), DraftStep::Done);

        let request = draft.into_request().unwrap();
        assert_eq!(request.title, "Изучение React");
        assert_eq!(request.duration, 30);
    }

    #[test]
    fn test_draft_tags_deduplicated() {
        let mut draft = CourseDraft::default();
        draft.add_tag("react");
        draft.add_tag(" react ");
        draft.add_tag("frontend");
        draft.add_tag("");
        assert_eq!(draft.tags, vec!["react", "frontend"]);
    }

    #[test]
    fn test_incomplete_draft_makes_no_request() {
        let mut draft = CourseDraft::default();
        draft.title = Some("Тренировка воркаут".to_string());
        assert!(draft.into_request().is_none());
    }

    #[test]
    fn test_labels_round_trip() {
        for category in CourseCategory::ALL {
            assert_eq!(CourseCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(CourseCategory::from_label("Все"), None);
        assert_eq!(CourseLevel::from_label("Эксперт"), Some(CourseLevel::Expert));
        assert_eq!(
            CourseDifficulty::from_label("Сложный"),
            Some(CourseDifficulty::Hard)
        );
    }
}
