use chrono::{DateTime, Utc};

use crate::game::{Course, CourseCategory, CourseDifficulty, CourseLevel};

/// Category plus free-text search, as picked on the course screen.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CourseFilter {
    pub category: Option<CourseCategory>,
    pub search: String,
}

impl CourseFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_empty()
    }

    pub fn apply<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        filter_courses(courses, self.category, &self.search)
    }
}

/// Stable AND-filter over the course list. `None` matches every category,
/// the search term matches title or description as a case-insensitive
/// substring. Input order is preserved.
pub fn filter_courses<'a>(
    courses: &'a [Course],
    category: Option<CourseCategory>,
    search: &str,
) -> Vec<&'a Course> {
    let needle = search.to_lowercase();
    courses
        .iter()
        .filter(|course| {
            let matches_category = category.map_or(true, |wanted| course.category == wanted);
            let matches_search = course.title.to_lowercase().contains(&needle)
                || course.description.to_lowercase().contains(&needle);
            matches_category && matches_search
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseStats {
    pub total: usize,
    pub active: usize,
    pub avg_progress: u32,
    pub total_hours: u32,
}

/// Footer numbers for the course screen, always over the unfiltered list.
pub fn course_stats(courses: &[Course]) -> CourseStats {
    let total = courses.len();
    let progress_sum: u32 = courses.iter().map(|c| c.progress).sum();
    CourseStats {
        total,
        active: courses.iter().filter(|c| c.is_active).count(),
        avg_progress: if total > 0 {
            (progress_sum as f64 / total as f64).round() as u32
        } else {
            0
        },
        total_hours: courses.iter().map(|c| c.estimated_hours).sum(),
    }
}

/// Demonstration dataset shown when the backend cannot be reached.
pub fn demo_courses(now: DateTime<Utc>) -> Vec<Course> {
    vec![
        Course {
            id: 1,
            title: "Изучение React".to_string(),
            description: "Полный курс по современному React с hooks и TypeScript".to_string(),
            category: CourseCategory::Study,
            goal: "Создать полноценное React приложение".to_string(),
            current_level: CourseLevel::Beginner,
            target_level: CourseLevel::Intermediate,
            duration: 30,
            difficulty: CourseDifficulty::Medium,
            progress: 45,
            is_active: true,
            created_at: now,
            updated_at: now,
            tags: vec![
                "react".to_string(),
                "javascript".to_string(),
                "frontend".to_string(),
            ],
            estimated_hours: 50,
        },
        Course {
            id: 2,
            title: "Тренировка воркаут".to_string(),
            description: "Программа тренировок для развития силы и выносливости".to_string(),
            category: CourseCategory::Fitness,
            goal: "Научиться подтягиваться 15 раз".to_string(),
            current_level: CourseLevel::Beginner,
            target_level: CourseLevel::Advanced,
            duration: 60,
            difficulty: CourseDifficulty::Hard,
            progress: 20,
            is_active: true,
            created_at: now,
            updated_at: now,
            tags: vec![
                "workout".to_string(),
                "strength".to_string(),
                "calisthenics".to_string(),
            ],
            estimated_hours: 80,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let courses = demo_courses(Utc::now());
        let shown = filter_courses(&courses, None, "");
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].id, 1);
        assert_eq!(shown[1].id, 2);
    }

    #[test]
    fn test_category_and_search_are_anded() {
        let courses = demo_courses(Utc::now());

        let fitness = filter_courses(&courses, Some(CourseCategory::Fitness), "трениров");
        assert_eq!(fitness.len(), 1);
        assert_eq!(fitness[0].title, "Тренировка воркаут");

        // Same term under a non-matching category finds nothing.
        let study = filter_courses(&courses, Some(CourseCategory::Study), "трениров");
        assert!(study.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let courses = demo_courses(Utc::now());
        assert_eq!(filter_courses(&courses, None, "ТРЕНИРОВ").len(), 1);
        assert_eq!(filter_courses(&courses, None, "react").len(), 1);
        assert_eq!(filter_courses(&courses, None, "REACT").len(), 1);
    }

    #[test]
    fn test_search_covers_description_too() {
        let courses = demo_courses(Utc::now());
        let by_description = filter_courses(&courses, None, "typescript");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, 1);
    }

    #[test]
    fn test_stats_over_unfiltered_list() {
        let mut courses = demo_courses(Utc::now());
        courses[1].is_active = false;

        let stats = course_stats(&courses);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        // (45 + 20) / 2 = 32.5, rounded to 33
        assert_eq!(stats.avg_progress, 33);
        assert_eq!(stats.total_hours, 130);
    }

    #[test]
    fn test_stats_empty_list() {
        assert_eq!(course_stats(&[]), CourseStats::default());
    }
}
