use chrono::{DateTime, Utc};

use crate::game::progression::apply_reward;
use crate::game::{Player, Quest, QuestStatus};

/// A quest past its deadline that was never completed. Evaluated on every
/// read, never written back to the quest.
pub fn is_expired(quest: &Quest, now: DateTime<Utc>) -> bool {
    quest.status == QuestStatus::Pending && quest.deadline < now
}

/// Whether the player may still complete this quest.
pub fn is_completable(quest: &Quest, now: DateTime<Utc>) -> bool {
    quest.status == QuestStatus::Pending && quest.deadline >= now
}

/// Marks a quest completed and credits its reward to the player.
///
/// Only a pending quest before its deadline goes through; anything else is
/// a no-op returning `false`, so calling this twice for the same id awards
/// the reward exactly once. Completed and failed quests never change again.
pub fn complete_quest(
    player: &mut Player,
    quests: &mut [Quest],
    quest_id: u64,
    now: DateTime<Utc>,
) -> bool {
    let quest = match quests.iter_mut().find(|q| q.id == quest_id) {
        Some(quest) => quest,
        None => return false,
    };
    if !is_completable(quest, now) {
        return false;
    }

    quest.status = QuestStatus::Completed;
    *player = apply_reward(player, quest.experience_reward);
    player.total_quests_completed += 1;
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestCounts {
    pub pending: usize,
    pub completed: usize,
    pub expired: usize,
}

/// Recomputed on every render; expired quests drop out of `pending` the
/// moment the deadline passes, and stored failures count as expired too.
pub fn quest_counts(quests: &[Quest], now: DateTime<Utc>) -> QuestCounts {
    let mut counts = QuestCounts::default();
    for quest in quests {
        match quest.status {
            QuestStatus::Pending if quest.deadline < now => counts.expired += 1,
            QuestStatus::Pending => counts.pending += 1,
            QuestStatus::Completed => counts.completed += 1,
            QuestStatus::Failed => counts.expired += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::game::{QuestDifficulty, Session};

    fn quest(id: u64, reward: u32, deadline: DateTime<Utc>) -> Quest {
        Quest {
            id,
            title: format!("Квест {}", id),
            description: String::new(),
            experience_reward: reward,
            difficulty: QuestDifficulty::Medium,
            status: QuestStatus::Pending,
            assigned_date: deadline - Duration::days(1),
            deadline,
            category: "Программирование".to_string(),
        }
    }

    #[test]
    fn test_completing_awards_reward_once() {
        let now = Utc::now();
        let mut session = Session::new("Студент".to_string(), now);
        let before = session.player.clone();

        assert!(complete_quest(
            &mut session.player,
            &mut session.quests,
            1,
            now
        ));
        assert_eq!(session.player.experience, before.experience + 50);
        assert_eq!(
            session.player.total_quests_completed,
            before.total_quests_completed + 1
        );
        assert_eq!(session.quests[0].status, QuestStatus::Completed);

        // Second call finds the quest already completed and does nothing.
        let settled = session.player.clone();
        assert!(!complete_quest(
            &mut session.player,
            &mut session.quests,
            1,
            now
        ));
        assert_eq!(session.player.experience, settled.experience);
        assert_eq!(
            session.player.total_quests_completed,
            settled.total_quests_completed
        );
    }

    #[test]
    fn test_expired_quest_cannot_be_completed() {
        let now = Utc::now();
        let mut player = Player::starting("Студент".to_string());
        let mut quests = vec![quest(7, 100, now - Duration::hours(1))];
        let before = player.clone();

        assert!(!complete_quest(&mut player, &mut quests, 7, now));
        assert_eq!(quests[0].status, QuestStatus::Pending);
        assert_eq!(player.experience, before.experience);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let now = Utc::now();
        let mut player = Player::starting("Студент".to_string());
        let mut quests = vec![quest(1, 10, now + Duration::days(1))];
        assert!(!complete_quest(&mut player, &mut quests, 99, now));
    }

    #[test]
    fn test_completion_can_level_up() {
        let now = Utc::now();
        let mut player = Player::starting("Студент".to_string());
        player.experience = 480;
        let mut quests = vec![quest(1, 50, now + Duration::days(1))];

        assert!(complete_quest(&mut player, &mut quests, 1, now));
        assert_eq!(player.level, 6);
        assert_eq!(player.experience, 30);
        assert_eq!(player.experience_to_next_level, 750);
    }

    #[test]
    fn test_counts_derived_from_deadline() {
        let now = Utc::now();
        let mut quests = vec![
            quest(1, 10, now + Duration::days(1)),
            quest(2, 10, now - Duration::days(1)),
            quest(3, 10, now + Duration::days(2)),
        ];
        quests[2].status = QuestStatus::Completed;

        let counts = quest_counts(&quests, now);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.expired, 1);

        assert!(is_expired(&quests[1], now));
        assert!(!is_completable(&quests[1], now));
        assert!(is_completable(&quests[0], now));
    }
}
