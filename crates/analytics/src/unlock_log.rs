use crate::achievements::AchievementProgress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub achievement_id: String,
    pub unlocked_on: NaiveDate,
}

/// Append-only record of when each achievement was first seen unlocked.
///
/// The evaluator stays stateless; callers feed its output here after each
/// evaluation. Entries are never removed, even if an achievement later reads as
/// locked again (e.g. after trades are deleted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockLog {
    entries: Vec<UnlockRecord>,
}

impl UnlockLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[UnlockRecord] {
        &self.entries
    }

    pub fn first_unlocked(&self, achievement_id: &str) -> Option<NaiveDate> {
        self.entries
            .iter()
            .find(|r| r.achievement_id == achievement_id)
            .map(|r| r.unlocked_on)
    }

    /// Appends every unlocked achievement not yet in the log and returns their ids.
    pub fn record(&mut self, achievements: &[AchievementProgress], on: NaiveDate) -> Vec<String> {
        let mut newly_unlocked = Vec::new();
        for achievement in achievements.iter().filter(|a| a.is_unlocked) {
            if self.first_unlocked(&achievement.id).is_some() {
                continue;
            }
            self.entries.push(UnlockRecord {
                achievement_id: achievement.id.clone(),
                unlocked_on: on,
            });
            newly_unlocked.push(achievement.id.clone());
        }
        if !newly_unlocked.is_empty() {
            tracing::info!(count = newly_unlocked.len(), date = %on, "Recorded new achievement unlocks");
        }
        newly_unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementCategory;

    fn progress(id: &str, is_unlocked: bool) -> AchievementProgress {
        AchievementProgress {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            category: AchievementCategory::Milestones,
            current: 0.0,
            target: 1.0,
            progress: if is_unlocked { 100.0 } else { 0.0 },
            is_unlocked,
            formatted_current: String::new(),
            formatted_target: String::new(),
        }
    }

    #[test]
    fn keeps_the_first_unlock_date() {
        let day1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut log = UnlockLog::new();

        let new = log.record(&[progress("first_trade", true), progress("trades_100", false)], day1);
        assert_eq!(new, vec!["first_trade".to_string()]);

        let new = log.record(&[progress("first_trade", true), progress("trades_100", true)], day2);
        assert_eq!(new, vec!["trades_100".to_string()]);
        assert_eq!(log.first_unlocked("first_trade"), Some(day1));

        // A relock does not erase history.
        log.record(&[progress("first_trade", false)], day2);
        assert_eq!(log.entries().len(), 2);
    }
}
