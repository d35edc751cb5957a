//! Cumulative progress domain model.
//!
//! Gamification state that outlives individual sessions: total points, the
//! level derived from them, unlocked badges, and an award history.

use serde::{Deserialize, Serialize};

/// One entry in the award history, appended on every point award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// When the award happened (RFC 3339)
    pub date: String,
    /// Point total after the award
    pub points: u64,
    /// Level after the award
    pub level: u32,
}

/// Cumulative progress across all sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Total points earned
    #[serde(default)]
    pub points: u64,
    /// Level derived from points (100 points per level)
    #[serde(default = "default_level")]
    pub level: u32,
    /// Unlocked badges, in unlock order, no duplicates
    #[serde(default)]
    pub badges: Vec<String>,
    /// Session ids that have already been credited
    #[serde(default)]
    pub completed: Vec<String>,
    /// Award history
    #[serde(default)]
    pub history: Vec<ProgressEntry>,
}

fn default_level() -> u32 {
    1
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            badges: Vec::new(),
            completed: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl ProgressRecord {
    /// Level a point total maps to.
    pub fn level_for(points: u64) -> u32 {
        (points / 100 + 1) as u32
    }

    /// Adds points, recomputes the level, and appends a history entry.
    pub fn add_points(&mut self, amount: u64) {
        self.points += amount;
        self.level = Self::level_for(self.points);
        self.history.push(ProgressEntry {
            date: chrono::Utc::now().to_rfc3339(),
            points: self.points,
            level: self.level,
        });
    }

    /// Unlocks a badge. Duplicate unlocks are no-ops.
    pub fn add_badge(&mut self, badge: &str) {
        if !self.badges.iter().any(|b| b == badge) {
            self.badges.push(badge.to_string());
        }
    }

    /// Records an id as credited. Duplicate marks are no-ops.
    pub fn mark_completed(&mut self, id: &str) {
        if !self.is_completed(id) {
            self.completed.push(id.to_string());
        }
    }

    /// True when the id has already been credited.
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }
}
