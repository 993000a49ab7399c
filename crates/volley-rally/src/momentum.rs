//! Point streaks in match order

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Winning,
    Losing,
}

/// Streak statistics over a sequence of point outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MomentumSummary {
    pub points: usize,
    pub longest_winning_streak: usize,
    pub longest_losing_streak: usize,
    pub current_streak: usize,
    pub current_kind: Option<StreakKind>,
    /// Streaks of either kind reaching [`MomentumSummary::RUN_LENGTH`]
    pub runs: usize,
}

impl MomentumSummary {
    pub const RUN_LENGTH: usize = 3;

    /// Summarize outcomes (`true` = point won) in the order played
    pub fn from_outcomes<I: IntoIterator<Item = bool>>(outcomes: I) -> Self {
        let mut summary = Self::default();
        let mut current: Option<(bool, usize)> = None;

        for won in outcomes {
            summary.points += 1;
            current = match current {
                Some((kind, len)) if kind == won => Some((kind, len + 1)),
                Some((kind, len)) => {
                    summary.close(kind, len);
                    Some((won, 1))
                }
                None => Some((won, 1)),
            };
        }

        if let Some((kind, len)) = current {
            summary.close(kind, len);
            summary.current_streak = len;
            summary.current_kind = Some(if kind {
                StreakKind::Winning
            } else {
                StreakKind::Losing
            });
        }
        summary
    }

    fn close(&mut self, won: bool, len: usize) {
        if won {
            self.longest_winning_streak = self.longest_winning_streak.max(len);
        } else {
            self.longest_losing_streak = self.longest_losing_streak.max(len);
        }
        if len >= Self::RUN_LENGTH {
            self.runs += 1;
        }
    }
}
