use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::blocks::Task;
use crate::ledger::DailyGoal;

/// Planned versus completed minutes for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteTotals {
    pub planned: u32,
    pub completed: u32,
}

impl MinuteTotals {
    fn record(&mut self, task: &Task) {
        self.planned += task.duration_min;
        if task.completed {
            self.completed += task.duration_min;
        }
    }
}

/// Completion and time roll-up for the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAnalytics {
    /// Keyed by task tag.
    pub time_by_category: BTreeMap<String, MinuteTotals>,
    /// Keyed by goal title; goals sharing a title are merged.
    pub time_by_goal: BTreeMap<String, MinuteTotals>,
    pub total_planned_min: u32,
    pub total_completed_min: u32,
    /// `round(completed / planned * 100)` over minutes.
    pub completion_pct: u32,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// `round(completed / total * 100)` over task counts.
    pub productivity_score: u32,
}

impl DailyAnalytics {
    /// Aggregate block tasks and goal subtasks.
    pub fn compute<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        goals: &[DailyGoal],
    ) -> Self {
        let mut report = Self::default();

        for task in tasks {
            report
                .time_by_category
                .entry(task.tag.clone())
                .or_default()
                .record(task);
            report.total_planned_min += task.duration_min;
            report.total_tasks += 1;
            if task.completed {
                report.total_completed_min += task.duration_min;
                report.completed_tasks += 1;
            }
        }

        for goal in goals {
            let totals = report.time_by_goal.entry(goal.title.clone()).or_default();
            for subtask in &goal.subtasks {
                totals.record(subtask);
            }
        }

        report.completion_pct = percent(report.total_completed_min as u64, report.total_planned_min as u64);
        report.productivity_score = percent(report.completed_tasks as u64, report.total_tasks as u64);
        report
    }
}

/// `round(part / whole * 100)`, or 0 for an empty whole.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::TaskOrigin;

    fn task(tag: &str, minutes: u32, completed: bool) -> Task {
        Task {
            id: format!("{tag}-{minutes}"),
            title: tag.into(),
            duration_min: minutes,
            color: "#3b82f6".into(),
            tag: tag.into(),
            completed,
            started_at: None,
            ended_at: None,
            origin: TaskOrigin::Manual,
        }
    }

    #[test]
    fn groups_by_tag() {
        let tasks = [task("Work", 30, true), task("Work", 20, false), task("Health", 10, true)];
        let report = DailyAnalytics::compute(&tasks, &[]);

        assert_eq!(
            report.time_by_category["Work"],
            MinuteTotals { planned: 50, completed: 30 }
        );
        assert_eq!(report.total_planned_min, 60);
        assert_eq!(report.total_completed_min, 40);
        assert_eq!(report.completion_pct, 67);
        assert_eq!(report.completed_tasks, 2);
        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.productivity_score, 67);
    }

    #[test]
    fn groups_goal_subtasks_by_title() {
        let goals = vec![
            DailyGoal {
                id: "g1".into(),
                title: "Fitness".into(),
                completed: false,
                subtasks: vec![task("Health", 30, true)],
            },
            DailyGoal {
                id: "g2".into(),
                title: "Fitness".into(),
                completed: false,
                subtasks: vec![task("Health", 15, false)],
            },
            DailyGoal {
                id: "g3".into(),
                title: "Empty".into(),
                completed: true,
                subtasks: vec![],
            },
        ];
        let report = DailyAnalytics::compute(std::iter::empty(), &goals);

        assert_eq!(
            report.time_by_goal["Fitness"],
            MinuteTotals { planned: 45, completed: 30 }
        );
        assert_eq!(report.time_by_goal["Empty"], MinuteTotals::default());
        // Subtasks are not block tasks.
        assert_eq!(report.total_planned_min, 0);
    }

    #[test]
    fn empty_day_is_zero_percent() {
        let report = DailyAnalytics::compute(std::iter::empty(), &[]);
        assert_eq!(report.completion_pct, 0);
        assert_eq!(report.productivity_score, 0);
        assert_eq!(percent(1, 3), 33);
    }
}
