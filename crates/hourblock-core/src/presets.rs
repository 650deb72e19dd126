//! Task duration choices offered to the user.

use serde::{Deserialize, Serialize};

/// Durations always available.
pub const DEFAULT_DURATIONS: [u32; 9] = [3, 5, 10, 15, 20, 25, 30, 45, 60];

/// Longest custom preset accepted, in minutes.
pub const MAX_PRESET_MIN: u32 = 120;

/// Built-in durations plus user additions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPresets {
    custom: Vec<u32>,
}

impl DurationPresets {
    /// Every offered duration, sorted and de-duplicated.
    pub fn all(&self) -> Vec<u32> {
        let mut all: Vec<u32> = DEFAULT_DURATIONS.iter().chain(&self.custom).copied().collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn custom(&self) -> &[u32] {
        &self.custom
    }

    /// Add a preset in `1..=120` that is not offered yet. Returns whether it
    /// was added.
    pub fn add(&mut self, minutes: u32) -> bool {
        if !(1..=MAX_PRESET_MIN).contains(&minutes) || self.all().contains(&minutes) {
            return false;
        }
        self.custom.push(minutes);
        self.custom.sort_unstable();
        true
    }

    /// Remove a custom preset. Built-in durations cannot be removed.
    pub fn remove(&mut self, minutes: u32) -> bool {
        let before = self.custom.len();
        self.custom.retain(|&m| m != minutes);
        self.custom.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_skips_duplicates_and_out_of_range() {
        let mut presets = DurationPresets::default();
        assert!(presets.add(90));
        assert!(presets.add(7));
        assert!(!presets.add(25));
        assert!(!presets.add(90));
        assert!(!presets.add(0));
        assert!(!presets.add(121));
        assert_eq!(presets.custom(), &[7, 90]);
        assert_eq!(presets.all(), vec![3, 5, 7, 10, 15, 20, 25, 30, 45, 60, 90]);
    }

    #[test]
    fn remove_only_touches_custom() {
        let mut presets = DurationPresets::default();
        presets.add(50);
        assert!(presets.remove(50));
        assert!(!presets.remove(25));
        assert_eq!(presets.all(), DEFAULT_DURATIONS.to_vec());
    }
}
