//! Viewing profiles and the per-profile watch log behind the
//! "Continue watching" row.

use std::collections::HashMap;

use crate::family::FamilyMember;

#[derive(Debug, Clone)]
pub struct ViewerProfile {
    pub id: u64,
    pub name: String,
    pub initials: String,
    /// Index into the theme's avatar accent palette.
    pub color: usize,
}

/// Every household member gets a profile.
pub fn from_roster(members: &[FamilyMember]) -> Vec<ViewerProfile> {
    members
        .iter()
        .enumerate()
        .map(|(i, m)| ViewerProfile {
            id: m.id,
            name: m.name.clone(),
            initials: m.initials.clone(),
            color: i,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchProgress {
    pub title: String,
    pub detail: String,
    pub percent: u8,
}

/// In-memory watch history, keyed by profile.
#[derive(Debug, Default)]
pub struct WatchLog {
    entries: HashMap<u64, Vec<WatchProgress>>,
}

impl WatchLog {
    /// Seeds the demo "Continue watching" rows for the first profile.
    pub fn demo(first_profile: u64) -> Self {
        let mut log = Self::default();
        for (title, detail, percent) in [
            ("The Last Drop", "Season 1, Episode 3", 45),
            ("Night City", "Season 2, Episode 5", 78),
            ("Shadows of the Past", "Season 1, Episode 1", 23),
        ] {
            log.record(first_profile, title, detail, percent);
        }
        log
    }

    /// Records progress, replacing an earlier entry for the same title and
    /// keeping the newest first.
    pub fn record(&mut self, profile: u64, title: &str, detail: &str, percent: u8) {
        let entries = self.entries.entry(profile).or_default();
        entries.retain(|e| e.title != title);
        entries.insert(
            0,
            WatchProgress {
                title: title.to_string(),
                detail: detail.to_string(),
                percent: percent.min(100),
            },
        );
    }

    pub fn for_profile(&self, profile: u64) -> &[WatchProgress] {
        self.entries.get(&profile).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Roster;
    use chrono::NaiveDate;

    #[test]
    fn every_member_becomes_a_profile() {
        let roster = Roster::demo(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let profiles = from_roster(roster.members());
        assert_eq!(profiles.len(), roster.len());
        assert_eq!(profiles[0].name, "Alexander Petrov");
        assert_eq!(profiles[0].initials, "AP");
    }

    #[test]
    fn record_replaces_and_front_loads() {
        let mut log = WatchLog::default();
        log.record(1, "Night City", "Season 1, Episode 1", 10);
        log.record(1, "The Last Drop", "Season 1, Episode 2", 50);
        log.record(1, "Night City", "Season 1, Episode 2", 30);

        let entries = log.for_profile(1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Night City");
        assert_eq!(entries[0].percent, 30);
        assert!(log.for_profile(2).is_empty());
    }

    #[test]
    fn percent_is_clamped() {
        let mut log = WatchLog::default();
        log.record(1, "Star Route", "Feature film", 250);
        assert_eq!(log.for_profile(1)[0].percent, 100);
    }
}
