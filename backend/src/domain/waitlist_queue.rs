//! # Waitlist queue
//!
//! The waitlist is one FIFO queue per gender. An entry's rank is its 1-based
//! position in its gender segment ordered by submission time, with the
//! storage insertion sequence breaking ties. Color preference is ignored
//! when ranking and only matters for duplicate detection: a phone number
//! may hold one entry per color preference within a segment.

use std::collections::BTreeMap;

use shared::{ColorPreference, Gender};

use super::models::waitlist::{DomainWaitlistEntry, PhoneNumber};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub entry: DomainWaitlistEntry,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePosition {
    pub segment: Gender,
    pub color_preference: ColorPreference,
    pub rank: u32,
}

/// Rank every entry within its gender segment. The result is ordered by
/// segment (male, then female), then rank.
pub fn rank_segments(entries: Vec<DomainWaitlistEntry>) -> Vec<RankedEntry> {
    let mut segments: BTreeMap<Gender, Vec<DomainWaitlistEntry>> = BTreeMap::new();
    for entry in entries {
        segments.entry(entry.gender_preference).or_default().push(entry);
    }

    let mut ranked = Vec::new();
    for (_, mut segment) in segments {
        segment.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        ranked.extend(segment.into_iter().enumerate().map(|(i, entry)| RankedEntry {
            entry,
            rank: i as u32 + 1,
        }));
    }
    ranked
}

/// Every place in line held by `phone`, in segment then rank order
pub fn positions_for(ranked: &[RankedEntry], phone: &PhoneNumber) -> Vec<QueuePosition> {
    ranked
        .iter()
        .filter(|r| r.entry.phone == *phone)
        .map(|r| QueuePosition {
            segment: r.entry.gender_preference,
            color_preference: r.entry.color_preference,
            rank: r.rank,
        })
        .collect()
}

/// Human-readable summary of a caller's positions
pub fn describe_positions(positions: &[QueuePosition]) -> String {
    if positions.is_empty() {
        return "No registrations found for this phone number.".to_string();
    }

    let mut sections = Vec::new();
    for (gender, heading) in [(Gender::Male, "Male Waitlist:"), (Gender::Female, "Female Waitlist:")] {
        let lines: Vec<String> = positions
            .iter()
            .filter(|p| p.segment == gender)
            .map(|p| match p.color_preference {
                ColorPreference::Any => format!("  #{} (any color)", p.rank),
                color => format!("  #{} ({})", p.rank, color),
            })
            .collect();
        if !lines.is_empty() {
            sections.push(format!("{}\n{}", heading, lines.join("\n")));
        }
    }
    sections.join("\n\n")
}
