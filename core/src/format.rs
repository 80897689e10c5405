//! Announcement text for the outbound feed.
//!
//! One template covers the whole lifecycle: the pending announcement is
//! later edited in place to show the terminal status.

use crate::suit::Suit;

/// Offset-indexed win labels shown when a prediction resolves.
pub const WIN_LABELS: [&str; 4] = ["✅0️⃣", "✅1️⃣", "✅2️⃣", "✅3️⃣"];

/// Display status of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementStatus {
    Pending,
    /// Won at the given verification offset (0..=3).
    Won(u8),
    Lost,
    Expired,
}

pub fn format_announcement(number: u64, suit: Suit, status: AnnouncementStatus) -> String {
    let base = format!(
        "🤖 Presage\n🎰 Prediction #{number}\n🎯 Suit: {suit}\n📊 Status: "
    );

    match status {
        AnnouncementStatus::Pending => base + "⏳ Pending",
        AnnouncementStatus::Won(offset) => {
            let label = WIN_LABELS
                .get(offset as usize)
                .copied()
                .unwrap_or(WIN_LABELS[0]);
            format!("{base}{label} WON")
        }
        AnnouncementStatus::Lost => base + "❌ LOST",
        AnnouncementStatus::Expired => base + "⏹️ Expired",
    }
}
