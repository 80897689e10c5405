//! Outcome tallies for resolved predictions.
//!
//! Counters only ever grow for the process lifetime and are touched solely
//! on terminal win/loss resolution. Expiry never counts.

/// Number of verification steps a prediction gets (offsets 0..=3).
pub const CHECK_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeLedger {
    pub total: u64,
    pub wins: u64,
    pub losses: u64,
    /// Wins broken down by the offset at which the suit matched.
    pub wins_by_offset: [u64; CHECK_STEPS],
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_win(&mut self, offset: u8) {
        self.total += 1;
        self.wins += 1;
        if let Some(slot) = self.wins_by_offset.get_mut(offset as usize) {
            *slot += 1;
        }
    }

    pub fn record_loss(&mut self) {
        self.total += 1;
        self.losses += 1;
    }

    pub fn win_rate_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64 * 100.0
        }
    }

    /// Human-readable tally report for the administrator.
    pub fn report(&self) -> String {
        if self.total == 0 {
            return "📊 No predictions resolved yet".to_string();
        }

        let mut out = format!(
            "📊 **RESULTS**\n\n🎯 Total: {}\n✅ Wins: {} ({:.1}%)\n❌ Losses: {}\n\n**Wins by step:**\n",
            self.total,
            self.wins,
            self.win_rate_percent(),
            self.losses,
        );
        for (offset, count) in self.wins_by_offset.iter().enumerate() {
            out.push_str(&format!("• step {offset} (N+{offset}): {count}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wins_and_losses_accumulate() {
        let mut ledger = OutcomeLedger::new();
        ledger.record_win(0);
        ledger.record_win(2);
        ledger.record_loss();

        assert_eq!(ledger.total, 3);
        assert_eq!(ledger.wins, 2);
        assert_eq!(ledger.losses, 1);
        assert_eq!(ledger.wins_by_offset, [1, 0, 1, 0]);
    }

    #[test]
    fn empty_report_is_distinct() {
        assert!(OutcomeLedger::new().report().contains("No predictions"));
    }

    #[test]
    fn report_includes_rate_and_breakdown() {
        let mut ledger = OutcomeLedger::new();
        ledger.record_win(1);
        ledger.record_loss();
        let report = ledger.report();
        assert!(report.contains("50.0%"));
        assert!(report.contains("step 1 (N+1): 1"));
    }
}
