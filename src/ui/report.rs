use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::dashboard::{ClientState, Section};

/// Plain-text rendition of every section, for one-shot commands.
pub fn snapshot_text(state: &ClientState, now: DateTime<Local>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Status: {} ({})", state.indicator.text(), state.toggle.label());
    let _ = writeln!(out);

    for section in Section::ALL {
        let _ = writeln!(out, "== {} ==", section.title());
        match section {
            Section::Dashboard => {
                let _ = writeln!(out, "Total value:  {}", state.summary.total_value);
                let _ = writeln!(out, "Daily change: {}", state.summary.daily_change);
                let _ = writeln!(out, "Top asset:    {}", state.summary.top_asset);
                let _ = writeln!(out, "Uptime:       {}", state.uptime(now));
                for card in &state.assets {
                    let _ = writeln!(out, "  {:<8} {}", card.asset, card.amount);
                }
            }
            Section::Trades => {
                for line in &state.trades {
                    let _ = writeln!(out, "{}", line);
                }
            }
            Section::Signals => {
                for card in &state.signals {
                    let _ = writeln!(out, "{}: {}", card.asset, card.lines().join(", "));
                }
            }
            Section::Logs => {
                if !state.logs.is_empty() {
                    let _ = writeln!(out, "{}", state.logs);
                }
            }
            Section::Settings => {
                for field in state.settings.fields() {
                    let _ = writeln!(out, "{:<22} {}", field.id.label(), field.output_text());
                }
            }
        }
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FeedSequencer;
    use std::sync::Arc;

    #[test]
    fn test_snapshot_lists_every_section() {
        let mut state = ClientState::new(Arc::new(FeedSequencer::new()), 5);
        state.trades = vec!["2024-03-01 10:00:00 - buy 1 XETHZUSD @ 3000".to_string()];

        let text = snapshot_text(&state, Local::now());
        for section in Section::ALL {
            assert!(text.contains(&format!("== {} ==", section.title())));
        }
        assert!(text.starts_with("Status: Offline (Start Trading)"));
        assert!(text.contains("buy 1 XETHZUSD"));
        assert!(text.contains("Max risk per trade"));
    }
}
