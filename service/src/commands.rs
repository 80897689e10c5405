//! Administrative command console.
//!
//! Commands are parsed the same way the readline loop in `main.rs` feeds
//! them: `shlex`-split, then handed to clap. Every handler reports back as
//! text; unexpected failures become a generic failure line instead of
//! taking the process down.

use crate::feed::AnnouncementFeed;
use crate::runtime;
use crate::state::SharedState;
use chrono::Local;
use clap::{Parser, Subcommand};
use presage_core::error::ControlError;
use presage_core::table::parser::parse_table_text;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "presage admin console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load or replace the lookup table; the next input line is table
    /// text or a path to a table file (`cancel` aborts)
    Pre,
    /// Show the loaded lookup table
    ShowDb,
    /// Clear the lookup table
    ClearDb,
    /// Pause predictions, with filler announcements (0 or no minutes =
    /// indefinite)
    Stop { minutes: Option<u64> },
    /// Resume predictions
    Resume,
    /// Show system state
    Status,
    /// Show win/loss tallies
    Report,
    /// Clear the prediction slot and leave table-load mode
    Reset,
    /// Clear a stuck prediction slot
    ForceUnlock,
    /// Manage filler messages
    Jokes {
        #[command(subcommand)]
        action: Option<JokesCommand>,
    },
    /// Inject a raw source-feed message (for piped transports)
    Feed { text: Vec<String> },
    Exit,
}

#[derive(Subcommand)]
enum JokesCommand {
    /// List all filler messages
    List,
    /// Add a filler message
    Add { text: Vec<String> },
    /// Delete filler message by number (1-based)
    Del { index: usize },
    /// Replace filler message by number (1-based)
    Edit { index: usize, text: Vec<String> },
    /// Restore the default pool
    Reset,
}

/// Handle one console line. Returns `Ok(true)` when the console should
/// exit.
pub async fn respond(
    line: &str,
    state: SharedState,
    feed: Arc<dyn AnnouncementFeed>,
) -> Result<bool, String> {
    // Table-load mode intercepts lines until the payload is complete. Lines
    // accumulate so a multi-line paste arrives whole; `done` ends the
    // payload, and a first line naming an existing file loads immediately.
    if state.read().await.awaiting_table {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("cancel") {
            let mut s = state.write().await;
            s.awaiting_table = false;
            s.table_buffer.clear();
            println!("Table load cancelled.");
            return Ok(false);
        }

        let complete = {
            let mut s = state.write().await;
            if trimmed.eq_ignore_ascii_case("done") {
                !s.table_buffer.is_empty()
            } else if s.table_buffer.is_empty() && std::path::Path::new(trimmed).is_file() {
                s.table_buffer.push(trimmed.to_string());
                true
            } else {
                s.table_buffer.push(trimmed.to_string());
                false
            }
        };
        if complete {
            let reply = ingest_table_buffer(&state).await;
            println!("{reply}");
        }
        return Ok(false);
    }

    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "presage".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Pre) => {
            state.write().await.awaiting_table = true;
            println!(
                "📋 **Load lookup table**\n\n\
                 Enter table lines (or a path to a .txt file) in the format:\n\
                 6 [❤️]\n12 [♣️]\n18 [❤️]\n\n\
                 Finish with `done` on its own line.\n\
                 ⚠️ The current table will be replaced wholesale. Type `cancel` to abort."
            );
        }
        Some(Commands::ShowDb) => println!("{}", show_db(&state).await),
        Some(Commands::ClearDb) => println!("{}", clear_db(&state).await),
        Some(Commands::Stop { minutes }) => {
            let minutes = minutes.unwrap_or(0);
            match runtime::pause_service(&state, &feed, minutes).await {
                Ok(()) => {
                    let duration = if minutes > 0 {
                        format!("{minutes} min")
                    } else {
                        "indefinite".to_string()
                    };
                    println!("✅ Pause started — duration: {duration}");
                }
                Err(ControlError::AlreadyPaused) => println!("⚠️ A pause is already active!"),
                Err(e) => println!("❌ Command failed: {e}"),
            }
        }
        Some(Commands::Resume) => match runtime::resume_service(&state, &feed).await {
            Ok(()) => println!("▶️ Predictions resumed!"),
            Err(ControlError::NotPaused) => println!("ℹ️ The service is not paused."),
            Err(e) => println!("❌ Command failed: {e}"),
        },
        Some(Commands::Status) => println!("{}", status(&state).await),
        Some(Commands::Report) => println!("{}", state.read().await.cache.ledger.report()),
        Some(Commands::Reset) => {
            let mut s = state.write().await;
            s.awaiting_table = false;
            s.table_buffer.clear();
            let cancelled = s.cache.clear_record();
            match cancelled {
                Some(number) => println!("🔄 Reset. Slot freed (prediction #{number} cancelled)."),
                None => println!("🔄 Reset. Slot was already free."),
            }
        }
        Some(Commands::ForceUnlock) => {
            let cancelled = state.write().await.cache.clear_record();
            match cancelled {
                Some(number) => println!("🔓 Unlocked! #{number} cancelled. Slot free."),
                None => println!("ℹ️ No prediction in flight."),
            }
        }
        Some(Commands::Jokes { action }) => println!("{}", jokes(&state, action).await),
        Some(Commands::Feed { text }) => {
            runtime::process_source_text(&state, &feed, &text.join(" ")).await;
        }
        Some(Commands::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

/// Drain the accumulated `pre` payload. A single buffered line naming a
/// readable file is loaded from disk; anything else is inline table text.
async fn ingest_table_buffer(state: &SharedState) -> String {
    let text = {
        let mut s = state.write().await;
        s.awaiting_table = false;
        let lines = std::mem::take(&mut s.table_buffer);
        match lines.as_slice() {
            [path] => match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(_) => lines.join("\n"),
            },
            _ => lines.join("\n"),
        }
    };
    ingest_table_text(state, &text).await
}

async fn ingest_table_text(state: &SharedState, text: &str) -> String {
    let mut s = state.write().await;
    let (table, errors) = parse_table_text(text);
    if table.is_empty() {
        let mut reply =
            "❌ No valid entries found.\n\nExpected format:\n6 [❤️]\n12 [♣️]".to_string();
        if !errors.is_empty() {
            let shown: Vec<String> = errors.iter().take(10).cloned().collect();
            reply.push_str(&format!("\n\n⚠️ Errors:\n{}", shown.join("\n")));
        }
        return reply;
    }

    s.cache.table.replace(table);
    if let Err(e) = s.store.save(&s.cache.table) {
        tracing::error!("table save failed: {e}");
    }

    let Some((first, last)) = s.cache.table.bounds() else {
        return "❌ No valid entries found.".to_string();
    };
    let preview: Vec<String> = s
        .cache
        .table
        .iter()
        .take(8)
        .map(|(n, suit)| format!("#{n} {suit}"))
        .collect();
    let mut reply = format!(
        "✅ **Table replaced and saved**\n\n📋 Entries: {}\n📝 Range: #{first} → #{last}\n💾 Persisted across restarts\n\n**Preview:** {}",
        s.cache.table.len(),
        preview.join(", "),
    );
    if s.cache.table.len() > 8 {
        reply.push_str(&format!(" ... +{} more", s.cache.table.len() - 8));
    }
    if !errors.is_empty() {
        reply.push_str(&format!("\n\n⚠️ {} line(s) ignored", errors.len()));
    }
    reply
}

async fn show_db(state: &SharedState) -> String {
    let s = state.read().await;
    if s.cache.table.is_empty() {
        return "📭 Table empty. Use `pre` to load data.".to_string();
    }
    format!(
        "📊 **Table ({} entries)**\n\n{}",
        s.cache.table.len(),
        s.cache.table.to_listing(),
    )
}

async fn clear_db(state: &SharedState) -> String {
    let mut s = state.write().await;
    let count = s.cache.table.len();
    s.cache.table.clear();
    if let Err(e) = s.store.save(&s.cache.table) {
        tracing::error!("table save failed: {e}");
    }
    format!("🗑️ Table cleared ({count} entries removed).")
}

async fn status(state: &SharedState) -> String {
    let s = state.read().await;
    let cache = &s.cache;
    let now = Local::now().naive_local();

    let mut msg = String::from("📊 **SYSTEM STATE**\n\n");
    match cache.record() {
        Some(r) => {
            msg.push_str("🔒 Slot: 🔴 BUSY\n");
            msg.push_str(&format!(
                "   └ Prediction #{} in flight\n   └ Step: {}/3\n   └ Trigger: #{}\n   └ Suit: {}\n   └ Awaiting: #{}\n",
                r.number,
                r.offset,
                r.trigger,
                r.suit,
                r.expected_number(),
            ));
        }
        None => msg.push_str("🔒 Slot: 🟢 FREE\n"),
    }

    let mut paused = if cache.pause.is_paused {
        "🔴 YES".to_string()
    } else {
        "🟢 NO".to_string()
    };
    if let Some(minutes) = cache.pause.remaining_minutes(now) {
        paused.push_str(&format!(" ({minutes} min left)"));
    }
    msg.push_str(&format!(
        "🛑 Paused: {paused}\n📩 Last source: #{}\n📋 Table: {} entries\n📏 Trigger distance: source + {}\n",
        cache.last_source_number,
        cache.table.len(),
        cache.settings.trigger_distance,
    ));

    if cache.table.is_empty() {
        msg.push_str("\n🎯 Upcoming: table empty — use `pre`\n");
    } else {
        let upcoming = cache.table.upcoming(cache.last_source_number, 5);
        if upcoming.is_empty() {
            msg.push_str(&format!(
                "\n🎯 Upcoming: none in table after #{}\n",
                cache.last_source_number
            ));
        } else {
            msg.push_str("\n🎯 **Upcoming predictions:**\n");
            for (n, suit) in upcoming {
                let trigger_at = n.saturating_sub(cache.settings.trigger_distance);
                msg.push_str(&format!("#{n} {suit}  (triggers at #{trigger_at})\n"));
            }
        }
    }
    msg
}

async fn jokes(state: &SharedState, action: Option<JokesCommand>) -> String {
    let mut s = state.write().await;
    match action {
        None => {
            let preview: Vec<String> = s
                .fillers
                .messages()
                .iter()
                .take(5)
                .enumerate()
                .map(|(i, j)| format!("{}. {}", i + 1, truncate(j, 60)))
                .collect();
            let mut msg = format!(
                "😄 **Fillers** ({} loaded)\n\nSubcommands: list, add <text>, del <n>, edit <n> <text>, reset\n\n**Preview:**\n{}",
                s.fillers.len(),
                preview.join("\n"),
            );
            if s.fillers.len() > 5 {
                msg.push_str(&format!("\n... and {} more", s.fillers.len() - 5));
            }
            msg
        }
        Some(JokesCommand::List) => {
            if s.fillers.is_empty() {
                return "📭 No fillers loaded".to_string();
            }
            s.fillers
                .messages()
                .iter()
                .enumerate()
                .map(|(i, j)| format!("{}. {j}", i + 1))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Some(JokesCommand::Add { text }) => {
            if text.is_empty() {
                return "📋 Usage: jokes add <text>".to_string();
            }
            s.fillers.add(text.join(" "));
            format!("✅ Filler added! (Total: {})", s.fillers.len())
        }
        Some(JokesCommand::Del { index }) => {
            match index.checked_sub(1).and_then(|i| s.fillers.remove(i)) {
                Some(removed) => format!("🗑️ Filler #{index} removed!\n\n{}", truncate(&removed, 100)),
                None => format!("❌ Invalid number (1-{})", s.fillers.len()),
            }
        }
        Some(JokesCommand::Edit { index, text }) => {
            if text.is_empty() {
                return "📋 Usage: jokes edit <number> <text>".to_string();
            }
            match index
                .checked_sub(1)
                .and_then(|i| s.fillers.edit(i, text.join(" ")))
            {
                Some(old) => format!(
                    "✏️ Filler #{index} updated!\n\n**Before:** {}\n\n**After:** {}",
                    truncate(&old, 80),
                    text.join(" "),
                ),
                None => format!("❌ Invalid number (1-{})", s.fillers.len()),
            }
        }
        Some(JokesCommand::Reset) => {
            s.fillers.reset_defaults();
            format!("🔄 Fillers restored ({} defaults)", s.fillers.len())
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServiceState;
    use presage_core::Suit;
    use presage_core::table::store::TableStore;
    use presage_types::ServiceConfig;

    fn test_state(tag: &str) -> SharedState {
        let store = TableStore::new(std::env::temp_dir().join(format!(
            "presage-commands-{}-{tag}.json",
            std::process::id()
        )));
        ServiceState::new(ServiceConfig::default(), store).shared()
    }

    #[tokio::test]
    async fn table_ingest_replaces_and_summarizes() {
        let state = test_state("ingest");
        state.write().await.cache.table.insert(999, Suit::Spades);

        let reply = ingest_table_text(&state, "6 [❤️]").await;
        assert!(reply.contains("Entries: 1"));

        let s = state.read().await;
        assert!(s.cache.table.contains(6));
        assert!(!s.cache.table.contains(999), "replace must be wholesale");
        let _ = std::fs::remove_file(s.store.path());
    }

    #[tokio::test]
    async fn bad_payload_reports_and_leaves_table_alone() {
        let state = test_state("bad");
        state.write().await.cache.table.insert(7, Suit::Hearts);

        let reply = ingest_table_text(&state, "nothing useful here").await;
        assert!(reply.contains("No valid entries"));
        assert!(state.read().await.cache.table.contains(7));
    }

    #[tokio::test]
    async fn multi_line_paste_accumulates_until_done() {
        let state = test_state("multiline");
        state.write().await.awaiting_table = true;
        let feed: Arc<dyn AnnouncementFeed> = Arc::new(crate::feed::LogFeed::new());

        for line in ["6 [❤️]", "12 [♣️]", "18 [♠️]", "done"] {
            respond(line, Arc::clone(&state), Arc::clone(&feed)).await.unwrap();
        }

        let s = state.read().await;
        assert!(!s.awaiting_table);
        assert!(s.table_buffer.is_empty());
        assert_eq!(s.cache.table.len(), 3);
        assert!(s.cache.table.contains(6));
        assert!(s.cache.table.contains(18));
        let _ = std::fs::remove_file(s.store.path());
    }

    #[tokio::test]
    async fn cancel_discards_buffered_table_lines() {
        let state = test_state("cancel");
        state.write().await.awaiting_table = true;
        let feed: Arc<dyn AnnouncementFeed> = Arc::new(crate::feed::LogFeed::new());

        respond("6 [❤️]", Arc::clone(&state), Arc::clone(&feed))
            .await
            .unwrap();
        respond("cancel", Arc::clone(&state), Arc::clone(&feed))
            .await
            .unwrap();

        let s = state.read().await;
        assert!(!s.awaiting_table);
        assert!(s.table_buffer.is_empty());
        assert!(s.cache.table.is_empty());
    }

    #[tokio::test]
    async fn status_shows_slot_and_upcoming() {
        let state = test_state("status");
        {
            let mut s = state.write().await;
            s.cache.table.insert(44, Suit::Clubs);
            s.cache.last_source_number = 40;
        }

        let msg = status(&state).await;
        assert!(msg.contains("🟢 FREE"));
        assert!(msg.contains("Last source: #40"));
        assert!(msg.contains("#44 ♣️"));
        assert!(msg.contains("(triggers at #42)"));
    }

    #[tokio::test]
    async fn jokes_management_round_trip() {
        let state = test_state("jokes");

        let reply = jokes(&state, Some(JokesCommand::Add { text: vec!["hi".into()] })).await;
        assert!(reply.contains("added"));

        let count = state.read().await.fillers.len();
        let reply = jokes(&state, Some(JokesCommand::Del { index: count })).await;
        assert!(reply.contains("removed"));

        let reply = jokes(&state, Some(JokesCommand::Del { index: 0 })).await;
        assert!(reply.contains("Invalid"));
    }
}
