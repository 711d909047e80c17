use crate::leaderboard::Snapshot;
use crate::models::{RankedRecord, RefreshInterval, Theme};
use crate::ranking::completion::display_percentage;
use crate::ranking::{LeaderboardStats, filter_records};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;
const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 28;

#[derive(Debug, Clone)]
pub struct ViewState {
    // debounced
    pub query: String,
    pub completed_only: bool,
    pub show_top: bool,
    pub theme: Theme,
    pub refresh_interval: RefreshInterval,
}

impl ViewState {
    pub fn new(theme: Theme, refresh_interval: RefreshInterval) -> Self {
        Self {
            query: String::new(),
            completed_only: false,
            show_top: true,
            theme,
            refresh_interval,
        }
    }

    pub fn visible<'a>(&self, records: &'a [RankedRecord]) -> Vec<&'a RankedRecord> {
        filter_records(records, &self.query, self.completed_only)
    }
}

struct Palette {
    accent: &'static str,
    muted: &'static str,
    reset: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                accent: "\x1b[1;96m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Light => Palette {
                accent: "\x1b[1;34m",
                muted: "\x1b[37m",
                reset: "\x1b[0m",
            },
        }
    }
}

pub fn render(snapshot: &Snapshot, state: &ViewState, source: &str) -> String {
    let palette = Palette::for_theme(state.theme);
    let stats = LeaderboardStats::from_records(&snapshot.records);
    let updated = snapshot
        .updated_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "—".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{}Leaderboard{} · {}", palette.accent, palette.reset, source);
    let _ = writeln!(
        out,
        "{}Registered: {}  Qualified: {}  Updated: {}  Auto-refresh: {}{}",
        palette.muted, stats.registered, stats.qualified, updated, state.refresh_interval, palette.reset
    );
    if !state.query.trim().is_empty() || state.completed_only {
        let _ = writeln!(
            out,
            "Search: {:?}  {}",
            state.query.trim(),
            if state.completed_only { "Showing: Completed" } else { "" }
        );
    }
    out.push('\n');

    if state.show_top && !stats.podium.is_empty() {
        let _ = writeln!(out, "{}Top performers{}", palette.accent, palette.reset);
        for (place, record) in stats.podium.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {} #{} {} {}<{}>{}  {:.0}%",
                medal(place + 1),
                place + 1,
                or_dash(record.name()),
                palette.muted,
                record.email(),
                palette.reset,
                record.percentage
            );
        }
        out.push('\n');
    }

    let visible = state.visible(&snapshot.records);
    let _ = writeln!(
        out,
        "{:>4}  {:<nw$}  {:<ew$}  {:<8}  {:<8}  {:>6}  {:>6}  Progress",
        "Rank",
        "Name",
        "Email",
        "Access",
        "Eligible",
        "Badges",
        "Arcade",
        nw = NAME_WIDTH,
        ew = EMAIL_WIDTH
    );
    if visible.is_empty() {
        let _ = writeln!(out, "{}No results. Try another search.{}", palette.muted, palette.reset);
        return out;
    }
    for record in visible {
        let _ = writeln!(
            out,
            "{:>4}  {:<nw$}  {:<ew$}  {:<8}  {:<8}  {:>6}  {:>6}  {} {:>3.0}%",
            record.rank,
            truncate(record.name(), NAME_WIDTH),
            truncate(record.email(), EMAIL_WIDTH),
            yes_no(record.raw.access_code_status()),
            yes_no(record.raw.all_completed()),
            record.badges_completed,
            record.games_completed,
            progress_bar(record.percentage),
            display_percentage(record.percentage),
            nw = NAME_WIDTH,
            ew = EMAIL_WIDTH
        );
    }
    out
}

pub fn export_json(snapshot: &Snapshot, state: &ViewState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&state.visible(&snapshot.records))
}

fn medal(place: usize) -> &'static str {
    match place {
        1 => "🥇",
        2 => "🥈",
        _ => "🥉",
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "—" } else { value }
}

pub fn yes_no(value: &str) -> String {
    if value == "Yes" {
        "✅ Yes".to_string()
    } else if value.is_empty() || value == "0" || value.eq_ignore_ascii_case("no") {
        "❌ No".to_string()
    } else {
        value.to_string()
    }
}

pub fn progress_bar(percentage: f64) -> String {
    let filled = ((display_percentage(percentage) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
