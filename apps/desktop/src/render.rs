//! Plain-text rendering of view snapshots.

use chrono::NaiveDate;
use list_view::{Phase, Snapshot, SortDirection};
use shared::{
    domain::Record,
    protocol::{LadderEntry, MatchParticipant, MatchRecord, PlayerStatsEntry},
};

const NOT_AVAILABLE: &str = "N/A";

pub fn render_ladder(snapshot: &Snapshot<LadderEntry>, asset_base_url: &str) -> String {
    let mut lines = vec![heading("Player Ladder", Some(snapshot.sort_direction))];
    if let Some(status) = status_line(snapshot, "No ladder data found.") {
        lines.push(status);
        return lines.join("\n");
    }

    for entry in &snapshot.items {
        let icon = entry
            .player
            .profile_icon_id
            .map(|id| profile_icon_url(asset_base_url, id))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        lines.push(format!(
            "- {}#{} | Tier: {} | League Points: {} | Win Rate: {} | Icon: {icon}",
            entry.player.game_name,
            entry.player.tag_line,
            entry.tier,
            entry.league_points,
            format_win_rate(entry.win_rate()),
        ));
    }
    lines.join("\n")
}

pub fn render_player_stats(snapshot: &Snapshot<PlayerStatsEntry>) -> String {
    let mut lines = vec![heading("Player Stats", Some(snapshot.sort_direction))];
    if let Some(status) = status_line(snapshot, "No player stats found.") {
        lines.push(status);
        return lines.join("\n");
    }

    lines.extend(snapshot.items.iter().map(|stat| {
        format!(
            "- {}: {} LP ({} {}) - {}W {}L",
            stat.summoner_id, stat.league_points, stat.tier, stat.rank, stat.wins, stat.losses
        )
    }));
    lines.join("\n")
}

pub fn render_match_history(snapshot: &Snapshot<MatchRecord>) -> String {
    let mut lines = vec![heading("Match History", None)];
    if let Some(status) = status_line(snapshot, "No match history found.") {
        lines.push(status);
        return lines.join("\n");
    }

    for record in &snapshot.items {
        push_match_summary(&mut lines, record);
        if snapshot.is_expanded(&record.key()) {
            push_match_detail(&mut lines, record);
        }
    }
    lines.join("\n")
}

pub fn profile_icon_url(asset_base_url: &str, icon_id: i64) -> String {
    format!(
        "{}/img/profileicon/{icon_id}.png",
        asset_base_url.trim_end_matches('/')
    )
}

fn heading(title: &str, direction: Option<SortDirection>) -> String {
    match direction {
        Some(SortDirection::Descending) => format!("{title} (league points, high to low)"),
        Some(SortDirection::Ascending) => format!("{title} (league points, low to high)"),
        None => title.to_string(),
    }
}

/// The line shown instead of records, if any.
fn status_line<R: Record>(snapshot: &Snapshot<R>, empty: &str) -> Option<String> {
    match snapshot.phase {
        Phase::Idle => Some("Not loaded.".into()),
        Phase::Loading => Some("Loading...".into()),
        Phase::Error => Some(format!(
            "Error: {}",
            snapshot.error_message.as_deref().unwrap_or("unknown error")
        )),
        Phase::Ready if snapshot.items.is_empty() => Some(empty.into()),
        Phase::Ready => None,
    }
}

fn format_win_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => NOT_AVAILABLE.into(),
    }
}

fn format_match_date(day: Option<NaiveDate>) -> String {
    match day {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => "Unknown date".into(),
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn push_match_summary(lines: &mut Vec<String>, record: &MatchRecord) {
    let date = format_match_date(record.played_on());
    let duration = match record.duration {
        Some(minutes) if minutes > 0.0 => format!("{minutes} minutes"),
        _ => "Unknown duration".into(),
    };
    let outcome = match (&record.outcome, record.win) {
        (Some(outcome), _) if !outcome.trim().is_empty() => outcome.clone(),
        (_, Some(true)) => "Victory".into(),
        (_, Some(false)) => "Defeat".into(),
        _ => "Outcome not available".into(),
    };

    lines.push(format!("Match ID: {}", record.match_id));
    lines.push(format!("  Date: {date}"));
    lines.push(format!("  Duration: {duration}"));
    lines.push(format!("  Outcome: {outcome}"));
    lines.push(format!(
        "  Kills: {} | Deaths: {} | Assists: {}",
        or_na(record.kills),
        or_na(record.deaths),
        or_na(record.assists)
    ));
}

fn push_match_detail(lines: &mut Vec<String>, record: &MatchRecord) {
    lines.push(format!("  Expanded details for match {}:", record.match_id));
    for (slot, participant) in record.participants() {
        push_participant(lines, slot, &participant);
    }
}

fn push_participant(lines: &mut Vec<String>, slot: usize, participant: &MatchParticipant) {
    lines.push(format!(
        "    Player {slot}: {}#{} (PUUID {})",
        or_na(participant.riot_id_game_name.as_deref()),
        or_na(participant.riot_id_tagline.as_deref()),
        or_na(participant.puuid.as_deref())
    ));
    lines.push(format!(
        "      Champion: {}",
        or_na(participant.champion_name.as_deref())
    ));
    lines.push(format!(
        "      Items: {}",
        icon_paths("items", &participant.items())
    ));
    lines.push(format!(
        "      Spells: {}",
        icon_paths("spells", &participant.summoner_spells())
    ));
    lines.push(format!(
        "      Kills: {} | Deaths: {} | Assists: {} | CS: {}",
        or_na(participant.kills),
        or_na(participant.deaths),
        or_na(participant.assists),
        or_na(participant.total_minions_killed)
    ));
}

fn icon_paths(kind: &str, ids: &[Option<i64>]) -> String {
    let paths: Vec<String> = ids
        .iter()
        .flatten()
        .map(|id| format!("/icons/{kind}/{id}.png"))
        .collect();
    if paths.is_empty() {
        NOT_AVAILABLE.into()
    } else {
        paths.join(" ")
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
