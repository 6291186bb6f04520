use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{EntryId, MatchId, Record};

pub const MATCH_PARTICIPANT_SLOTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub game_name: String,
    pub tag_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_icon_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummarizedStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_win_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderEntry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    pub tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    pub league_points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<u32>,
    #[serde(rename = "player_ids_data")]
    pub player: PlayerIdentity,
    #[serde(
        rename = "player_summarized_stats_data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub summarized_stats: Option<SummarizedStats>,
}

impl LadderEntry {
    pub fn win_rate(&self) -> Option<f64> {
        self.summarized_stats
            .as_ref()
            .and_then(|stats| stats.average_win_rate)
    }
}

impl Record for LadderEntry {
    type Key = EntryId;

    fn key(&self) -> EntryId {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsEntry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    pub summoner_id: String,
    pub league_points: i64,
    pub tier: String,
    pub rank: String,
    pub wins: u32,
    pub losses: u32,
}

impl Record for PlayerStatsEntry {
    type Key = EntryId;

    fn key(&self) -> EntryId {
        self.id.clone()
    }
}

/// Per-player detail inside a match. Every field is decoded on its own: a
/// value of the wrong type becomes `None` and the rest of the player is kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParticipant {
    #[serde(default, deserialize_with = "lenient_text")]
    pub puuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub riot_id_game_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub riot_id_tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub champion_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item0: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item1: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item2: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item3: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item4: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item5: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item6: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub summoner1_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub summoner2_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub kills: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub deaths: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub assists: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_minions_killed: Option<u32>,
}

impl MatchParticipant {
    pub fn items(&self) -> [Option<i64>; 7] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
    }

    pub fn summoner_spells(&self) -> [Option<i64>; 2] {
        [self.summoner1_id, self.summoner2_id]
    }
}

/// One match in a player's history.
///
/// The backend nests per-player detail under the keys `"0"` through `"9"`
/// next to the summary fields; those land in `slots` and are decoded lazily
/// by [`MatchRecord::participants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub match_id: MatchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub kills: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub deaths: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub assists: Option<u32>,
    #[serde(flatten)]
    pub slots: BTreeMap<String, Value>,
}

impl MatchRecord {
    /// Participants by slot index. Missing slots and slots that are not
    /// objects are skipped.
    pub fn participants(&self) -> Vec<(usize, MatchParticipant)> {
        (0..MATCH_PARTICIPANT_SLOTS)
            .filter_map(|slot| {
                let value = self.slots.get(&slot.to_string())?;
                serde_json::from_value::<MatchParticipant>(value.clone())
                    .ok()
                    .map(|participant| (slot, participant))
            })
            .collect()
    }

    pub fn played_on(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.date_naive());
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(parsed.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

impl Record for MatchRecord {
    type Key = MatchId;

    fn key(&self) -> MatchId {
        self.match_id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMessage {
    pub message: String,
}

/// Whole numbers arrive as `3` or `3.0` depending on the backend's storage.
fn integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(integral)
        .and_then(|n| u32::try_from(n).ok()))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integral))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(text) => Some(text),
        _ => None,
    }))
}
