//! Record sources and view presets for each backend collection.

use std::sync::Arc;

use async_trait::async_trait;
use list_view::{ListViewHandle, ParameterPolicy, RecordSource, ViewConfig};
use shared::{
    domain::FetchParameter,
    error::FetchError,
    protocol::{LadderEntry, MatchRecord, PlayerStatsEntry},
};

use crate::ApiClient;

pub struct LadderSource {
    api: Arc<ApiClient>,
}

impl LadderSource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RecordSource for LadderSource {
    type Record = LadderEntry;

    async fn fetch(
        &self,
        _parameter: Option<&FetchParameter>,
    ) -> Result<Vec<LadderEntry>, FetchError> {
        self.api.ladder().await
    }
}

pub struct PlayerStatsSource {
    api: Arc<ApiClient>,
}

impl PlayerStatsSource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RecordSource for PlayerStatsSource {
    type Record = PlayerStatsEntry;

    async fn fetch(
        &self,
        _parameter: Option<&FetchParameter>,
    ) -> Result<Vec<PlayerStatsEntry>, FetchError> {
        self.api.player_stats().await
    }
}

pub struct MatchHistorySource {
    api: Arc<ApiClient>,
}

impl MatchHistorySource {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RecordSource for MatchHistorySource {
    type Record = MatchRecord;

    async fn fetch(
        &self,
        parameter: Option<&FetchParameter>,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let Some(player) = parameter else {
            return Err(FetchError::InvalidParameter);
        };
        self.api.match_history(player).await
    }
}

/// Ladder ordered by league points; `tier` narrows it case-insensitively.
pub fn ladder_view_config(tier: Option<&str>) -> ViewConfig<LadderEntry> {
    let config = ViewConfig::new(ParameterPolicy::Unused)
        .sorted_by(|entry: &LadderEntry| entry.league_points);
    match tier.map(str::trim).filter(|tier| !tier.is_empty()) {
        Some(tier) => {
            let tier = tier.to_string();
            config.filtered_by(move |entry: &LadderEntry| {
                entry.tier.eq_ignore_ascii_case(&tier)
            })
        }
        None => config,
    }
}

pub fn player_stats_view_config() -> ViewConfig<PlayerStatsEntry> {
    ViewConfig::new(ParameterPolicy::Unused)
        .sorted_by(|entry: &PlayerStatsEntry| entry.league_points)
}

/// Matches keep backend order; the PUUID selects the player.
pub fn match_history_view_config() -> ViewConfig<MatchRecord> {
    ViewConfig::new(ParameterPolicy::Required)
}

pub fn ladder_view(api: Arc<ApiClient>, tier: Option<&str>) -> ListViewHandle<LadderSource> {
    ListViewHandle::new(Arc::new(LadderSource::new(api)), ladder_view_config(tier))
}

pub fn player_stats_view(api: Arc<ApiClient>) -> ListViewHandle<PlayerStatsSource> {
    ListViewHandle::new(
        Arc::new(PlayerStatsSource::new(api)),
        player_stats_view_config(),
    )
}

pub fn match_history_view(api: Arc<ApiClient>) -> ListViewHandle<MatchHistorySource> {
    ListViewHandle::new(
        Arc::new(MatchHistorySource::new(api)),
        match_history_view_config(),
    )
}

#[cfg(test)]
#[path = "tests/sources_tests.rs"]
mod tests;
