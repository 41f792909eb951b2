use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{Participant, ParticipantId, Roster};

/// Composite sort key: match points, then OMW, GWP and OGWP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankKey {
    pub match_points: u32,
    pub opponent_match_win: f64,
    pub game_win_percentage: f64,
    pub opponent_game_win: f64,
}

impl RankKey {
    pub fn of(participant: &Participant, roster: &Roster) -> Self {
        Self {
            match_points: participant.match_points(),
            opponent_match_win: participant.opponent_match_win(roster),
            game_win_percentage: participant.game_win_percentage(),
            opponent_game_win: participant.opponent_game_win(roster),
        }
    }

    /// Descending order: the stronger key compares as `Less`.
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .match_points
            .cmp(&self.match_points)
            .then(other.opponent_match_win.total_cmp(&self.opponent_match_win))
            .then(other.game_win_percentage.total_cmp(&self.game_win_percentage))
            .then(other.opponent_game_win.total_cmp(&self.opponent_game_win))
    }
}

/// Stable sort of `ids` by [`RankKey`]. Ties keep their incoming order;
/// handles missing from the roster are dropped.
pub fn rank(roster: &Roster, ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut keyed: Vec<(RankKey, ParticipantId)> = ids
        .iter()
        .filter_map(|id| roster.get(*id))
        .map(|p| (RankKey::of(p, roster), p.id))
        .collect();

    if keyed.len() != ids.len() {
        log::warn!(
            "ranking skipped {} handle(s) not in roster",
            ids.len() - keyed.len()
        );
    }

    keyed.sort_by(|a, b| a.0.cmp_desc(&b.0));
    keyed.into_iter().map(|(_, id)| id).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub id: ParticipantId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub byes: u32,
    pub match_points: u32,
    pub opponent_match_win: f64,
    pub game_win_percentage: f64,
    pub opponent_game_win: f64,
    pub dropped: bool,
}

impl Standing {
    fn of(participant: &Participant, roster: &Roster) -> Self {
        Self {
            id: participant.id,
            name: participant.name.clone(),
            wins: participant.wins,
            losses: participant.losses,
            draws: participant.draws,
            byes: participant.byes,
            match_points: participant.match_points(),
            opponent_match_win: participant.opponent_match_win(roster),
            game_win_percentage: participant.game_win_percentage(),
            opponent_game_win: participant.opponent_game_win(roster),
            dropped: !participant.is_active,
        }
    }
}

/// Standings over the whole roster, ties broken by entry order.
pub fn standings(roster: &Roster) -> Vec<Standing> {
    standings_from(roster, roster.ids())
}

/// Active participants ranked first, then dropped ones, each group ranked
/// on its own. `order` decides how exact ties fall.
pub fn standings_from(roster: &Roster, order: &[ParticipantId]) -> Vec<Standing> {
    let (active, dropped): (Vec<ParticipantId>, Vec<ParticipantId>) = order
        .iter()
        .copied()
        .filter(|id| roster.contains(*id))
        .partition(|id| roster.get(*id).is_some_and(|p| p.is_active));

    rank(roster, &active)
        .into_iter()
        .chain(rank(roster, &dropped))
        .filter_map(|id| roster.get(id))
        .map(|p| Standing::of(p, roster))
        .collect()
}
