use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::error::TournamentError;

pub mod manual;
pub mod matches;
pub mod pairer;
pub mod ranking;
pub mod round;

pub use manual::{ManualPairer, PairingOperator, ScriptedOperator};
pub use matches::{Match, Opponent};
pub use pairer::{RoundPairings, SwissPairer};
pub use ranking::{RankKey, Standing};
pub use round::{Round, Tournament};

/// Floor applied to match and game win percentages.
pub const MIN_WIN_PERCENTAGE: f64 = 0.33;

/// Stable handle for a participant. Identity is the handle, never the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub game_wins: u32,
    pub game_losses: u32,
    pub game_draws: u32,
    pub byes: u32,
    pub opponents: Vec<ParticipantId>, // back-references, one entry per real match played
    pub is_active: bool,
}

impl Participant {
    pub fn new(name: String) -> Self {
        Self {
            id: ParticipantId::new(),
            name,
            wins: 0,
            losses: 0,
            draws: 0,
            game_wins: 0,
            game_losses: 0,
            game_draws: 0,
            byes: 0,
            opponents: Vec::new(),
            is_active: true,
        }
    }

    pub fn match_points(&self) -> u32 {
        3 * self.wins + self.draws
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Match points over real (non-bye) matches, floored at 0.33.
    pub fn match_win_percentage(&self) -> f64 {
        let played = self.matches_played();
        if played <= self.byes {
            return MIN_WIN_PERCENTAGE;
        }
        let points = self.match_points().saturating_sub(3 * self.byes);
        let perc = points as f64 / (3.0 * (played - self.byes) as f64);
        perc.max(MIN_WIN_PERCENTAGE)
    }

    pub fn game_points(&self) -> u32 {
        3 * self.game_wins + self.game_losses
    }

    pub fn game_win_percentage(&self) -> f64 {
        let games = self.game_wins + self.game_losses + self.game_draws;
        if games <= self.byes {
            return MIN_WIN_PERCENTAGE;
        }
        let perc = self.game_points() as f64 / (3.0 * games as f64);
        perc.max(MIN_WIN_PERCENTAGE)
    }

    /// Mean match-win percentage of everyone this participant has played.
    pub fn opponent_match_win(&self, roster: &Roster) -> f64 {
        self.opponent_average(roster, Participant::match_win_percentage)
    }

    pub fn opponent_game_win(&self, roster: &Roster) -> f64 {
        self.opponent_average(roster, Participant::game_win_percentage)
    }

    fn opponent_average(&self, roster: &Roster, perc: fn(&Participant) -> f64) -> f64 {
        if self.opponents.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .opponents
            .iter()
            .filter_map(|id| roster.get(*id))
            .map(perc)
            .sum();
        total / self.opponents.len() as f64
    }

    pub fn has_played(&self, other: ParticipantId) -> bool {
        self.opponents.contains(&other)
    }

    /// Record a completed match from whichever side this participant occupies.
    pub fn apply_result(&mut self, game: &Match) -> Result<(), TournamentError> {
        let (own, other, opponent) = game.scores_for(self.id).ok_or(TournamentError::NotInMatch)?;

        match opponent {
            Opponent::Player(id) => self.opponents.push(id),
            Opponent::Bye => self.byes += 1,
        }
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.draws += 1,
        }
        self.game_wins += own;
        self.game_losses += other;
        self.game_draws += game.draws();
        Ok(())
    }

    /// Exact inverse of [`Participant::apply_result`] for the same score.
    /// Nothing is changed if the result was never applied.
    pub fn undo_result(&mut self, game: &Match) -> Result<(), TournamentError> {
        let (own, other, opponent) = game.scores_for(self.id).ok_or(TournamentError::NotInMatch)?;

        match opponent {
            Opponent::Player(id) => {
                let pos = self
                    .opponents
                    .iter()
                    .rposition(|o| *o == id)
                    .ok_or(TournamentError::ResultNotApplied)?;
                self.opponents.remove(pos);
            }
            Opponent::Bye => {
                if self.byes == 0 {
                    return Err(TournamentError::ResultNotApplied);
                }
                self.byes -= 1;
            }
        }
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => self.wins = self.wins.saturating_sub(1),
            std::cmp::Ordering::Less => self.losses = self.losses.saturating_sub(1),
            std::cmp::Ordering::Equal => self.draws = self.draws.saturating_sub(1),
        }
        self.game_wins = self.game_wins.saturating_sub(own);
        self.game_losses = self.game_losses.saturating_sub(other);
        self.game_draws = self.game_draws.saturating_sub(game.draws());
        Ok(())
    }
}

/// Owns every participant of a tournament, active or dropped, in entry order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: HashMap<ParticipantId, Participant>,
    order: Vec<ParticipantId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entrant. Names must be non-empty and unique across
    /// active and dropped participants.
    pub fn add(&mut self, name: &str) -> Result<ParticipantId, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if self.find(name).is_some() {
            return Err(TournamentError::DuplicateName(name.to_string()));
        }

        let participant = Participant::new(name.to_string());
        let id = participant.id;
        self.participants.insert(id, participant);
        self.order.push(id);
        Ok(id)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains_key(&id)
    }

    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.participants.values().find(|p| p.name == name)
    }

    pub fn id_of(&self, name: &str) -> Result<ParticipantId, TournamentError> {
        self.find(name)
            .map(|p| p.id)
            .ok_or_else(|| TournamentError::UnknownParticipant(name.to_string()))
    }

    pub fn name_of(&self, id: ParticipantId) -> &str {
        self.get(id).map_or("<unknown>", |p| p.name.as_str())
    }

    /// Handles in entry order.
    pub fn ids(&self) -> &[ParticipantId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.order.iter().filter_map(|id| self.participants.get(id))
    }

    pub fn active_ids(&self) -> Vec<ParticipantId> {
        self.iter().filter(|p| p.is_active).map(|p| p.id).collect()
    }

    pub fn dropped_ids(&self) -> Vec<ParticipantId> {
        self.iter().filter(|p| !p.is_active).map(|p| p.id).collect()
    }

    pub fn has_played(&self, player: ParticipantId, other: ParticipantId) -> bool {
        self.get(player).is_some_and(|p| p.has_played(other))
    }

    pub fn set_active(&mut self, id: ParticipantId, active: bool) -> Result<(), TournamentError> {
        let participant = self
            .participants
            .get_mut(&id)
            .ok_or_else(|| TournamentError::UnknownParticipant(id.to_string()))?;
        match (participant.is_active, active) {
            (false, false) => Err(TournamentError::NotActive(participant.name.clone())),
            (true, true) => Err(TournamentError::AlreadyActive(participant.name.clone())),
            _ => {
                participant.is_active = active;
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
