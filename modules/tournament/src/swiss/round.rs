use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::ranking::{self, rank};
use super::*;
use crate::config::{Format, SwissConfig};
use crate::error::PairingError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub matches: Vec<Match>,
    pub had_bye: bool,
}

impl Round {
    pub fn new(number: u32, pairings: RoundPairings) -> Self {
        Self {
            number,
            matches: pairings.matches,
            had_bye: pairings.had_bye,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_completed)
    }

    pub fn pending(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_completed()).count()
    }

    pub fn open_match_mut(&mut self, id: ParticipantId) -> Option<&mut Match> {
        self.matches
            .iter_mut()
            .find(|m| !m.is_completed() && m.involves(id))
    }

    pub fn completed_match_mut(&mut self, id: ParticipantId) -> Option<&mut Match> {
        self.matches
            .iter_mut()
            .find(|m| m.is_completed() && m.involves(id))
    }
}

/// Round driver: seating, pairing with retry and manual fallback, result
/// entry by name, and drops.
pub struct Tournament {
    config: SwissConfig,
    roster: Roster,
    seating: Vec<ParticipantId>,
    pairer: SwissPairer,
    manual: ManualPairer,
    current: Option<Round>,
    rounds_played: u32,
}

impl Tournament {
    pub fn new(config: SwissConfig) -> Self {
        Self {
            pairer: SwissPairer::new(config.clone()),
            manual: ManualPairer::new(config.clone()),
            config,
            roster: Roster::new(),
            seating: Vec::new(),
            current: None,
            rounds_played: 0,
        }
    }

    pub fn config(&self) -> &SwissConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, TournamentError> {
        let id = self.roster.add(name)?;
        self.seating.push(id);
        Ok(id)
    }

    /// Randomize the order exact ties are listed in.
    pub fn shuffle_seating<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seating.shuffle(rng);
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.rounds_for(self.roster.len())
    }

    pub fn is_finished(&self) -> bool {
        let round_done = self.current.as_ref().is_none_or(Round::is_complete);
        if !round_done {
            return false;
        }
        if self.config.format == Format::SingleElimination && self.roster.active_ids().len() <= 1 {
            return true;
        }
        self.rounds_played >= self.total_rounds()
    }

    /// Pair the next round: automatic pairing first, the operator once
    /// `max_pairing_attempts` is exhausted.
    pub fn start_round<R, O>(&mut self, rng: &mut R, operator: &mut O) -> Result<&Round, TournamentError>
    where
        R: Rng + ?Sized,
        O: PairingOperator + ?Sized,
    {
        if self.current.as_ref().is_some_and(|r| !r.is_complete()) {
            return Err(TournamentError::RoundInProgress);
        }

        self.seating = rank(&self.roster, &self.seating);
        let active: Vec<ParticipantId> = self
            .seating
            .iter()
            .copied()
            .filter(|id| self.roster.get(*id).is_some_and(|p| p.is_active))
            .collect();

        let pairings = match self.pairer.pair_with_retries(&mut self.roster, &active, rng) {
            Ok(pairings) => pairings,
            Err(TournamentError::Pairing(PairingError::AttemptsExhausted { attempts })) => {
                log::warn!("falling back to manual pairing after {} attempts", attempts);
                self.manual.run(&mut self.roster, &active, operator, rng)?
            }
            Err(err) => return Err(err),
        };

        self.rounds_played += 1;
        log::info!(
            "round {} paired: {} matches, bye: {}",
            self.rounds_played,
            pairings.matches.len(),
            pairings.had_bye
        );
        Ok(self.current.insert(Round::new(self.rounds_played, pairings)))
    }

    /// Report the open match of `name`, whose games are listed first.
    pub fn report(
        &mut self,
        name: &str,
        games: u32,
        other_games: u32,
        draws: u32,
    ) -> Result<(), TournamentError> {
        let id = self.roster.id_of(name)?;
        let game = self
            .current
            .as_mut()
            .and_then(|round| round.open_match_mut(id))
            .ok_or_else(|| TournamentError::NoOpenMatch(name.to_string()))?;

        game.report(&mut self.roster, id, games, other_games, draws)?;

        if self.config.format == Format::SingleElimination {
            if let Some(Opponent::Player(loser)) = game.loser() {
                self.roster.set_active(loser, false)?;
                log::info!("{} eliminated", self.roster.name_of(loser));
            }
        }
        Ok(())
    }

    /// Correct the completed match of `name` in the current round.
    pub fn fix(
        &mut self,
        name: &str,
        games: u32,
        other_games: u32,
        draws: u32,
    ) -> Result<(), TournamentError> {
        let id = self.roster.id_of(name)?;
        let game = self
            .current
            .as_mut()
            .and_then(|round| round.completed_match_mut(id))
            .ok_or_else(|| TournamentError::NoCompletedMatch(name.to_string()))?;

        game.fix(&mut self.roster, id, games, other_games, draws)?;

        if self.config.format == Format::SingleElimination {
            for seat in std::iter::once(game.player1).chain(game.player2.id()) {
                if let Some(p) = self.roster.get_mut(seat) {
                    p.is_active = true;
                }
            }
            if let Some(Opponent::Player(loser)) = game.loser() {
                self.roster.set_active(loser, false)?;
            }
        }
        Ok(())
    }

    /// Remove `name` from future pairings. Open matches are forfeited.
    pub fn drop_participant(&mut self, name: &str) -> Result<(), TournamentError> {
        let id = self.roster.id_of(name)?;
        self.roster.set_active(id, false)?;

        if let Some(game) = self.current.as_mut().and_then(|round| round.open_match_mut(id)) {
            game.report(&mut self.roster, id, 0, self.config.forfeit_games, 0)?;
        }
        log::info!("{} dropped", name);
        Ok(())
    }

    pub fn undrop_participant(&mut self, name: &str) -> Result<(), TournamentError> {
        let id = self.roster.id_of(name)?;
        self.roster.set_active(id, true)?;
        log::info!("{} undropped", name);
        Ok(())
    }

    pub fn standings(&self) -> Vec<Standing> {
        ranking::standings_from(&self.roster, &self.seating)
    }
}
