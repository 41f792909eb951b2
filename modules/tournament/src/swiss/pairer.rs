use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ranking::rank;
use super::*;
use crate::config::SwissConfig;
use crate::error::PairingError;

/// Matches for one round. A bye, if any, is already reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    pub matches: Vec<Match>,
    pub had_bye: bool,
}

/// Pairing decisions before anything touches the roster.
#[derive(Debug, Default)]
pub(crate) struct PairingPlan {
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
}

impl PairingPlan {
    /// Turn the plan into matches, reporting the bye as a win.
    pub fn commit(self, roster: &mut Roster, bye_games: u32) -> Result<RoundPairings, TournamentError> {
        let mut matches: Vec<Match> = self
            .pairs
            .into_iter()
            .map(|(player1, player2)| Match::new(player1, player2))
            .collect();

        let had_bye = self.bye.is_some();
        if let Some(player) = self.bye {
            let mut bye = Match::bye(player);
            bye.report(roster, player, bye_games, 0, 0)?;
            log::info!("{} receives a bye", roster.name_of(player));
            matches.push(bye);
        }

        Ok(RoundPairings { matches, had_bye })
    }
}

pub struct SwissPairer {
    config: SwissConfig,
}

impl SwissPairer {
    pub fn new(config: SwissConfig) -> Self {
        Self { config }
    }

    /// One randomized pass over the score brackets of `active`.
    ///
    /// Any rematch aborts the whole pass with
    /// [`PairingError::RematchCollision`] and leaves the roster untouched;
    /// callers retry with fresh randomness.
    pub fn generate_pairings<R: Rng + ?Sized>(
        &self,
        roster: &mut Roster,
        active: &[ParticipantId],
        rng: &mut R,
    ) -> Result<RoundPairings, TournamentError> {
        let plan = self.plan_round(roster, active, rng)?;
        plan.commit(roster, self.config.bye_games)
    }

    /// Run [`SwissPairer::generate_pairings`] until it succeeds or
    /// `max_pairing_attempts` is used up.
    pub fn pair_with_retries<R: Rng + ?Sized>(
        &self,
        roster: &mut Roster,
        active: &[ParticipantId],
        rng: &mut R,
    ) -> Result<RoundPairings, TournamentError> {
        let attempts = self.config.max_pairing_attempts;
        for attempt in 1..=attempts {
            match self.plan_round(roster, active, rng) {
                Ok(plan) => {
                    log::debug!("paired {} players on attempt {}", active.len(), attempt);
                    return plan.commit(roster, self.config.bye_games);
                }
                Err(PairingError::RematchCollision { player1, player2 }) => {
                    log::trace!(
                        "attempt {}: {} already played {}",
                        attempt,
                        roster.name_of(player1),
                        roster.name_of(player2)
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        log::warn!("automatic pairing failed after {} attempts", attempts);
        Err(PairingError::AttemptsExhausted { attempts }.into())
    }

    pub(crate) fn plan_round<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        active: &[ParticipantId],
        rng: &mut R,
    ) -> Result<PairingPlan, PairingError> {
        let ranked = rank(roster, active);
        let points: Vec<u32> = ranked
            .iter()
            .map(|id| roster.get(*id).map_or(0, Participant::match_points))
            .collect();
        let total = ranked.len();

        let mut plan = PairingPlan::default();
        let mut bracket: Vec<ParticipantId> = Vec::new();
        let mut paired = 0;
        let mut cursor = 0;

        while paired < total && cursor < total {
            let furthest = self.collect_bracket(&ranked, &points, cursor, &mut bracket);

            while bracket.len() > 1 {
                let player1 = bracket[0];
                let pick = rng.gen_range(1..bracket.len());
                let player2 = bracket[pick];
                if roster.has_played(player1, player2) {
                    return Err(PairingError::RematchCollision { player1, player2 });
                }

                plan.pairs.push((player1, player2));
                bracket.remove(pick);
                bracket.remove(0);
                paired += 2;
            }

            // A lone leftover floats into the next bracket unless it is the
            // last unpaired player overall.
            if bracket.len() == 1 && paired + 1 == total {
                plan.bye = bracket.pop();
                paired += 1;
            }
            cursor = furthest + 1;
        }

        Ok(plan)
    }

    /// Append everyone sharing the match points at `cursor` to `bracket` and
    /// return the furthest index taken.
    fn collect_bracket(
        &self,
        ranked: &[ParticipantId],
        points: &[u32],
        cursor: usize,
        bracket: &mut Vec<ParticipantId>,
    ) -> usize {
        let bracket_score = points[cursor];
        let mut furthest = cursor;
        for (i, id) in ranked.iter().enumerate() {
            if points[i] == bracket_score {
                bracket.push(*id);
                furthest = furthest.max(i);
            }
        }
        furthest
    }
}
