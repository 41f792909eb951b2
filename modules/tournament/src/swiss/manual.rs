use rand::Rng;
use std::collections::VecDeque;

use super::pairer::PairingPlan;
use super::ranking::rank;
use super::*;
use crate::config::SwissConfig;
use crate::error::PairingError;

/// Whoever fills brackets by hand: a prompt, a UI, or a script.
pub trait PairingOperator {
    /// Next participant to put in the open bracket, or `None` to close it.
    fn next_member(&mut self, roster: &Roster, unplaced: &[ParticipantId]) -> Option<String>;

    /// A name could not be placed and was skipped.
    fn rejected(&mut self, _name: &str, _reason: &TournamentError) {}

    /// `stuck` had already played everyone left in its bracket; the whole
    /// round starts over from the full active list.
    fn restarted(&mut self, _stuck: ParticipantId) {}
}

/// Replays a fixed list of choices. `None` entries close a bracket.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    choices: VecDeque<Option<String>>,
    pub rejected: Vec<String>,
    pub restarts: u32,
}

impl ScriptedOperator {
    pub fn new(choices: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            rejected: Vec::new(),
            restarts: 0,
        }
    }

    /// One entry per bracket, each closed automatically.
    pub fn from_brackets<S: AsRef<str>>(brackets: &[Vec<S>]) -> Self {
        let choices = brackets.iter().flat_map(|bracket| {
            bracket
                .iter()
                .map(|name| Some(name.as_ref().to_string()))
                .chain(std::iter::once(None))
        });
        Self::new(choices.collect::<Vec<_>>())
    }
}

impl PairingOperator for ScriptedOperator {
    fn next_member(&mut self, _roster: &Roster, _unplaced: &[ParticipantId]) -> Option<String> {
        self.choices.pop_front().flatten()
    }

    fn rejected(&mut self, name: &str, _reason: &TournamentError) {
        self.rejected.push(name.to_string());
    }

    fn restarted(&mut self, _stuck: ParticipantId) {
        self.restarts += 1;
    }
}

/// Bracket pairing where an operator decides who shares a bracket.
pub struct ManualPairer {
    config: SwissConfig,
}

impl ManualPairer {
    pub fn new(config: SwissConfig) -> Self {
        Self { config }
    }

    pub fn run<O, R>(
        &self,
        roster: &mut Roster,
        active: &[ParticipantId],
        operator: &mut O,
        rng: &mut R,
    ) -> Result<RoundPairings, TournamentError>
    where
        O: PairingOperator + ?Sized,
        R: Rng + ?Sized,
    {
        let ranked = rank(roster, active);
        let mut restarts = 0;

        loop {
            match self.attempt(roster, &ranked, operator, rng)? {
                Some(plan) => return plan.commit(roster, self.config.bye_games),
                None => {
                    restarts += 1;
                    if restarts > self.config.max_manual_restarts {
                        return Err(PairingError::RestartsExhausted {
                            restarts: self.config.max_manual_restarts,
                        }
                        .into());
                    }
                    log::info!("manual pairing restarted ({} so far)", restarts);
                }
            }
        }
    }

    /// One pass over the whole field. `Ok(None)` means the round must restart.
    fn attempt<O, R>(
        &self,
        roster: &Roster,
        ranked: &[ParticipantId],
        operator: &mut O,
        rng: &mut R,
    ) -> Result<Option<PairingPlan>, PairingError>
    where
        O: PairingOperator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut unplaced = ranked.to_vec();
        let mut plan = PairingPlan::default();
        let mut carry: Option<ParticipantId> = None;

        loop {
            if unplaced.is_empty() {
                plan.bye = carry;
                return Ok(Some(plan));
            }
            if unplaced.len() == 1 && carry.is_none() {
                plan.bye = unplaced.pop();
                return Ok(Some(plan));
            }

            let mut bracket: Vec<ParticipantId> = carry.take().into_iter().collect();
            let mut added = 0;
            while let Some(name) = operator.next_member(roster, &unplaced) {
                let found = unplaced
                    .iter()
                    .position(|id| roster.get(*id).is_some_and(|p| p.name == name));
                match found {
                    Some(pos) => {
                        bracket.push(unplaced.remove(pos));
                        added += 1;
                    }
                    None => {
                        let reason = TournamentError::UnknownParticipant(name.clone());
                        log::debug!("manual pairing skipped {}", name);
                        operator.rejected(&name, &reason);
                    }
                }
            }
            if added == 0 {
                return Err(PairingError::BracketAbandoned);
            }

            while bracket.len() > 1 {
                let player1 = bracket[0];
                let candidates: Vec<usize> = (1..bracket.len())
                    .filter(|&i| !roster.has_played(player1, bracket[i]))
                    .collect();
                if candidates.is_empty() {
                    operator.restarted(player1);
                    return Ok(None);
                }

                let pick = candidates[rng.gen_range(0..candidates.len())];
                plan.pairs.push((player1, bracket[pick]));
                bracket.remove(pick);
                bracket.remove(0);
            }
            carry = bracket.pop();
        }
    }
}
