use serde::{Deserialize, Serialize};

use super::{ParticipantId, Roster};
use crate::error::TournamentError;

/// The second seat of a match: a real participant or the synthetic bye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Player(ParticipantId),
    Bye,
}

impl Opponent {
    pub fn id(&self) -> Option<ParticipantId> {
        match self {
            Opponent::Player(id) => Some(*id),
            Opponent::Bye => None,
        }
    }
}

/// One pairing of a round. `Pending` until reported, then `Completed`;
/// a completed match only changes score through [`Match::fix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub player1: ParticipantId,
    pub player2: Opponent,
    p1_wins: u32,
    p2_wins: u32,
    draws: u32,
    completed: bool,
}

impl Match {
    pub fn new(player1: ParticipantId, player2: ParticipantId) -> Self {
        Self::with_opponent(player1, Opponent::Player(player2))
    }

    pub fn bye(player: ParticipantId) -> Self {
        Self::with_opponent(player, Opponent::Bye)
    }

    fn with_opponent(player1: ParticipantId, player2: Opponent) -> Self {
        Self {
            player1,
            player2,
            p1_wins: 0,
            p2_wins: 0,
            draws: 0,
            completed: false,
        }
    }

    pub fn p1_wins(&self) -> u32 {
        self.p1_wins
    }

    pub fn p2_wins(&self) -> u32 {
        self.p2_wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_bye(&self) -> bool {
        self.player2 == Opponent::Bye
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.player1 == id || self.player2 == Opponent::Player(id)
    }

    /// `(own games, other games, other side)` from `id`'s point of view.
    pub fn scores_for(&self, id: ParticipantId) -> Option<(u32, u32, Opponent)> {
        if self.player1 == id {
            Some((self.p1_wins, self.p2_wins, self.player2))
        } else if self.player2 == Opponent::Player(id) {
            Some((self.p2_wins, self.p1_wins, Opponent::Player(self.player1)))
        } else {
            None
        }
    }

    pub fn opponent_of(&self, id: ParticipantId) -> Option<Opponent> {
        self.scores_for(id).map(|(_, _, other)| other)
    }

    /// Record the result. `named` is the side whose games are listed first;
    /// it does not have to be the winner.
    pub fn report(
        &mut self,
        roster: &mut Roster,
        named: ParticipantId,
        named_games: u32,
        other_games: u32,
        draws: u32,
    ) -> Result<(), TournamentError> {
        if self.completed {
            return Err(TournamentError::AlreadyCompleted);
        }
        self.check_seats(roster, named)?;

        self.assign(named, named_games, other_games, draws);
        self.apply(roster)?;
        self.completed = true;

        log::debug!(
            "reported {} {}-{}-{} vs {}",
            roster.name_of(self.player1),
            self.p1_wins,
            self.p2_wins,
            self.draws,
            self.player2_name(roster)
        );
        Ok(())
    }

    /// Replace the score of a completed match, undoing the old result on both
    /// participants before applying the new one.
    pub fn fix(
        &mut self,
        roster: &mut Roster,
        named: ParticipantId,
        named_games: u32,
        other_games: u32,
        draws: u32,
    ) -> Result<(), TournamentError> {
        if !self.completed {
            return Err(TournamentError::NotYetCompleted);
        }
        self.check_seats(roster, named)?;

        self.undo(roster)?;
        self.assign(named, named_games, other_games, draws);
        self.apply(roster)?;

        log::info!(
            "fixed {} {}-{}-{} vs {}",
            roster.name_of(self.player1),
            self.p1_wins,
            self.p2_wins,
            self.draws,
            self.player2_name(roster)
        );
        Ok(())
    }

    pub fn winner(&self) -> Option<Opponent> {
        if !self.completed {
            return None;
        }
        match self.p1_wins.cmp(&self.p2_wins) {
            std::cmp::Ordering::Greater => Some(Opponent::Player(self.player1)),
            std::cmp::Ordering::Less => Some(self.player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn loser(&self) -> Option<Opponent> {
        if !self.completed {
            return None;
        }
        match self.p1_wins.cmp(&self.p2_wins) {
            std::cmp::Ordering::Greater => Some(self.player2),
            std::cmp::Ordering::Less => Some(Opponent::Player(self.player1)),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn player2_name<'a>(&self, roster: &'a Roster) -> &'a str {
        match self.player2 {
            Opponent::Player(id) => roster.name_of(id),
            Opponent::Bye => "bye",
        }
    }

    fn participants(&self) -> impl Iterator<Item = ParticipantId> {
        std::iter::once(self.player1).chain(self.player2.id())
    }

    fn check_seats(&self, roster: &Roster, named: ParticipantId) -> Result<(), TournamentError> {
        if !self.involves(named) {
            return Err(TournamentError::NotInMatch);
        }
        match self.participants().find(|id| !roster.contains(*id)) {
            Some(missing) => Err(TournamentError::UnknownParticipant(missing.to_string())),
            None => Ok(()),
        }
    }

    fn assign(&mut self, named: ParticipantId, named_games: u32, other_games: u32, draws: u32) {
        if named == self.player1 {
            self.p1_wins = named_games;
            self.p2_wins = other_games;
        } else {
            self.p2_wins = named_games;
            self.p1_wins = other_games;
        }
        self.draws = draws;
    }

    fn apply(&self, roster: &mut Roster) -> Result<(), TournamentError> {
        for id in self.participants() {
            if let Some(participant) = roster.get_mut(id) {
                participant.apply_result(self)?;
            }
        }
        Ok(())
    }

    fn undo(&self, roster: &mut Roster) -> Result<(), TournamentError> {
        let mut undone = Vec::new();
        for id in self.participants() {
            let Some(participant) = roster.get_mut(id) else {
                continue;
            };
            if let Err(err) = participant.undo_result(self) {
                // put back whatever was already undone so both sides stay consistent
                for done in undone {
                    if let Some(p) = roster.get_mut(done) {
                        p.apply_result(self)?;
                    }
                }
                return Err(err);
            }
            undone.push(id);
        }
        Ok(())
    }
}
