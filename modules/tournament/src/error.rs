use thiserror::Error;

use crate::swiss::ParticipantId;

/// Reasons a single pairing pass can fail. None of these are fatal: the
/// round driver retries or falls back to manual pairing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    #[error("{player1} has already played {player2}")]
    RematchCollision {
        player1: ParticipantId,
        player2: ParticipantId,
    },
    #[error("No valid pairing found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
    #[error("Bracket closed without members while players remain unpaired")]
    BracketAbandoned,
    #[error("Manual pairing restarted {restarts} times without success")]
    RestartsExhausted { restarts: u32 },
}

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error("Match has already been reported")]
    AlreadyCompleted,
    #[error("Match has not been reported yet")]
    NotYetCompleted,
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Participant name must not be empty")]
    EmptyName,
    #[error("Participant name already taken: {0}")]
    DuplicateName(String),
    #[error("Participant is not part of this match")]
    NotInMatch,
    #[error("Match result was never applied to this participant")]
    ResultNotApplied,
    #[error("No open match for {0}")]
    NoOpenMatch(String),
    #[error("No completed match for {0}")]
    NoCompletedMatch(String),
    #[error("{0} is not active")]
    NotActive(String),
    #[error("{0} is already active")]
    AlreadyActive(String),
    #[error("Current round still has unreported matches")]
    RoundInProgress,
    #[error("Pairing error: {0}")]
    Pairing(#[from] PairingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
