pub mod config;
pub mod error;
pub mod swiss;

pub use config::{Format, SwissConfig};
pub use error::{PairingError, TournamentError};
pub use swiss::{
    Match, Opponent, Participant, ParticipantId, Roster, RoundPairings, SwissPairer,
    ManualPairer, PairingOperator, ScriptedOperator, Round, Tournament, Standing,
};
