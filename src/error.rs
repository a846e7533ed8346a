use thiserror::Error;

/// The result of attempting to perform an invalid operation on a game or session.
///
/// The display text of each variant is the message a transport should relay
/// back to the user who triggered the operation.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameError {
    #[error("there is a game already ongoing")]
    GameAlreadyOngoing,
    #[error("no game is running on this channel")]
    GameNotFound,
    #[error("the game is not in progress")]
    GameNotInProgress,
    #[error("too few players to start a game")]
    TooFewPlayers,
    #[error("you have already joined this game")]
    PlayerAlreadyJoined,
    #[error("cannot join a game in progress")]
    CannotJoinStartedGame,
    #[error("sorry, you are not part of the current game")]
    NotInGame,
    #[error("sorry, you're dead")]
    VoterDead,
    #[error("you have to vote for someone! (Or no-lynch!)")]
    NoTargetSpecified,
    #[error("that player is not in the game")]
    TargetNotInGame,
    #[error("you have to vote for someone alive!")]
    TargetDead,
    #[error("you are already voting for no lynch")]
    AlreadyNoLynch,
    #[error("only the mafia may vote at night")]
    NotMafia,
}
