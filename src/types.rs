//! various types that are useful for working with the santorini board
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[allow(missing_docs)]
    One,
    #[allow(missing_docs)]
    Two,
}

impl Player {
    /// the other player
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// converts this player to a usize index. player one is index 0
    pub fn as_index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// the letter the notation uses for this player's pawns
    pub fn notation_letter(self) -> char {
        match self {
            Player::One => 'p',
            Player::Two => 'P',
        }
    }

    /// creates a Player from its notation letter
    pub fn from_notation_letter(letter: char) -> Option<Player> {
        match letter {
            'p' => Some(Player::One),
            'P' => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation_letter())
    }
}

/// The phase the interaction loop is in.
///
/// The phase is an explicit value a host threads through
/// [`GamePhase::advance`] rather than something mutated behind the
/// board's back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// the start pawns are still being put down
    SetStartPosition,
    /// waiting for the active player to pick one of their pawns
    SelectPawn,
    /// a pawn is picked and waiting for a destination cell
    MovePawn,
    /// the moved pawn must build a structure to finish the turn
    BuildStructure,
}

impl GamePhase {
    /// The phase that follows this one.
    ///
    /// Placement hands over to selection once, then selection, movement
    /// and building cycle for the rest of the game.
    pub fn advance(self) -> GamePhase {
        match self {
            GamePhase::SetStartPosition => GamePhase::SelectPawn,
            GamePhase::SelectPawn => GamePhase::MovePawn,
            GamePhase::MovePawn => GamePhase::BuildStructure,
            GamePhase::BuildStructure => GamePhase::SelectPawn,
        }
    }
}

/// How high a cell has been built up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureLevel {
    /// nothing built yet
    Ground,
    /// first level structure, notation letter `f`
    FirstLevel,
    /// second level structure, notation letter `s`
    SecondLevel,
    /// third level structure, notation letter `t`
    ThirdLevel,
    /// roof structure, notation letter `r`
    Roof,
}

impl StructureLevel {
    /// the notation letter for a built level, `None` for bare ground
    pub fn notation_letter(self) -> Option<char> {
        match self {
            StructureLevel::Ground => None,
            StructureLevel::FirstLevel => Some('f'),
            StructureLevel::SecondLevel => Some('s'),
            StructureLevel::ThirdLevel => Some('t'),
            StructureLevel::Roof => Some('r'),
        }
    }

    /// creates a StructureLevel from its notation letter
    pub fn from_notation_letter(letter: char) -> Option<StructureLevel> {
        match letter {
            'f' => Some(StructureLevel::FirstLevel),
            's' => Some(StructureLevel::SecondLevel),
            't' => Some(StructureLevel::ThirdLevel),
            'r' => Some(StructureLevel::Roof),
            _ => None,
        }
    }

    /// the level one build step up from this one; a roof cannot be raised
    pub fn raise(self) -> Option<StructureLevel> {
        match self {
            StructureLevel::Ground => Some(StructureLevel::FirstLevel),
            StructureLevel::FirstLevel => Some(StructureLevel::SecondLevel),
            StructureLevel::SecondLevel => Some(StructureLevel::ThirdLevel),
            StructureLevel::ThirdLevel => Some(StructureLevel::Roof),
            StructureLevel::Roof => None,
        }
    }
}

/// A game for which board positions can be identified and queried
pub trait PositionGettableGame {
    /// the native position type for this board
    type NativePositionType: Eq + Hash + Clone + Ord + PartialOrd + Debug;

    /// Check if the given position holds a pawn
    fn position_is_occupied(&self, pos: Self::NativePositionType) -> bool;
}

/// A game for which each player's pawns can be listed
pub trait PawnGettableGame: PositionGettableGame {
    /// the pawns a player currently has on the board
    fn get_pawns(&self, player: Player) -> Vec<Self::NativePositionType>;
}

/// a game for which the neighbors of a given position can be determined
pub trait NeighborDeterminableGame: PositionGettableGame {
    /// returns the neighboring positions
    fn neighbors(&self, pos: &Self::NativePositionType) -> Vec<Self::NativePositionType>;

    /// returns the neighboring positions, and the direction offset leading to each
    fn possible_steps(
        &self,
        pos: &Self::NativePositionType,
    ) -> Vec<(i32, Self::NativePositionType)>;
}

/// a game for which the size of the game board can be determined
pub trait SizeDeterminableGame {
    #[allow(missing_docs)]
    fn get_width(&self) -> u32;
    #[allow(missing_docs)]
    fn get_height(&self) -> u32;
}

/// a game for which the player to move next is determinable
pub trait TurnDeterminableGame {
    #[allow(missing_docs)]
    fn active_player(&self) -> Player;
}

/// a game for which a random reasonable step for each of the active
/// player's pawns can be determined. e.g. stay on the board, do not
/// stack pawns on one cell
pub trait RandomReasonableMovesGame: PositionGettableGame {
    #[allow(missing_docs)]
    fn random_reasonable_step_for_each_pawn(
        &self,
    ) -> Vec<(Self::NativePositionType, Self::NativePositionType)>;
}
