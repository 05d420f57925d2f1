//! A compact bitboard representation of the game state.
//!
//! Every per-cell fact is one bit in a 25-bit mask: one mask per
//! structure level and one per player's pawns. That keeps the whole
//! state `Copy` and makes the geometry queries the UI leans on (which
//! neighbor cells to highlight for a selected pawn) plain mask work.

pub mod geometry;

use crate::notation::{Notation, ParseNotationError};
use crate::types::{
    GamePhase, NeighborDeterminableGame, PawnGettableGame, Player, PositionGettableGame,
    RandomReasonableMovesGame, SizeDeterminableGame, StructureLevel, TurnDeterminableGame,
};
use geometry::{direction_offsets, legal_directions};
use rand::prelude::IteratorRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const BOARD_WIDTH: u8 = 5;

/// Number of cells on the board.
pub const CELL_COUNT: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// pawns each player gets to place
const PAWNS_PER_PLAYER: u32 = 2;

/// wrapper type for an index in to the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CellIndex(pub u8);

impl CellIndex {
    /// makes a new cell index from a row and column, row 0 at the top
    pub fn new(row: u8, col: u8) -> Self {
        CellIndex(row * BOARD_WIDTH + col)
    }

    /// makes a cell index from the notation's one-based cell number
    pub fn from_one_based(cell: u8) -> Option<Self> {
        if (1..=CELL_COUNT).contains(&cell) {
            Some(CellIndex(cell - 1))
        } else {
            None
        }
    }

    /// this index as the notation's one-based cell number
    pub fn one_based(self) -> u8 {
        self.0 + 1
    }

    /// get a usize from a CellIndex
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// the row this cell is in
    pub fn row(self) -> u8 {
        self.0 / BOARD_WIDTH
    }

    /// the column this cell is in
    pub fn col(self) -> u8 {
        self.0 % BOARD_WIDTH
    }

    /// The cell reached by applying a direction offset.
    ///
    /// Only bounds-checks the index range; callers feed it offsets that
    /// already passed [`geometry::legal_directions`].
    pub fn offset_by(self, offset: i32) -> Option<CellIndex> {
        let target = i32::from(self.0) + offset;
        if (0..i32::from(CELL_COUNT)).contains(&target) {
            Some(CellIndex(target as u8))
        } else {
            None
        }
    }

    pub(crate) fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Why a board action was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// the target cell already holds a pawn
    CellOccupied,
    /// the active player already has both pawns on the board
    AllPawnsPlaced,
    /// no pawn of the active player stands on the source cell
    NoPawnThere,
    /// the target cell is not adjacent to the source cell
    NotAdjacent,
    /// the cell is already built up to a roof
    RoofReached,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ActionError::CellOccupied => "the target cell already holds a pawn",
            ActionError::AllPawnsPlaced => "both pawns are already on the board",
            ActionError::NoPawnThere => "the active player has no pawn on the source cell",
            ActionError::NotAdjacent => "the target cell is not adjacent to the source cell",
            ActionError::RoofReached => "the cell is already built up to a roof",
        };
        write!(f, "{}", reason)
    }
}

impl std::error::Error for ActionError {}

/// A compact game state: one mask per structure level, one per player's
/// pawns, plus whose turn it is and the interaction phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitBoard {
    first: u32,
    second: u32,
    third: u32,
    roof: u32,
    pawns: [u32; 2],
    active_player: Player,
    phase: GamePhase,
}

impl Default for BitBoard {
    fn default() -> Self {
        BitBoard::new()
    }
}

impl BitBoard {
    /// An empty board waiting for the start pawns.
    pub fn new() -> Self {
        BitBoard {
            first: 0,
            second: 0,
            third: 0,
            roof: 0,
            pawns: [0; 2],
            active_player: Player::One,
            phase: GamePhase::SetStartPosition,
        }
    }

    /// Loads a board from its notation line.
    pub fn from_notation(line: &str) -> Result<Self, ParseNotationError> {
        line.parse::<Notation>().map(BitBoard::from)
    }

    /// the built level of a cell
    pub fn structure_level(&self, cell: CellIndex) -> StructureLevel {
        let mask = cell.mask();
        if self.roof & mask != 0 {
            StructureLevel::Roof
        } else if self.third & mask != 0 {
            StructureLevel::ThirdLevel
        } else if self.second & mask != 0 {
            StructureLevel::SecondLevel
        } else if self.first & mask != 0 {
            StructureLevel::FirstLevel
        } else {
            StructureLevel::Ground
        }
    }

    /// the pawn standing on a cell, if any
    pub fn pawn_at(&self, cell: CellIndex) -> Option<Player> {
        if self.pawns[Player::One.as_index()] & cell.mask() != 0 {
            Some(Player::One)
        } else if self.pawns[Player::Two.as_index()] & cell.mask() != 0 {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// the current interaction phase
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Puts one of the active player's start pawns on the board.
    ///
    /// Placement alternates between the players; once all four pawns
    /// are down the phase moves on to pawn selection.
    pub fn place_pawn(&mut self, cell: CellIndex) -> Result<(), ActionError> {
        if self.pawn_at(cell).is_some() {
            return Err(ActionError::CellOccupied);
        }
        let pawns = &mut self.pawns[self.active_player.as_index()];
        if pawns.count_ones() >= PAWNS_PER_PLAYER {
            return Err(ActionError::AllPawnsPlaced);
        }
        *pawns |= cell.mask();
        self.active_player = self.active_player.opponent();
        if self.all_pawns_placed() {
            self.phase = self.phase.advance();
        }
        Ok(())
    }

    /// Moves a pawn of the active player to an adjacent cell.
    ///
    /// Adjacency comes from the direction geometry; structure heights
    /// do not restrict the step. A successful move leaves the board
    /// waiting for the build that finishes the turn.
    pub fn move_pawn(&mut self, from: CellIndex, to: CellIndex) -> Result<(), ActionError> {
        if self.pawn_at(from) != Some(self.active_player) {
            return Err(ActionError::NoPawnThere);
        }
        if self.pawn_at(to).is_some() {
            return Err(ActionError::CellOccupied);
        }
        if !self.neighbors(&from).contains(&to) {
            return Err(ActionError::NotAdjacent);
        }
        let pawns = &mut self.pawns[self.active_player.as_index()];
        *pawns = *pawns & !from.mask() | to.mask();
        self.phase = GamePhase::BuildStructure;
        Ok(())
    }

    /// Builds one structure level on a cell and hands the turn over.
    pub fn build_structure(&mut self, cell: CellIndex) -> Result<(), ActionError> {
        if self.pawn_at(cell).is_some() {
            return Err(ActionError::CellOccupied);
        }
        let raised = self
            .structure_level(cell)
            .raise()
            .ok_or(ActionError::RoofReached)?;
        self.set_structure_level(cell, raised);
        self.active_player = self.active_player.opponent();
        self.phase = GamePhase::SelectPawn;
        Ok(())
    }

    /// The notation record for this position.
    ///
    /// The notation carries structures, active player and pawns; the
    /// interaction phase is not part of the format.
    pub fn notation(&self) -> Notation {
        Notation {
            first: self.first,
            second: self.second,
            third: self.third,
            roof: self.roof,
            active_player: self.active_player,
            first_player_pawns: self.pawn_pair(Player::One),
            second_player_pawns: self.pawn_pair(Player::Two),
        }
    }

    fn pawn_pair(&self, player: Player) -> [Option<CellIndex>; 2] {
        let mut pawns = self.get_pawns(player).into_iter();
        [pawns.next(), pawns.next()]
    }

    fn all_pawns_placed(&self) -> bool {
        self.pawns
            .iter()
            .all(|mask| mask.count_ones() == PAWNS_PER_PLAYER)
    }

    fn set_structure_level(&mut self, cell: CellIndex, level: StructureLevel) {
        let mask = cell.mask();
        self.first &= !mask;
        self.second &= !mask;
        self.third &= !mask;
        self.roof &= !mask;
        match level {
            StructureLevel::Ground => {}
            StructureLevel::FirstLevel => self.first |= mask,
            StructureLevel::SecondLevel => self.second |= mask,
            StructureLevel::ThirdLevel => self.third |= mask,
            StructureLevel::Roof => self.roof |= mask,
        }
    }
}

impl From<Notation> for BitBoard {
    fn from(notation: Notation) -> Self {
        let pawns = [
            pawn_mask(&notation.first_player_pawns),
            pawn_mask(&notation.second_player_pawns),
        ];
        let all_placed = pawns
            .iter()
            .all(|mask| mask.count_ones() == PAWNS_PER_PLAYER);
        BitBoard {
            first: notation.first,
            second: notation.second,
            third: notation.third,
            roof: notation.roof,
            pawns,
            active_player: notation.active_player,
            phase: if all_placed {
                GamePhase::SelectPawn
            } else {
                GamePhase::SetStartPosition
            },
        }
    }
}

fn pawn_mask(pawns: &[Option<CellIndex>; 2]) -> u32 {
    pawns
        .iter()
        .flatten()
        .fold(0, |mask, cell| mask | cell.mask())
}

impl PositionGettableGame for BitBoard {
    type NativePositionType = CellIndex;

    fn position_is_occupied(&self, pos: CellIndex) -> bool {
        self.pawn_at(pos).is_some()
    }
}

impl PawnGettableGame for BitBoard {
    fn get_pawns(&self, player: Player) -> Vec<CellIndex> {
        let mask = self.pawns[player.as_index()];
        (0..CELL_COUNT)
            .map(CellIndex)
            .filter(|cell| mask & cell.mask() != 0)
            .collect()
    }
}

impl SizeDeterminableGame for BitBoard {
    fn get_width(&self) -> u32 {
        u32::from(BOARD_WIDTH)
    }

    fn get_height(&self) -> u32 {
        u32::from(BOARD_WIDTH)
    }
}

impl TurnDeterminableGame for BitBoard {
    fn active_player(&self) -> Player {
        self.active_player
    }
}

impl NeighborDeterminableGame for BitBoard {
    fn neighbors(&self, pos: &CellIndex) -> Vec<CellIndex> {
        self.possible_steps(pos)
            .into_iter()
            .map(|(_, cell)| cell)
            .collect()
    }

    fn possible_steps(&self, pos: &CellIndex) -> Vec<(i32, CellIndex)> {
        let offsets = direction_offsets(BOARD_WIDTH);
        legal_directions(BOARD_WIDTH, &offsets, pos.as_usize() as i32)
            .into_iter()
            .filter_map(|offset| pos.offset_by(offset).map(|cell| (offset, cell)))
            .collect()
    }
}

impl RandomReasonableMovesGame for BitBoard {
    fn random_reasonable_step_for_each_pawn(&self) -> Vec<(CellIndex, CellIndex)> {
        self.get_pawns(self.active_player)
            .into_iter()
            .filter_map(|pawn| {
                self.neighbors(&pawn)
                    .into_iter()
                    .filter(|cell| !self.position_is_occupied(*cell))
                    .choose(&mut thread_rng())
                    .map(|to| (pawn, to))
            })
            .collect()
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in 0..BOARD_WIDTH {
            for col in 0..BOARD_WIDTH {
                let cell = CellIndex::new(row, col);
                let glyph = match self.pawn_at(cell) {
                    Some(player) => player.notation_letter(),
                    None => self
                        .structure_level(cell)
                        .notation_letter()
                        .unwrap_or('.'),
                };
                write!(f, "{} ", glyph)?;
            }
            writeln!(f)?;
        }
        write!(f, "({} to act, phase: {:?})", self.active_player, self.phase)
    }
}
