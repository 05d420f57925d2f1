#![allow(missing_docs)]
//! The single-line board notation.
//!
//! A board is written as four space-separated sections: structure
//! rows, active player, first player pawns, second player pawns.
//!
//! ```plain
//! 2ff1/1srrt/4t/3ff/1ssf1 p 4p13 5P20
//! ```
//!
//! The first section holds five `/`-separated row descriptors, top row
//! first. Inside a row, `f`/`s`/`t`/`r` place a structure of that
//! level and a digit `1`-`5` skips that many empty cells; each row has
//! to account for exactly five cells. The second section is the player
//! to move next, `p` for the first player, `P` for the second. The two
//! pawn sections count cells 1 to 25 from the top left in reading
//! order, with the player's own letter between their two cells; a cell
//! that is `0` or left out is a pawn not yet placed.
//!
//! Pawn counts are not checked against whose turn it is, so a line can
//! describe a placement no real game reaches.

use crate::board_representation::{CellIndex, BOARD_WIDTH, CELL_COUNT};
use crate::types::Player;
use fxhash::FxHashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Why a notation line was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseNotationError {
    /// the line holds a character outside the notation alphabet
    IllegalCharacter,
    /// the line does not split into the four sections
    WrongSectionCount,
    /// the structure section does not hold exactly five rows
    WrongRowCount,
    /// a row descriptor does not account for exactly five cells
    MalformedRow,
    /// the active player section is not a single `p` or `P`
    MalformedActivePlayer,
    /// a pawn section holds stray characters or more than two cells
    MalformedPawns,
    /// a pawn cell number is outside 1 to 25
    PawnOutOfRange,
    /// two pawns share a cell
    DuplicatePawn,
}

impl fmt::Display for ParseNotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ParseNotationError::IllegalCharacter => {
                "line holds a character outside the notation alphabet"
            }
            ParseNotationError::WrongSectionCount => {
                "expected structure rows, active player and two pawn sections"
            }
            ParseNotationError::WrongRowCount => "expected exactly five structure rows",
            ParseNotationError::MalformedRow => "row does not describe exactly five cells",
            ParseNotationError::MalformedActivePlayer => {
                "active player must be a single `p` or `P`"
            }
            ParseNotationError::MalformedPawns => {
                "pawn section holds stray characters or more than two cells"
            }
            ParseNotationError::PawnOutOfRange => "pawn cell must be between 1 and 25",
            ParseNotationError::DuplicatePawn => "two pawns share a cell",
        };
        write!(f, "{}", reason)
    }
}

impl std::error::Error for ParseNotationError {}

/// A parsed notation line: structure layout, active player and pawn
/// placement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notation {
    /// first level structure mask
    pub first: u32,
    /// second level structure mask
    pub second: u32,
    /// third level structure mask
    pub third: u32,
    /// roof structure mask
    pub roof: u32,
    /// the player to move next
    pub active_player: Player,
    /// the first player's pawn cells, `None` while not placed
    pub first_player_pawns: [Option<CellIndex>; 2],
    /// the second player's pawn cells, `None` while not placed
    pub second_player_pawns: [Option<CellIndex>; 2],
}

/// Checks a line against the notation grammar.
pub fn is_valid(line: &str) -> bool {
    line.parse::<Notation>().is_ok()
}

impl FromStr for Notation {
    type Err = ParseNotationError;

    #[instrument]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if !line.chars().all(is_notation_char) {
            return Err(ParseNotationError::IllegalCharacter);
        }
        let sections: Vec<&str> = line.split(' ').collect();
        let (rows, active, first_section, second_section) = match sections.as_slice() {
            [rows, active, first, second] => (*rows, *active, *first, *second),
            _ => return Err(ParseNotationError::WrongSectionCount),
        };

        let (first, second, third, roof) = parse_structure_rows(rows)?;
        let active_player = parse_active_player(active)?;
        let first_player_pawns = parse_pawn_section(first_section, Player::One)?;
        let second_player_pawns = parse_pawn_section(second_section, Player::Two)?;
        check_pawn_cells(&first_player_pawns, &second_player_pawns)?;

        Ok(Notation {
            first,
            second,
            third,
            roof,
            active_player,
            first_player_pawns,
            second_player_pawns,
        })
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..BOARD_WIDTH).map(|row| self.row_descriptor(row)).join("/");
        write!(
            f,
            "{} {} {} {}",
            rows,
            self.active_player,
            pawn_section(&self.first_player_pawns, Player::One),
            pawn_section(&self.second_player_pawns, Player::Two)
        )
    }
}

impl Notation {
    fn structure_letter(&self, cell: CellIndex) -> Option<char> {
        let mask = cell.mask();
        if self.roof & mask != 0 {
            Some('r')
        } else if self.third & mask != 0 {
            Some('t')
        } else if self.second & mask != 0 {
            Some('s')
        } else if self.first & mask != 0 {
            Some('f')
        } else {
            None
        }
    }

    fn row_descriptor(&self, row: u8) -> String {
        let mut descriptor = String::new();
        let mut empty_run = 0u32;
        for col in 0..BOARD_WIDTH {
            match self.structure_letter(CellIndex::new(row, col)) {
                Some(letter) => {
                    if empty_run > 0 {
                        descriptor.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    descriptor.push(letter);
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            descriptor.push_str(&empty_run.to_string());
        }
        descriptor
    }
}

fn is_notation_char(c: char) -> bool {
    matches!(c, 'f' | 's' | 't' | 'r' | 'p' | 'P' | '0'..='9' | '/' | ' ')
}

fn parse_structure_rows(section: &str) -> Result<(u32, u32, u32, u32), ParseNotationError> {
    let rows: Vec<&str> = section.split('/').collect();
    if rows.len() != usize::from(BOARD_WIDTH) {
        return Err(ParseNotationError::WrongRowCount);
    }
    let width = u32::from(BOARD_WIDTH);
    let (mut first, mut second, mut third, mut roof) = (0u32, 0u32, 0u32, 0u32);
    for (row_index, row) in rows.iter().enumerate() {
        let mut col = 0u32;
        for c in row.chars() {
            match c {
                '1'..='5' => col += c as u32 - '0' as u32,
                'f' | 's' | 't' | 'r' => {
                    if col >= width {
                        return Err(ParseNotationError::MalformedRow);
                    }
                    let mask = 1u32 << (row_index as u32 * width + col);
                    match c {
                        'f' => first |= mask,
                        's' => second |= mask,
                        't' => third |= mask,
                        _ => roof |= mask,
                    }
                    col += 1;
                }
                _ => return Err(ParseNotationError::MalformedRow),
            }
        }
        // digit runs and structure letters have to cover the row exactly
        if col != width {
            return Err(ParseNotationError::MalformedRow);
        }
    }
    Ok((first, second, third, roof))
}

fn parse_active_player(section: &str) -> Result<Player, ParseNotationError> {
    let mut letters = section.chars();
    let player = letters
        .next()
        .and_then(Player::from_notation_letter)
        .ok_or(ParseNotationError::MalformedActivePlayer)?;
    if letters.next().is_some() {
        return Err(ParseNotationError::MalformedActivePlayer);
    }
    Ok(player)
}

fn parse_pawn_section(
    section: &str,
    player: Player,
) -> Result<[Option<CellIndex>; 2], ParseNotationError> {
    let separator = player.notation_letter();
    if !section.chars().all(|c| c.is_ascii_digit() || c == separator) {
        return Err(ParseNotationError::MalformedPawns);
    }
    let parts: Vec<&str> = section.split(separator).collect();
    if parts.len() > 2 {
        return Err(ParseNotationError::MalformedPawns);
    }
    let mut cells = [None, None];
    for (slot, part) in cells.iter_mut().zip(parts) {
        *slot = parse_pawn_cell(part)?;
    }
    Ok(cells)
}

fn parse_pawn_cell(part: &str) -> Result<Option<CellIndex>, ParseNotationError> {
    if part.is_empty() {
        // a left-out cell is a pawn that is not placed yet
        return Ok(None);
    }
    let cell: u32 = part
        .parse()
        .map_err(|_| ParseNotationError::PawnOutOfRange)?;
    if cell == 0 {
        return Ok(None);
    }
    if cell > u32::from(CELL_COUNT) {
        return Err(ParseNotationError::PawnOutOfRange);
    }
    Ok(CellIndex::from_one_based(cell as u8))
}

fn check_pawn_cells(
    first: &[Option<CellIndex>; 2],
    second: &[Option<CellIndex>; 2],
) -> Result<(), ParseNotationError> {
    let mut seen = FxHashSet::default();
    for cell in first.iter().chain(second.iter()).flatten() {
        if !seen.insert(*cell) {
            return Err(ParseNotationError::DuplicatePawn);
        }
    }
    Ok(())
}

fn pawn_section(pawns: &[Option<CellIndex>; 2], player: Player) -> String {
    let cell = |slot: &Option<CellIndex>| match slot {
        Some(cell) => cell.one_based().to_string(),
        None => "0".to_string(),
    };
    format!(
        "{}{}{}",
        cell(&pawns[0]),
        player.notation_letter(),
        cell(&pawns[1])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_LINE: &str = "2ff1/1srrt/4t/3ff/1ssf1 p 4p13 5P20";

    #[test]
    fn test_accepts_the_reference_line() {
        assert!(is_valid(REFERENCE_LINE));
        assert!(is_valid("2ff1/1ssst/4t/3ff/1ssf1 p 4p13 5P20"));
    }

    #[test]
    fn test_accepts_boards_without_pawns() {
        assert!(is_valid("5/5/5/5/5 p 0p0 0P0"));
        assert!(is_valid("5/5/5/5/5 P p P"));
    }

    #[test]
    fn test_rejects_a_non_ascii_look_alike_player_letter() {
        // the active player letter below is the Cyrillic er, not `p`
        assert!(!is_valid("2ff1/1ssst/4t/3ff/1ssf1 р 4p13 5P20"));
    }

    #[test]
    fn test_rejects_characters_outside_the_alphabet() {
        assert!(!is_valid("2ff1/1ssst/4t/3ff/1ssf1 p 4p13 5P20@"));
        assert!(!is_valid("2ff1|1ssst|4t|3ff|1ssf1 p 4p13 5P20"));
    }

    #[test]
    fn test_rejects_a_two_letter_active_player() {
        assert!(!is_valid("2ff1/1srrt/4t/3ff/1ssf1 pp 4p13 5P20"));
    }

    #[test]
    fn test_rejects_rows_that_miss_the_cell_count() {
        // first row covers six cells
        assert!(!is_valid("2ff2/1ssst/4t/3ff/1ssf1 p 4p13 5P20"));
        // first row covers four cells
        assert!(!is_valid("2ff/1ssst/4t/3ff/1ssf1 p 4p13 5P20"));
        // zero is not a run length inside a row
        assert!(!is_valid("0ff3/1ssst/4t/3ff/1ssf1 p 4p13 5P20"));
    }

    #[test]
    fn test_rejects_wrong_row_counts() {
        assert!(!is_valid("5/5/5/5 p 0p0 0P0"));
        assert!(!is_valid("5/5/5/5/5/5 p 0p0 0P0"));
    }

    #[test]
    fn test_rejects_wrong_section_counts() {
        assert!(!is_valid("5/5/5/5/5 p 0p0"));
        assert!(!is_valid("5/5/5/5/5 p 0p0 0P0 extra"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_rejects_pawns_off_the_board() {
        assert!(!is_valid("5/5/5/5/5 p 26p13 5P20"));
        assert!(!is_valid("5/5/5/5/5 p 4p13 5P100"));
    }

    #[test]
    fn test_rejects_stacked_pawns() {
        assert!(!is_valid("5/5/5/5/5 p 4p13 4P20"));
        assert!(!is_valid("5/5/5/5/5 p 4p4 5P20"));
    }

    #[test]
    fn test_unplaced_pawns_share_the_zero_cell_freely() {
        assert!(is_valid("5/5/5/5/5 p 0p0 0P0"));
        assert!(is_valid("5/5/5/5/5 p 0p13 0P20"));
    }

    #[test]
    fn test_rejects_the_wrong_pawn_separator() {
        // the first player's section must use the lowercase letter
        assert!(!is_valid("5/5/5/5/5 p 4P13 5P20"));
        assert!(!is_valid("5/5/5/5/5 p 4p13 5p20"));
    }

    #[test]
    fn test_rejects_a_third_pawn() {
        assert!(!is_valid("5/5/5/5/5 p 1p2p3 5P20"));
    }

    #[test]
    fn test_parses_the_reference_line() {
        let notation: Notation = REFERENCE_LINE.parse().unwrap();
        assert_eq!(notation.active_player, Player::One);
        assert_eq!(
            notation.first_player_pawns,
            [Some(CellIndex(3)), Some(CellIndex(12))]
        );
        assert_eq!(
            notation.second_player_pawns,
            [Some(CellIndex(4)), Some(CellIndex(19))]
        );
        assert_eq!(
            notation.first,
            (1 << 2) | (1 << 3) | (1 << 18) | (1 << 19) | (1 << 23)
        );
        assert_eq!(notation.second, (1 << 6) | (1 << 21) | (1 << 22));
        assert_eq!(notation.third, (1 << 9) | (1 << 14));
        assert_eq!(notation.roof, (1 << 7) | (1 << 8));
    }

    #[test]
    fn test_display_round_trips() {
        let notation: Notation = REFERENCE_LINE.parse().unwrap();
        assert_eq!(notation.to_string(), REFERENCE_LINE);
        let empty: Notation = "5/5/5/5/5 P 0p0 0P0".parse().unwrap();
        assert_eq!(empty.to_string(), "5/5/5/5/5 P 0p0 0P0");
    }

    #[test]
    fn test_errors_name_the_offending_section() {
        assert_eq!(
            "5/5/5/5 p 0p0 0P0".parse::<Notation>(),
            Err(ParseNotationError::WrongRowCount)
        );
        assert_eq!(
            "5/5/5/5/5 P5 0p0 0P0".parse::<Notation>(),
            Err(ParseNotationError::MalformedActivePlayer)
        );
        assert_eq!(
            "5/5/5/5/5 p 1p2p3 0P0".parse::<Notation>(),
            Err(ParseNotationError::MalformedPawns)
        );
        assert_eq!(
            "5/5/5/5/5 p 4p13 4P20".parse::<Notation>(),
            Err(ParseNotationError::DuplicatePawn)
        );
        assert_eq!(
            "5/5/5/5/5 p 26p0 0P0".parse::<Notation>(),
            Err(ParseNotationError::PawnOutOfRange)
        );
        assert_eq!(
            "5/5/5/5/5 x 0p0 0P0".parse::<Notation>(),
            Err(ParseNotationError::IllegalCharacter)
        );
    }

    #[test]
    fn test_notations_serialize_for_the_ui() {
        let notation: Notation = REFERENCE_LINE.parse().unwrap();
        let json = serde_json::to_string(&notation).unwrap();
        let back: Notation = serde_json::from_str(&json).unwrap();
        assert_eq!(notation, back);
    }
}
