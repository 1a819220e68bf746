use crate::error::PuzzleError;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SIZE: usize = 3;
pub const CELLS: usize = SIZE * SIZE;

/// The canonical solved arrangement, blank in the bottom-right corner.
pub const GOAL: State = State {
    tiles: [1, 2, 3, 4, 5, 6, 7, 8, 0],
    blank: 8,
};

/// Direction the blank travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// (row, col) offset applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A 3x3 arrangement of tiles 1..=8 plus the blank (0), stored row-major.
///
/// Construction always validates the permutation, so every `State` in hand
/// is a legal board. Equality and hashing cover the full tile sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct State {
    tiles: [u8; CELLS],
    blank: u8,
}

impl State {
    pub fn new(tiles: [u8; CELLS]) -> Result<Self, PuzzleError> {
        Self::from_tiles(&tiles)
    }

    /// Builds a state from any slice, rejecting anything that is not a permutation of 0..=8.
    pub fn from_tiles(values: &[u8]) -> Result<Self, PuzzleError> {
        if values.len() != CELLS {
            return Err(PuzzleError::InvalidState(format!(
                "expected {} tiles, found {}",
                CELLS,
                values.len()
            )));
        }

        let mut seen = [false; CELLS];
        let mut tiles = [0u8; CELLS];
        let mut blank = 0;
        for (i, &value) in values.iter().enumerate() {
            let slot = seen.get_mut(value as usize).ok_or_else(|| {
                PuzzleError::InvalidState(format!("tile {} at index {} is out of range 0..=8", value, i))
            })?;
            if *slot {
                return Err(PuzzleError::InvalidState(format!("tile {} appears more than once", value)));
            }
            *slot = true;
            tiles[i] = value;
            if value == 0 {
                blank = i as u8;
            }
        }

        Ok(Self { tiles, blank })
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank as usize
    }

    pub fn is_goal(&self) -> bool {
        *self == GOAL
    }

    pub fn apply_move(&mut self, movement: Move) -> bool {
        let (dr, dc) = movement.as_offset();
        let row = (self.blank() / SIZE) as isize + dr;
        let col = (self.blank() % SIZE) as isize + dc;

        if row >= 0 && row < SIZE as isize && col >= 0 && col < SIZE as isize {
            let target = row as usize * SIZE + col as usize;
            let blank = self.blank();
            self.tiles.swap(blank, target);
            self.blank = target as u8;
            true
        } else {
            false
        }
    }

    pub fn try_move(&self, dir: Move) -> Option<Self> {
        let mut next = *self;
        if next.apply_move(dir) {
            Some(next)
        } else {
            None
        }
    }

    /// Legal successors, in the fixed order of `Move::ALL`.
    pub fn neighbors(&self) -> impl Iterator<Item = (Move, State)> {
        let state = *self;
        Move::ALL
            .into_iter()
            .filter_map(move |dir| state.try_move(dir).map(|next| (dir, next)))
    }

    /// Replays `moves` in order, failing on the first one that would push the blank off the board.
    pub fn apply_moves(&self, moves: &[Move]) -> Result<Self, PuzzleError> {
        let mut state = *self;
        for (i, &dir) in moves.iter().enumerate() {
            if !state.apply_move(dir) {
                return Err(off_board(i, dir));
            }
        }
        Ok(state)
    }

    /// Walks the blank `steps` times in uniformly random legal directions starting from `GOAL`.
    pub fn scrambled<R: Rng + ?Sized>(rng: &mut R, steps: usize) -> Self {
        let mut state = GOAL;
        for _ in 0..steps {
            if let Some((_, next)) = state.neighbors().choose(rng) {
                state = next;
            }
        }
        state
    }

    /// Whether this state and `other` lie in the same half of the permutation group.
    pub fn same_parity(&self, other: &State) -> bool {
        Self::count_inversions(&self.tiles) % 2 == Self::count_inversions(&other.tiles) % 2
    }

    pub fn is_solvable(&self) -> bool {
        // Odd width: the blank's row never changes inversion parity.
        self.same_parity(&GOAL)
    }

    fn count_inversions(flattened: &[u8]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }
}

/// Error for the zero-based `index`-th move of a sequence stepping off the grid.
pub(crate) fn off_board(index: usize, dir: Move) -> PuzzleError {
    PuzzleError::InvalidState(format!("move {} ({}) leaves the board", index + 1, dir))
}

impl TryFrom<Vec<u8>> for State {
    type Error = PuzzleError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_tiles(&values)
    }
}

impl From<State> for Vec<u8> {
    fn from(state: State) -> Self {
        state.tiles.to_vec()
    }
}

/// Accepts `"123456780"` or any comma/whitespace separated list such as `"1, 2, 3, 4, 5, 6, 7, 8, 0"`.
impl FromStr for State {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let values: Vec<u8> = if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            s.bytes().map(|b| b - b'0').collect()
        } else {
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token
                        .parse::<u8>()
                        .map_err(|_| PuzzleError::InvalidState(format!("'{}' is not a tile number", token)))
                })
                .collect::<Result<_, _>>()?
        };
        Self::from_tiles(&values)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(SIZE) {
            for &val in row {
                if val == 0 {
                    write!(f, " _ ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn state(tiles: [u8; CELLS]) -> State {
        State::new(tiles).unwrap()
    }

    #[test]
    fn test_goal_constant_is_valid() {
        assert_eq!(State::new([1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap(), GOAL);
        assert_eq!(GOAL.blank(), 8);
        assert!(GOAL.is_goal());
    }

    #[test]
    fn test_rejects_non_permutations() {
        assert!(matches!(State::from_tiles(&[1, 2, 3]), Err(PuzzleError::InvalidState(_))));
        assert!(matches!(
            State::new([1, 1, 3, 4, 5, 6, 7, 8, 0]),
            Err(PuzzleError::InvalidState(_))
        ));
        assert!(matches!(
            State::new([9, 2, 3, 4, 5, 6, 7, 8, 0]),
            Err(PuzzleError::InvalidState(_))
        ));
    }

    #[test]
    fn test_neighbor_counts_by_blank_position() {
        // corner, edge, centre
        assert_eq!(GOAL.neighbors().count(), 2);
        assert_eq!(state([1, 2, 3, 4, 5, 0, 7, 8, 6]).neighbors().count(), 3);
        assert_eq!(state([1, 2, 3, 4, 0, 6, 7, 5, 8]).neighbors().count(), 4);
    }

    #[test]
    fn test_neighbors_are_distinct_and_exclude_origin() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let origin = State::scrambled(&mut rng, 30);
            let successors: Vec<_> = origin.neighbors().collect();
            let unique: HashSet<State> = successors.iter().map(|&(_, s)| s).collect();
            assert_eq!(unique.len(), successors.len());
            assert!(!unique.contains(&origin));
        }
    }

    #[test]
    fn test_neighbors_are_deterministic() {
        let origin = state([1, 2, 3, 4, 0, 6, 7, 5, 8]);
        let first: Vec<_> = origin.neighbors().collect();
        let second: Vec<_> = origin.neighbors().collect();
        assert_eq!(first, second);
        let dirs: Vec<Move> = first.iter().map(|&(m, _)| m).collect();
        assert_eq!(dirs, Move::ALL.to_vec());
    }

    #[test]
    fn test_inverse_move_restores_state() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let origin = State::scrambled(&mut rng, 25);
            for (dir, next) in origin.neighbors() {
                assert_eq!(next.try_move(dir.opposite()), Some(origin));
            }
        }
    }

    #[test]
    fn test_move_direction_is_the_blank() {
        let next = GOAL.try_move(Move::Up).unwrap();
        assert_eq!(next.tiles(), &[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        assert_eq!(next.blank(), 5);
        assert!(GOAL.try_move(Move::Down).is_none());
        assert!(GOAL.try_move(Move::Right).is_none());
    }

    #[test]
    fn test_apply_move_in_place() {
        let mut board = GOAL;
        assert!(board.apply_move(Move::Left));
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.blank(), 7);
        assert!(!board.apply_move(Move::Down));
        assert_eq!(board.blank(), 7);
    }

    #[test]
    fn test_apply_moves_reports_illegal_step() {
        let start = state([1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert_eq!(start.apply_moves(&[Move::Down, Move::Right]).unwrap(), GOAL);
        let err = start.apply_moves(&[Move::Down, Move::Down]).unwrap_err();
        assert!(err.to_string().contains("move 2"));
    }

    #[test]
    fn test_parity() {
        assert!(GOAL.is_solvable());
        let swapped = state([2, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert!(!swapped.is_solvable());
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(State::scrambled(&mut rng, 50).is_solvable());
        }
    }

    #[test]
    fn test_parse_formats() {
        let compact: State = "123405786".parse().unwrap();
        let listed: State = "1, 2, 3, 4, 0, 5, 7, 8, 6".parse().unwrap();
        let spaced: State = "1 2 3\n4 0 5\n7 8 6".parse().unwrap();
        assert_eq!(compact, listed);
        assert_eq!(compact, spaced);
        assert!("12345678".parse::<State>().is_err());
        assert!("1,2,x,4,5,6,7,8,0".parse::<State>().is_err());
        assert!("".parse::<State>().is_err());
    }

    #[test]
    fn test_display_grid() {
        assert_eq!(GOAL.to_string(), " 1  2  3 \n 4  5  6 \n 7  8  _ \n");
    }

    #[test]
    fn test_serde_as_array() {
        let json = serde_json::to_string(&GOAL).unwrap();
        assert_eq!(json, "[1,2,3,4,5,6,7,8,0]");
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GOAL);
        assert!(serde_json::from_str::<State>("[1,1,3,4,5,6,7,8,0]").is_err());
        assert_eq!(serde_json::to_string(&Move::Left).unwrap(), "\"Left\"");
    }
}
