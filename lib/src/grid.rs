use std::collections::HashSet;
use std::fmt;

/// Number of rows and columns on a bingo board.
pub const GRID: usize = 5;

/// One recognized board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// A printed number in 1..=75.
    Number(u8),
    /// The fixed center position, pre-marked by convention.
    Free,
    /// Recognition failed for this position.
    Unrecognized,
}

impl Cell {
    /// Demote anything outside the game's 1..=75 number range.
    pub(crate) fn from_value(value: u32) -> Cell {
        if (1..=75).contains(&value) {
            Cell::Number(value as u8)
        } else {
            Cell::Unrecognized
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Number(n) => f.pad(&n.to_string()),
            Cell::Free => f.pad("FREE"),
            Cell::Unrecognized => f.pad("ERR"),
        }
    }
}

/// Marked positions on a board, row-major.
pub type HitMask = [[bool; GRID]; GRID];

/// A recognized board: 25 cells, row-major, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid([[Cell; GRID]; GRID]);

impl Grid {
    pub(crate) fn from_rows(rows: [[Cell; GRID]; GRID]) -> Grid {
        Grid(rows)
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.0[row][col]
    }

    /// Iterate the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; GRID]> {
        self.0.iter()
    }

    /// True when no cell carries the failure marker.
    ///
    /// A typical caller rejects an incomplete grid and asks the player
    /// for a clearer photo.
    pub fn is_complete(&self) -> bool {
        self.0
            .iter()
            .flatten()
            .all(|cell| *cell != Cell::Unrecognized)
    }

    /// Mark which positions count as hit given the drawn numbers.
    ///
    /// The free center is always hit; a failed cell never is.
    pub fn hits(&self, drawn: &HashSet<u8>) -> HitMask {
        let mut hit = [[false; GRID]; GRID];
        for (r, row) in self.0.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                hit[r][c] = match cell {
                    Cell::Free => true,
                    Cell::Number(n) => drawn.contains(n),
                    Cell::Unrecognized => false,
                };
            }
        }
        hit
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let board = self
            .0
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| format!("{:>4}", cell))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", board)
    }
}

/// Winning arrangement the session is playing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinPattern {
    /// Any full row, column, or diagonal.
    Standard,
    /// All four corner cells.
    Corners,
    /// Both diagonals complete.
    X,
}

/// Check a hit mask for bingo under the given pattern.
///
/// Four corners always count as a valid bingo, whatever the configured
/// pattern.
pub fn check_bingo(hit: &HitMask, pattern: WinPattern) -> bool {
    if has_corners(hit) {
        return true;
    }
    match pattern {
        WinPattern::Standard => has_standard(hit),
        WinPattern::Corners => has_corners(hit),
        WinPattern::X => has_x(hit),
    }
}

fn has_standard(hit: &HitMask) -> bool {
    for r in 0..GRID {
        if (0..GRID).all(|c| hit[r][c]) {
            return true;
        }
    }
    for c in 0..GRID {
        if (0..GRID).all(|r| hit[r][c]) {
            return true;
        }
    }
    (0..GRID).all(|i| hit[i][i]) || (0..GRID).all(|i| hit[i][GRID - 1 - i])
}

fn has_corners(hit: &HitMask) -> bool {
    hit[0][0] && hit[0][GRID - 1] && hit[GRID - 1][0] && hit[GRID - 1][GRID - 1]
}

fn has_x(hit: &HitMask) -> bool {
    (0..GRID).all(|i| hit[i][i]) && (0..GRID).all(|i| hit[i][GRID - 1 - i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut rows = [[Cell::Unrecognized; GRID]; GRID];
        for r in 0..GRID {
            for c in 0..GRID {
                rows[r][c] = Cell::from_value((r * GRID + c + 1) as u32);
            }
        }
        rows[2][2] = Cell::Free;
        Grid::from_rows(rows)
    }

    #[test]
    fn from_value_enforces_range() {
        assert_eq!(Cell::from_value(0), Cell::Unrecognized);
        assert_eq!(Cell::from_value(1), Cell::Number(1));
        assert_eq!(Cell::from_value(75), Cell::Number(75));
        assert_eq!(Cell::from_value(76), Cell::Unrecognized);
        assert_eq!(Cell::from_value(176), Cell::Unrecognized);
    }

    #[test]
    fn hits_free_and_drawn() {
        let grid = sample_grid();
        let drawn: HashSet<u8> = [1, 2, 3].iter().copied().collect();
        let hit = grid.hits(&drawn);
        assert!(hit[0][0] && hit[0][1] && hit[0][2]);
        assert!(!hit[0][3]);
        assert!(hit[2][2], "free center is always hit");
    }

    #[test]
    fn unrecognized_never_hits() {
        let mut rows = [[Cell::Unrecognized; GRID]; GRID];
        rows[2][2] = Cell::Free;
        let grid = Grid::from_rows(rows);
        let drawn: HashSet<u8> = (1..=75).collect();
        let hit = grid.hits(&drawn);
        assert!(hit[2][2]);
        assert_eq!(hit.iter().flatten().filter(|&&h| h).count(), 1);
        assert!(!grid.is_complete());
    }

    #[test]
    fn standard_row_and_column() {
        let mut hit = [[false; GRID]; GRID];
        for c in 0..GRID {
            hit[1][c] = true;
        }
        assert!(check_bingo(&hit, WinPattern::Standard));
        assert!(!check_bingo(&hit, WinPattern::X));

        let mut hit = [[false; GRID]; GRID];
        for r in 0..GRID {
            hit[r][3] = true;
        }
        assert!(check_bingo(&hit, WinPattern::Standard));
    }

    #[test]
    fn corners_beat_any_pattern() {
        let mut hit = [[false; GRID]; GRID];
        hit[0][0] = true;
        hit[0][4] = true;
        hit[4][0] = true;
        hit[4][4] = true;
        assert!(check_bingo(&hit, WinPattern::Standard));
        assert!(check_bingo(&hit, WinPattern::X));
        assert!(check_bingo(&hit, WinPattern::Corners));
    }

    #[test]
    fn x_needs_both_diagonals() {
        let mut hit = [[false; GRID]; GRID];
        for i in 0..GRID {
            hit[i][i] = true;
        }
        assert!(!check_bingo(&hit, WinPattern::X));
        assert!(check_bingo(&hit, WinPattern::Standard));
        for i in 0..GRID {
            hit[i][GRID - 1 - i] = true;
        }
        assert!(check_bingo(&hit, WinPattern::X));
    }

    #[test]
    fn display_markers() {
        let grid = sample_grid();
        let text = grid.to_string();
        assert!(text.contains("FREE"));
        assert!(!text.contains("ERR"));
        assert_eq!(text.lines().count(), GRID);
    }
}
