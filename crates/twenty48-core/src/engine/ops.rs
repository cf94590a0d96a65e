use rand::Rng;

use super::state::{Board, CELLS, Cell, Direction, MoveOutcome, SIDE, Score, WIN_TILE};

/// One row or column, ordered so tiles travel toward index 0.
pub type Line = [Cell; SIDE];

/// Slide/merge tiles in the given direction. No randomness.
pub fn apply_move(board: Board, direction: Direction) -> MoveOutcome {
    let mut next = board;
    let mut score_delta = 0;
    for line_idx in 0..SIDE {
        let indices = line_indices(direction, line_idx);
        let (line, gained) = compact_and_merge(extract_line(board, &indices));
        insert_line(&mut next, &indices, line);
        score_delta += gained;
    }
    MoveOutcome {
        board: next,
        score_delta,
        moved: next != board,
    }
}

/// Board indices of line `line_idx` for a move in `direction`, ordered from
/// the edge tiles travel toward to the opposite edge.
///
/// Left walks a row as-is, right walks it reversed; up and down do the same
/// for columns. Writing a processed line back through the same indices
/// undoes the reversal.
pub fn line_indices(direction: Direction, line_idx: usize) -> [usize; SIDE] {
    debug_assert!(line_idx < SIDE);
    std::array::from_fn(|i| {
        let (row, col) = match direction {
            Direction::Left => (line_idx, i),
            Direction::Right => (line_idx, SIDE - 1 - i),
            Direction::Up => (i, line_idx),
            Direction::Down => (SIDE - 1 - i, line_idx),
        };
        row * SIDE + col
    })
}

pub(crate) fn extract_line(board: Board, indices: &[usize; SIDE]) -> Line {
    indices.map(|i| board.0[i])
}

pub(crate) fn insert_line(board: &mut Board, indices: &[usize; SIDE], line: Line) {
    for (&i, v) in indices.iter().zip(line) {
        board.0[i] = v;
    }
}

/// Compact a line toward index 0, merge equal neighbors once, pad with zeros.
///
/// Returns the new line and the sum of merged tiles. Merges are evaluated
/// left to right and a merged tile never merges again in the same pass, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
pub fn compact_and_merge(line: Line) -> (Line, Score) {
    let mut out = [0; SIDE];
    let mut len = 0;
    let mut score = 0;
    let mut pending: Option<Cell> = None;
    for v in line.into_iter().filter(|&v| v != 0) {
        match pending {
            Some(p) if p == v => {
                out[len] = 2 * v;
                score += Score::from(2 * v);
                len += 1;
                pending = None;
            }
            Some(p) => {
                out[len] = p;
                len += 1;
                pending = Some(v);
            }
            None => pending = Some(v),
        }
    }
    if let Some(p) = pending {
        out[len] = p;
    }
    (out, score)
}

/// True iff any cell holds the winning tile.
pub fn has_won(board: Board) -> bool {
    board.0.contains(&WIN_TILE)
}

/// True iff no cell is empty and no horizontally or vertically adjacent
/// pair is equal. Only right and down neighbors are compared.
pub fn is_game_over(board: Board) -> bool {
    if board.0.contains(&0) {
        return false;
    }
    for idx in 0..CELLS {
        let (row, col) = (idx / SIDE, idx % SIDE);
        let current = board.0[idx];
        if col < SIDE - 1 && board.0[idx + 1] == current {
            return false;
        }
        if row < SIDE - 1 && board.0[idx + SIDE] == current {
            return false;
        }
    }
    true
}

/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> usize {
    board.0.iter().filter(|&&v| v == 0).count()
}

/// Insert a random tile using `rng`; see [`Board::with_random_tile`].
pub fn insert_random_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    board.with_random_tile(rng)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Cell {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

pub(crate) fn format_val(val: Cell) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{x:^7}"),
    }
}

pub fn get_highest_tile_val(board: Board) -> Cell {
    board.0.iter().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn board(cells: [Cell; CELLS]) -> Board {
        Board::from_cells(cells)
    }

    fn random_board(rng: &mut StdRng) -> Board {
        let cells = std::array::from_fn(|_| {
            let exp = rng.gen_range(0..6u32);
            if exp == 0 { 0 } else { 1 << exp }
        });
        board(cells)
    }

    #[test]
    fn it_compact_and_merge() {
        assert_eq!(compact_and_merge([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(compact_and_merge([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(compact_and_merge([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(compact_and_merge([2, 2, 4, 4]), ([4, 8, 0, 0], 12));
        assert_eq!(compact_and_merge([0, 0, 2, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(compact_and_merge([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(compact_and_merge([4, 2, 2, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(compact_and_merge([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(compact_and_merge([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(compact_and_merge([0, 8, 0, 16]), ([8, 16, 0, 0], 0));
    }

    #[test]
    fn it_line_indices() {
        assert_eq!(line_indices(Direction::Left, 1), [4, 5, 6, 7]);
        assert_eq!(line_indices(Direction::Right, 1), [7, 6, 5, 4]);
        assert_eq!(line_indices(Direction::Up, 2), [2, 6, 10, 14]);
        assert_eq!(line_indices(Direction::Down, 2), [14, 10, 6, 2]);
    }

    #[test]
    fn test_move_left() {
        let game = board([2, 4, 8, 16, 2, 8, 8, 4, 4, 0, 0, 4, 2, 0, 0, 4]);
        let out = apply_move(game, Direction::Left);
        assert_eq!(
            out.board,
            board([2, 4, 8, 16, 2, 16, 4, 0, 8, 0, 0, 0, 2, 4, 0, 0])
        );
        assert_eq!(out.score_delta, 16 + 8);
        assert!(out.moved);
    }

    #[test]
    fn test_move_right() {
        let game = board([2, 4, 8, 16, 2, 8, 8, 4, 4, 0, 0, 4, 2, 0, 0, 4]);
        let out = apply_move(game, Direction::Right);
        assert_eq!(
            out.board,
            board([2, 4, 8, 16, 0, 2, 16, 4, 0, 0, 0, 8, 0, 0, 2, 4])
        );
        assert_eq!(out.score_delta, 24);
    }

    #[test]
    fn test_move_up() {
        let game = board([2, 2, 4, 2, 4, 8, 0, 0, 8, 8, 0, 0, 16, 4, 4, 4]);
        let out = apply_move(game, Direction::Up);
        assert_eq!(
            out.board,
            board([2, 2, 8, 2, 4, 16, 0, 4, 8, 4, 0, 0, 16, 0, 0, 0])
        );
        assert_eq!(out.score_delta, 16 + 8);
    }

    #[test]
    fn test_move_down() {
        let game = board([2, 2, 4, 2, 4, 8, 0, 0, 8, 8, 0, 0, 16, 4, 4, 4]);
        let out = apply_move(game, Direction::Down);
        assert_eq!(
            out.board,
            board([2, 0, 0, 0, 4, 2, 0, 0, 8, 16, 0, 2, 16, 4, 8, 4])
        );
        assert_eq!(out.score_delta, 24);
    }

    #[test]
    fn empty_board_never_moves() {
        for dir in Direction::ALL {
            let out = apply_move(Board::EMPTY, dir);
            assert_eq!(out.board, Board::EMPTY);
            assert_eq!(out.score_delta, 0);
            assert!(!out.moved);
        }
    }

    #[test]
    fn compacted_line_is_unchanged() {
        let game = board([2, 4, 8, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let out = apply_move(game, Direction::Left);
        assert!(!out.moved);
        assert_eq!(out.board, game);
    }

    #[test]
    fn repeating_a_non_move_is_stable() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let b = random_board(&mut rng);
            for dir in Direction::ALL {
                let first = apply_move(b, dir);
                if !first.moved {
                    assert_eq!(first.board, b);
                    assert_eq!(apply_move(first.board, dir).board, b);
                }
            }
        }
    }

    #[test]
    fn moves_conserve_tile_sum_and_score_matches_merges() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let b = random_board(&mut rng);
            for dir in Direction::ALL {
                let out = apply_move(b, dir);
                assert_eq!(out.board.tile_sum(), b.tile_sum());
                assert!(out.board.is_well_formed());
                let expected: Score = (0..SIDE)
                    .map(|i| compact_and_merge(extract_line(b, &line_indices(dir, i))).1)
                    .sum();
                assert_eq!(out.score_delta, expected);
                // Every merge removes exactly one tile.
                let merged = b.count_empty().abs_diff(out.board.count_empty());
                assert_eq!(out.score_delta == 0, merged == 0);
                assert_eq!(out.moved, out.board != b);
            }
        }
    }

    #[test]
    fn mirror_and_transpose_symmetry() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let b = random_board(&mut rng);
            let right = apply_move(b, Direction::Right);
            let left = apply_move(b.mirrored(), Direction::Left);
            assert_eq!(right.board.mirrored(), left.board);
            assert_eq!(right.score_delta, left.score_delta);

            let up = apply_move(b, Direction::Up);
            assert_eq!(
                up.board.transposed(),
                apply_move(b.transposed(), Direction::Left).board
            );
            let down = apply_move(b, Direction::Down);
            assert_eq!(
                down.board.transposed(),
                apply_move(b.transposed(), Direction::Right).board
            );
        }
    }

    #[test]
    fn has_won_survives_moves() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = board([2048, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert!(has_won(b));
        for _ in 0..200 {
            let dir = Direction::ALL[rng.gen_range(0..4)];
            b = b.make_move(dir, &mut rng).board;
            // 2048 merged into 4096; stop the walk.
            if b.highest_tile() > WIN_TILE {
                break;
            }
            assert!(has_won(b));
        }
        assert!(!has_won(Board::EMPTY));
    }

    #[test]
    fn it_is_game_over() {
        let checker = board([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(is_game_over(checker));
        for dir in Direction::ALL {
            assert!(!apply_move(checker, dir).moved);
        }

        let mut with_gap = checker.into_cells();
        with_gap[5] = 0;
        assert!(!is_game_over(board(with_gap)));

        // Full board with one horizontal pair in the last row.
        let mut horizontal = checker.into_cells();
        horizontal[14] = 2;
        assert!(!is_game_over(board(horizontal)));

        // Full board with one vertical pair in the first column.
        let mut vertical = checker.into_cells();
        vertical[8] = 8;
        vertical[12] = 8;
        assert!(!is_game_over(board(vertical)));

        assert!(!is_game_over(Board::EMPTY));
    }

    #[test]
    fn it_count_empty() {
        let game = board([2, 2, 2, 2, 0, 0, 0, 0, 2, 2, 2, 2, 0, 0, 0, 0]);
        assert_eq!(count_empty(game), 8);
        assert_eq!(count_empty(Board::EMPTY), 16);
    }

    #[test]
    fn it_highest_tile() {
        let game = board([2, 0, 0, 0, 0, 1024, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]);
        assert_eq!(get_highest_tile_val(game), 1024);
        assert_eq!(get_highest_tile_val(Board::EMPTY), 0);
    }

    #[test]
    fn it_insert_random_tile() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = Board::EMPTY;
        for _ in 0..20 {
            game = insert_random_tile(game, &mut rng);
        }
        assert_eq!(count_empty(game), 0);
    }
}
