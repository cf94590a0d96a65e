use log::debug;
use rand::Rng;
use twenty48_core::engine::{Board, Direction, Score};

/// What a single input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The board did not change (or the game is already over).
    Ignored,
    Moved(MoveReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub score_delta: Score,
    /// Current score exceeded the best score seen so far.
    pub new_best: bool,
    /// First time 2048 appeared since the last restart.
    pub won: bool,
    pub game_over: bool,
}

/// Mutable state of one 2048 game, owned by a single control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    board: Board,
    score: Score,
    best_score: Score,
    game_over: bool,
    win_acknowledged: bool,
}

impl Session {
    /// Start a game with two random tiles.
    pub fn new<R: Rng + ?Sized>(best_score: Score, rng: &mut R) -> Self {
        Self::with_board(fresh_board(rng), best_score)
    }

    /// Resume from an explicit board with score 0.
    pub fn with_board(board: Board, best_score: Score) -> Self {
        Self {
            board,
            score: 0,
            best_score,
            game_over: board.is_game_over(),
            win_acknowledged: board.has_won(),
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_score(&self) -> Score {
        self.best_score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn win_acknowledged(&self) -> bool {
        self.win_acknowledged
    }

    /// Run one input through the pipeline: slide, spawn, score, terminal
    /// checks. A move that changes nothing leaves the session untouched.
    pub fn play<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> Turn {
        if self.game_over {
            return Turn::Ignored;
        }
        let outcome = self.board.make_move(direction, rng);
        if !outcome.moved {
            debug!("{direction}: no change");
            return Turn::Ignored;
        }
        self.board = outcome.board;
        self.score += outcome.score_delta;

        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }

        let won = !self.win_acknowledged && self.board.has_won();
        if won {
            self.win_acknowledged = true;
        }
        self.game_over = self.board.is_game_over();
        debug!(
            "{direction}: +{} score={} empty={} game_over={}",
            outcome.score_delta,
            self.score,
            self.board.count_empty(),
            self.game_over
        );

        Turn::Moved(MoveReport {
            score_delta: outcome.score_delta,
            new_best,
            won,
            game_over: self.game_over,
        })
    }

    /// Fresh board and score; the best score carries over.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::with_board(fresh_board(rng), self.best_score);
    }
}

fn fresh_board<R: Rng + ?Sized>(rng: &mut R) -> Board {
    Board::EMPTY.with_random_tile(rng).with_random_tile(rng)
}
