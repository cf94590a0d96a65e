use std::io::Write;

use anyhow::Result;
use twenty48_core::engine::{Board, Score};

pub const HOW_TO_PLAY: &str = "\
How to play 2048

Goal: reach the 2048 tile!

Controls:
  left/right/up/down, h/j/k/l or a/s/d/w move the tiles
  swipe X1 Y1 X2 Y2 replays a touch gesture
  r restarts, ? shows this text, q quits

Rules:
  When two tiles with the same number touch, they merge into one.
  After each move a new tile appears in a random empty cell.
  The game ends when the grid is full and no merge is possible.

Tips:
  Keep your highest tile in a corner.
  Build in one direction.
  Think ahead before moving!
";

/// Messages raised by the game loop on top of the board itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Won { score: Score },
    GameOver { score: Score, best: Score },
    Info(String),
}

/// Where board state and notices end up.
pub trait RenderSink {
    fn render(&mut self, board: &Board, score: Score, best: Score) -> Result<()>;
    fn notify(&mut self, note: &Notification) -> Result<()>;
}

/// Plain-text sink for terminals and tests.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextRenderer<W> {
    fn render(&mut self, board: &Board, score: Score, best: Score) -> Result<()> {
        writeln!(self.out, "Score: {score}    Best: {best}")?;
        write!(self.out, "{board}")?;
        self.out.flush()?;
        Ok(())
    }

    fn notify(&mut self, note: &Notification) -> Result<()> {
        match note {
            Notification::Won { score } => writeln!(
                self.out,
                "Congratulations! You reached 2048!\nScore: {score}\nKeep playing to beat your high score!"
            )?,
            Notification::GameOver { score, best } => writeln!(
                self.out,
                "Game over! No more moves possible.\nFinal score: {score}\nBest score: {best}\nType r for a new game."
            )?,
            Notification::Info(text) => writeln!(self.out, "{text}")?,
        }
        self.out.flush()?;
        Ok(())
    }
}
