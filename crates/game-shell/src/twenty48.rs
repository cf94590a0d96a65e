use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use twenty48_core::engine::Direction;
use twenty48_core::input::{Point, SwipeDetector, direction_for_key};

use crate::render::{HOW_TO_PLAY, Notification, RenderSink};
use crate::session::{Session, Turn};
use crate::store::{BEST_SCORE_KEY, KeyValueStore, read_u64, write_u64};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Help,
    Quit,
}

/// Parse a line of terminal input. Returns `None` for anything that is not
/// a command, including swipes too short to count.
pub fn parse_command(line: &str, swipe: &SwipeDetector) -> Option<Command> {
    let line = line.trim();
    if let Some(dir) = direction_for_key(line) {
        return Some(Command::Move(dir));
    }
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let cmd = match head.as_str() {
        "left" | "h" | "a" => Command::Move(Direction::Left),
        "right" | "l" | "d" => Command::Move(Direction::Right),
        "up" | "k" | "w" => Command::Move(Direction::Up),
        "down" | "j" | "s" => Command::Move(Direction::Down),
        "r" | "restart" | "new" => Command::Restart,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "swipe" => {
            let coords: Vec<f64> = words.map(str::parse::<f64>).collect::<Result<_, _>>().ok()?;
            let [x1, y1, x2, y2] = coords[..] else {
                return None;
            };
            return swipe
                .classify(Point::new(x1, y1), Point::new(x2, y2))
                .map(Command::Move);
        }
        _ => return None,
    };
    Some(cmd)
}

/// 2048 view-controller: owns the session and reflects it to a render sink
/// and a key/value store.
pub struct Twenty48<S, K, R> {
    session: Session,
    store: S,
    sink: K,
    rng: R,
    notify_delay: Duration,
}

impl<S: KeyValueStore, K: RenderSink, R: Rng> Twenty48<S, K, R> {
    /// Read the stored best score, deal a fresh board and draw it.
    pub fn start(store: S, sink: K, mut rng: R, notify_delay: Duration) -> Result<Self> {
        let best = read_u64(&store, BEST_SCORE_KEY)?.unwrap_or(0);
        info!("starting 2048 with best score {best}");
        let session = Session::new(best, &mut rng);
        let mut game = Self {
            session,
            store,
            sink,
            rng,
            notify_delay,
        };
        game.draw()?;
        Ok(game)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one move and publish its effects.
    pub fn handle(&mut self, direction: Direction) -> Result<Turn> {
        let turn = self.session.play(direction, &mut self.rng);
        let Turn::Moved(report) = turn else {
            return Ok(turn);
        };
        if report.new_best {
            let best = self.session.best_score();
            write_u64(&mut self.store, BEST_SCORE_KEY, best)
                .context("failed to persist best score")?;
            info!("new best score {best}");
        }
        self.draw()?;
        if report.won {
            info!("reached 2048 with score {}", self.session.score());
            self.pause();
            self.sink.notify(&Notification::Won {
                score: self.session.score(),
            })?;
        }
        if report.game_over {
            info!(
                "game over: score {} best {}",
                self.session.score(),
                self.session.best_score()
            );
            self.pause();
            self.sink.notify(&Notification::GameOver {
                score: self.session.score(),
                best: self.session.best_score(),
            })?;
        }
        Ok(turn)
    }

    pub fn restart(&mut self) -> Result<()> {
        self.session.restart(&mut self.rng);
        self.draw()
    }

    /// Read commands line by line until `quit` or end of input.
    pub fn run<B: BufRead>(&mut self, input: B, swipe: &SwipeDetector) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line, swipe) {
                Some(Command::Move(dir)) => {
                    self.handle(dir)?;
                }
                Some(Command::Restart) => self.restart()?,
                Some(Command::Help) => self
                    .sink
                    .notify(&Notification::Info(HOW_TO_PLAY.to_owned()))?,
                Some(Command::Quit) => break,
                None => self.sink.notify(&Notification::Info(format!(
                    "Unknown command {:?}; type ? for help.",
                    line.trim()
                )))?,
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let s = &self.session;
        self.sink.render(&s.board(), s.score(), s.best_score())
    }

    fn pause(&self) {
        if !self.notify_delay.is_zero() {
            std::thread::sleep(self.notify_delay);
        }
    }
}
