//! Guess-the-number: a hidden integer, distance hints, persistent stats.

use std::fmt;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;

use crate::store::{BEST_SCORE_KEY, GAMES_WON_KEY, KeyValueStore, read_u64, write_u64};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Easy => 1..=50,
            Difficulty::Medium => 1..=100,
            Difficulty::Hard => 1..=200,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// Which way the next guess should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toward {
    Higher,
    Lower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// Off by at most 5.
    VeryClose(Toward),
    /// Off by at most 10.
    Close(Toward),
    Far(Toward),
}

impl Hint {
    fn for_guess(guess: u32, target: u32) -> Option<Hint> {
        let toward = match guess.cmp(&target) {
            std::cmp::Ordering::Less => Toward::Higher,
            std::cmp::Ordering::Greater => Toward::Lower,
            std::cmp::Ordering::Equal => return None,
        };
        let hint = match guess.abs_diff(target) {
            0..=5 => Hint::VeryClose(toward),
            6..=10 => Hint::Close(toward),
            _ => Hint::Far(toward),
        };
        Some(hint)
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Hint::VeryClose(Toward::Higher) => "Very close! Try a bit higher!",
            Hint::VeryClose(Toward::Lower) => "Very close! Try a bit lower!",
            Hint::Close(Toward::Higher) => "Close! Go higher!",
            Hint::Close(Toward::Lower) => "Close! Go lower!",
            Hint::Far(Toward::Higher) => "Too low! Try higher!",
            Hint::Far(Toward::Lower) => "Too high! Try lower!",
        };
        f.write_str(text)
    }
}

/// One accepted guess; `hint` is `None` for the winning guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub guess: u32,
    pub hint: Option<Hint>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Input was not accepted; nothing changed.
    Rejected(String),
    Wrong(Hint),
    Correct { attempts: u32, new_best: bool },
}

/// Stats kept across games: fewest attempts and number of wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub best_score: Option<u32>,
    pub games_won: u32,
}

impl Stats {
    /// Missing, unparsable or zero best scores all read as "no best yet".
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        let best_score = read_u64(store, BEST_SCORE_KEY)?
            .filter(|&v| v > 0)
            .and_then(|v| u32::try_from(v).ok());
        let games_won = read_u64(store, GAMES_WON_KEY)?
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        Ok(Self {
            best_score,
            games_won,
        })
    }

    fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        match self.best_score {
            Some(best) => write_u64(store, BEST_SCORE_KEY, u64::from(best))?,
            None => store.remove(BEST_SCORE_KEY)?,
        }
        write_u64(store, GAMES_WON_KEY, u64::from(self.games_won))
    }
}

pub struct GuessGame<S, R> {
    difficulty: Difficulty,
    target: u32,
    attempts: u32,
    history: Vec<Attempt>,
    finished: bool,
    stats: Stats,
    store: S,
    rng: R,
}

impl<S: KeyValueStore, R: Rng> GuessGame<S, R> {
    pub fn new(store: S, rng: R, difficulty: Difficulty) -> Result<Self> {
        let stats = Stats::load(&store).context("failed to load stats")?;
        let mut game = Self {
            difficulty,
            target: 0,
            attempts: 0,
            history: Vec::new(),
            finished: false,
            stats,
            store,
            rng,
        };
        game.start_new_game();
        Ok(game)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn start_new_game(&mut self) {
        self.target = self.rng.gen_range(self.difficulty.range());
        self.attempts = 0;
        self.history.clear();
        self.finished = false;
        debug!("new {} game, target {}", self.difficulty, self.target);
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.start_new_game();
    }

    /// True when `input` parses to a number inside the current range.
    pub fn is_in_range(&self, input: &str) -> bool {
        self.parse(input).is_some()
    }

    pub fn make_guess(&mut self, input: &str) -> Result<GuessOutcome> {
        if self.finished {
            return Ok(GuessOutcome::Rejected(
                "You already found it! Start a new game.".to_owned(),
            ));
        }
        let Some(guess) = self.parse(input) else {
            let range = self.difficulty.range();
            return Ok(GuessOutcome::Rejected(format!(
                "Please enter a number between {} and {}!",
                range.start(),
                range.end()
            )));
        };

        self.attempts += 1;
        let hint = Hint::for_guess(guess, self.target);
        self.history.push(Attempt { guess, hint });
        if let Some(hint) = hint {
            return Ok(GuessOutcome::Wrong(hint));
        }

        self.finished = true;
        self.stats.games_won += 1;
        let new_best = self.stats.best_score.is_none_or(|best| self.attempts < best);
        if new_best {
            self.stats.best_score = Some(self.attempts);
        }
        self.stats
            .save(&mut self.store)
            .context("failed to save stats")?;
        info!(
            "won in {} attempts (games won: {})",
            self.attempts, self.stats.games_won
        );
        Ok(GuessOutcome::Correct {
            attempts: self.attempts,
            new_best,
        })
    }

    /// Forget best score and win count, in memory and in the store.
    pub fn clear_history(&mut self) -> Result<()> {
        self.stats = Stats::default();
        self.store.remove(BEST_SCORE_KEY)?;
        self.store.remove(GAMES_WON_KEY)?;
        info!("cleared guess stats");
        Ok(())
    }

    fn parse(&self, input: &str) -> Option<u32> {
        let value: i64 = input.trim().parse().ok()?;
        let value = u32::try_from(value).ok()?;
        self.difficulty.range().contains(&value).then_some(value)
    }
}

/// Terminal loop: numbers are guesses, words are commands.
pub fn run<S, R, B, W>(game: &mut GuessGame<S, R>, input: B, mut out: W) -> Result<()>
where
    S: KeyValueStore,
    R: Rng,
    B: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    print_intro(game, &mut out)?;
    while let Some(line) = lines.next() {
        let line = line.context("failed to read input")?;
        let cmd = line.trim().to_ascii_lowercase();
        match cmd.as_str() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "new" | "n" => {
                game.start_new_game();
                print_intro(game, &mut out)?;
            }
            "easy" | "medium" | "hard" => {
                let difficulty = match cmd.as_str() {
                    "easy" => Difficulty::Easy,
                    "medium" => Difficulty::Medium,
                    _ => Difficulty::Hard,
                };
                game.change_difficulty(difficulty);
                print_intro(game, &mut out)?;
            }
            "stats" => print_stats(game.stats(), &mut out)?,
            "history" => {
                for (i, attempt) in game.history().iter().enumerate() {
                    let mark = match attempt.hint {
                        None => "correct",
                        Some(
                            Hint::VeryClose(Toward::Higher)
                            | Hint::Close(Toward::Higher)
                            | Hint::Far(Toward::Higher),
                        ) => "higher",
                        Some(_) => "lower",
                    };
                    writeln!(out, "Attempt {}: {} ({mark})", i + 1, attempt.guess)?;
                }
            }
            "clear" => {
                writeln!(
                    out,
                    "Are you sure you want to clear all your game history? \
                     This will reset your best score and games won count. [y/N]"
                )?;
                let answer = lines.next().transpose()?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    game.clear_history()?;
                    writeln!(out, "Game history cleared successfully!")?;
                    print_stats(game.stats(), &mut out)?;
                }
            }
            _ => match game.make_guess(&line)? {
                GuessOutcome::Rejected(msg) => writeln!(out, "{msg}")?,
                GuessOutcome::Wrong(hint) => {
                    writeln!(out, "{hint} (attempts: {})", game.attempts())?
                }
                GuessOutcome::Correct { attempts, new_best } => {
                    writeln!(out, "Congratulations! You got it in {attempts} attempts!")?;
                    if new_best {
                        writeln!(out, "New best score: {attempts} attempts!")?;
                    }
                    print_stats(game.stats(), &mut out)?;
                    writeln!(out, "Type new for another round.")?;
                }
            },
        }
        out.flush()?;
    }
    Ok(())
}

fn print_intro<S, R, W: Write>(game: &GuessGame<S, R>, out: &mut W) -> Result<()> {
    let range = game.difficulty.range();
    writeln!(
        out,
        "[{}] I'm thinking of a number between {} and {}. Make your first guess!",
        game.difficulty,
        range.start(),
        range.end()
    )?;
    Ok(())
}

fn print_stats<W: Write>(stats: Stats, out: &mut W) -> Result<()> {
    let best = stats
        .best_score
        .map_or_else(|| "-".to_owned(), |b| b.to_string());
    writeln!(out, "Best score: {best}    Games won: {}", stats.games_won)?;
    Ok(())
}
