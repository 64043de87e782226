//! Interactive matching round in the terminal
//!
//! The board lists word cards by number and meaning cards by letter. A move
//! is `<number> <letter>`; `q` ends the round early.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use rand::Rng;
use recalla_core::{
    ContentStore, Replenishment, Round, RoundConfig, RoundStatus, SlotState, StorageBackend,
    WordRecord,
};

/// Meaning cards are labelled `a` to `z`
pub const MAX_BOARD_PAIRS: usize = 26;

/// One parsed line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Zero-based slot of the word card and index of the meaning card
    Pair { slot: usize, meaning: usize },
    Quit,
}

/// Parse `2 c`, `2c` or `q`
pub fn parse_move(line: &str) -> Option<Move> {
    let line = line.trim().to_lowercase();
    if line == "q" || line == "quit" {
        return Some(Move::Quit);
    }

    let letter = line.chars().last().filter(|c| c.is_ascii_lowercase())?;
    let number: usize = line[..line.len() - 1].trim().parse().ok()?;
    if number == 0 {
        return None;
    }

    Some(Move::Pair {
        slot: number - 1,
        meaning: (letter as u8 - b'a') as usize,
    })
}

/// Meaning cards in display order, reshuffled only where the board changed
#[derive(Debug, Default)]
pub struct MeaningColumn {
    order: Vec<String>,
}

impl MeaningColumn {
    /// Drop meanings whose word left the board and slot new ones in at random
    pub fn sync<R: Rng + ?Sized>(&mut self, round: &Round, rng: &mut R) {
        let active: Vec<&WordRecord> = round.active_words().map(|(_, w)| w).collect();
        self.order.retain(|id| active.iter().any(|w| &w.id == id));
        for word in active {
            if !self.order.contains(&word.id) {
                let at = rng.random_range(0..=self.order.len());
                self.order.insert(at, word.id.clone());
            }
        }
    }

    /// Word ID behind the meaning card at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.order.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// Play one round over stdin/stdout, persisting every outcome
pub fn run<B: StorageBackend>(
    store: &ContentStore<B>,
    mut config: RoundConfig,
    pool: Vec<WordRecord>,
) -> anyhow::Result<()> {
    if config.board_pairs > MAX_BOARD_PAIRS {
        tracing::warn!(
            requested = config.board_pairs,
            "Board size capped at {MAX_BOARD_PAIRS} pairs"
        );
        config.board_pairs = MAX_BOARD_PAIRS;
    }

    let mut rng = rand::rng();
    let mut round = Round::start(pool, config, &mut rng)?;
    let mut meanings = MeaningColumn::default();
    let mut lines = io::stdin().lock().lines();

    println!(
        "{}",
        "Match each word with its meaning. Type `2 c` to pair word 2 with meaning c, `q` to quit."
            .dimmed()
    );

    while round.status() == RoundStatus::InProgress {
        meanings.sync(&round, &mut rng);
        render(&round, &meanings);

        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;

        let (slot, meaning) = match parse_move(&line) {
            Some(Move::Quit) => break,
            Some(Move::Pair { slot, meaning }) => (slot, meaning),
            None => {
                println!("{}", "Enter a word number and a meaning letter, e.g. `2 c`.".yellow());
                continue;
            }
        };

        let word_id = match round.slots().get(slot) {
            Some(SlotState::Active(word)) => word.id.clone(),
            _ => {
                println!("{}", format!("No word card at {}", slot + 1).yellow());
                continue;
            }
        };
        let Some(meaning_id) = meanings.get(meaning).map(str::to_string) else {
            println!("{}", "No such meaning card".yellow());
            continue;
        };

        let Some(result) = round.attempt_match(&word_id, &meaning_id, &mut rng) else {
            continue;
        };

        let updated = store.apply_outcome(&result.word_id, result.is_correct)?;
        round.refresh_word(&updated);

        if result.is_correct {
            println!(
                "{} {} = {}  (+{})",
                "Match!".green().bold(),
                updated.word,
                updated.meaning,
                round.config().points_per_match
            );
        } else {
            println!("{}", "Not a pair.".red());
        }

        match result.replenishment {
            Some(Replenishment::Scheduled(ticket)) => {
                std::thread::sleep(ticket.delay);
                round.complete_replenishment(&ticket);
            }
            Some(Replenishment::PoolExhausted { round_complete: false }) => {
                println!("{}", "No more new words; clear the board to finish.".dimmed());
            }
            _ => {}
        }
    }

    println!();
    match round.status() {
        RoundStatus::Completed { score, bonus } => {
            println!("{}", "=== Round Complete ===".green().bold());
            println!("{}: {} (bonus {})", "Score".white().bold(), score, bonus);
        }
        RoundStatus::InProgress => {
            println!("{}", "=== Round Ended ===".yellow().bold());
            println!("{}: {}", "Score".white().bold(), round.score());
        }
    }
    println!("{}: {}", "Matches".white().bold(), round.matches());
    println!("{}: {}", "Mistakes".white().bold(), round.mistakes());

    Ok(())
}

fn render(round: &Round, meanings: &MeaningColumn) {
    println!();
    println!(
        "{}",
        format!(
            "=== Score {} | Matches {} | Mistakes {} | {} waiting ===",
            round.score(),
            round.matches(),
            round.mistakes(),
            round.remaining()
        )
        .cyan()
        .bold()
    );

    let rows = round.slots().len().max(meanings.len());
    for row in 0..rows {
        let left = match round.slots().get(row) {
            Some(SlotState::Active(word)) => format!("{:>2}. {}", row + 1, word.word),
            Some(SlotState::AwaitingReplenishment { .. }) => format!("{:>2}. ...", row + 1),
            Some(SlotState::Cleared) | None => String::new(),
        };
        let right = meanings
            .get(row)
            .and_then(|id| round.active_words().find(|(_, w)| w.id == id))
            .map(|(_, w)| format!("{}. {}", (b'a' + row as u8) as char, w.meaning))
            .unwrap_or_default();
        println!("  {left:<28}{right}");
    }
}
