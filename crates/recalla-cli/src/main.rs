//! Recalla CLI
//!
//! Command-line interface for managing vocabulary topics and playing
//! matching rounds.

mod config;
mod play;

use std::io;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use recalla_core::selection::score_pool_at;
use recalla_core::{
    get_word_insights, select_words_for_session, ContentStore, NewTopic, NewWord, SqliteBackend,
    StudyStats, WordRecord, WordStatus,
};
use tracing_subscriber::EnvFilter;

use crate::config::RecallaConfig;

/// Recalla - adaptive vocabulary practice
#[derive(Parser)]
#[command(name = "recalla")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive vocabulary matching game")]
#[command(long_about = "Recalla picks the words you are most likely to forget next.")]
struct Cli {
    /// Custom data directory (also RECALLA_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage topics
    Topic {
        #[command(subcommand)]
        command: TopicCommand,
    },

    /// Manage words
    Word {
        #[command(subcommand)]
        command: WordCommand,
    },

    /// Preview which words the next round would pick
    Select {
        /// Number of words to draw (defaults to the board size)
        #[arg(long)]
        count: Option<usize>,
        /// Restrict to one topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// Play a matching round
    Play {
        /// Restrict to one topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// Show learning metrics for one word
    Insights {
        /// Word ID
        word_id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show progress statistics
    Stats {
        /// Restrict to one topic
        #[arg(long)]
        topic: Option<String>,
    },
}

#[derive(Subcommand)]
enum TopicCommand {
    /// Create a topic
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
    },
    /// List topics
    List,
    /// Delete a topic and all of its words
    Delete { id: String },
}

#[derive(Subcommand)]
enum WordCommand {
    /// Add a word
    Add {
        word: String,
        meaning: String,
        /// Topic ID
        #[arg(long)]
        topic: Option<String>,
    },
    /// List words
    List {
        /// Restrict to one topic
        #[arg(long)]
        topic: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a word
    Delete { id: String },
    /// Clear a word's practice history
    Reset { id: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the board
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = RecallaConfig::load(cli.data_dir)?;
    let store = ContentStore::open(Some(config.database_path()))?;

    match cli.command {
        Commands::Topic { command } => run_topic(&store, command),
        Commands::Word { command } => run_word(&store, command),
        Commands::Select { count, topic } => run_select(&store, &config, count, topic),
        Commands::Play { topic } => {
            let pool = store.list_words(topic.as_deref())?;
            play::run(&store, config.round(), pool)
        }
        Commands::Insights { word_id, json } => run_insights(&store, &word_id, json),
        Commands::Stats { topic } => run_stats(&store, topic),
    }
}

type Store = ContentStore<SqliteBackend>;

/// Run topic subcommands
fn run_topic(store: &Store, command: TopicCommand) -> anyhow::Result<()> {
    match command {
        TopicCommand::Add {
            name,
            description,
            emoji,
        } => {
            let topic = store.create_topic(NewTopic {
                name,
                description,
                emoji,
            })?;
            println!("{} {} ({})", "Created topic".green(), topic.name.bold(), topic.id.dimmed());
        }
        TopicCommand::List => {
            let topics = store.list_topics()?;
            if topics.is_empty() {
                println!("{}", "No topics yet.".dimmed());
            }
            for topic in topics {
                let count = store.count_words(Some(&topic.id))?;
                println!(
                    "{} {} {} - {} words",
                    topic.emoji.as_deref().unwrap_or("-"),
                    topic.name.white().bold(),
                    topic.id.dimmed(),
                    count
                );
                if let Some(description) = &topic.description {
                    println!("    {}", description.dimmed());
                }
            }
        }
        TopicCommand::Delete { id } => {
            if store.delete_topic(&id)? {
                println!("{} {}", "Deleted topic".green(), id);
            } else {
                anyhow::bail!("Topic not found: {id}");
            }
        }
    }
    Ok(())
}

/// Run word subcommands
fn run_word(store: &Store, command: WordCommand) -> anyhow::Result<()> {
    match command {
        WordCommand::Add {
            word,
            meaning,
            topic,
        } => {
            let input = match topic {
                Some(topic_id) => NewWord::new(word, meaning).in_topic(topic_id),
                None => NewWord::new(word, meaning),
            };
            let record = store.add_word(input)?;
            println!(
                "{} {} = {} ({})",
                "Added".green(),
                record.word.bold(),
                record.meaning,
                record.id.dimmed()
            );
        }
        WordCommand::List { topic, json } => {
            let words = store.list_words(topic.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&words)?);
            } else if words.is_empty() {
                println!("{}", "No words found.".dimmed());
            } else {
                for word in &words {
                    print_word_line(word);
                }
            }
        }
        WordCommand::Delete { id } => {
            if store.delete_word(&id)? {
                println!("{} {}", "Deleted word".green(), id);
            } else {
                anyhow::bail!("Word not found: {id}");
            }
        }
        WordCommand::Reset { id } => {
            let record = store.reset_progress(&id)?;
            println!("{} {}", "Progress reset for".green(), record.word.bold());
        }
    }
    Ok(())
}

/// Preview a selection with each word's priority
fn run_select(
    store: &Store,
    config: &RecallaConfig,
    count: Option<usize>,
    topic: Option<String>,
) -> anyhow::Result<()> {
    let pool = store.list_words(topic.as_deref())?;
    let options = config.selection();
    let picked = select_words_for_session(&pool, count.unwrap_or(config.board_pairs), &options);

    if picked.is_empty() {
        println!("{}", "No eligible words.".dimmed());
        return Ok(());
    }

    let scored = score_pool_at(&picked, &options, Utc::now());
    println!("{}", "=== Next Selection ===".cyan().bold());
    for candidate in scored {
        println!(
            "{:>5}  {:>3}  {} = {}",
            candidate.priority.to_string().yellow(),
            candidate.difficulty,
            candidate.word.word.bold(),
            candidate.word.meaning
        );
    }
    println!("{}", "(priority, difficulty, word)".dimmed());
    Ok(())
}

/// Show insights for one word
fn run_insights(store: &Store, word_id: &str, json: bool) -> anyhow::Result<()> {
    let Some(word) = store.get_word(word_id)? else {
        anyhow::bail!("Word not found: {word_id}");
    };
    let insights = get_word_insights(&word);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("{} {} = {}", "===".cyan().bold(), word.word.cyan().bold(), word.meaning);
    println!("{}: {}", "Status".white().bold(), status_label(insights.status));
    println!("    {}", insights.status.description().dimmed());
    println!("{}: {}", "Mastery".white().bold(), insights.mastery_score);
    println!("{}: {}", "Difficulty".white().bold(), insights.difficulty);
    println!("{}: {:.1}%", "Retention".white().bold(), insights.retention * 100.0);
    println!("{}: {:.1}h", "Next Review".white().bold(), insights.next_review_hours);
    println!("{}: {}", "Velocity".white().bold(), insights.learning_velocity);
    println!("{}: {}", "Priority".white().bold(), insights.priority);
    println!(
        "{}: {}",
        "Overdue".white().bold(),
        if insights.overdue { "yes".red() } else { "no".green() }
    );
    match insights.accuracy {
        Some(accuracy) => println!("{}: {:.1}%", "Accuracy".white().bold(), accuracy * 100.0),
        None => println!("{}: {}", "Accuracy".white().bold(), "not practiced".dimmed()),
    }
    Ok(())
}

/// Run stats command
fn run_stats(store: &Store, topic: Option<String>) -> anyhow::Result<()> {
    let stats = store.stats(topic.as_deref())?;

    println!("{}", "=== Recalla Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Total Words".white().bold(), stats.total_words);
    println!("{}: {}", "Overdue".white().bold(), stats.overdue_words);
    println!("{}: {:.1}", "Average Mastery".white().bold(), stats.average_mastery);
    println!("{}: {:.1}%", "Average Retention".white().bold(), stats.average_retention * 100.0);
    if let Some(accuracy) = stats.accuracy {
        println!(
            "{}: {:.1}% ({} correct, {} wrong)",
            "Accuracy".white().bold(),
            accuracy * 100.0,
            stats.total_correct,
            stats.total_wrong
        );
    }

    if stats.total_words > 0 {
        println!();
        println!("{}", "=== Status Distribution ===".yellow().bold());
        print_status_distribution(&stats);
    }
    Ok(())
}

fn print_status_distribution(stats: &StudyStats) {
    let rows = [
        (WordStatus::New, stats.new_words),
        (WordStatus::Learning, stats.learning_words),
        (WordStatus::Challenging, stats.challenging_words),
        (WordStatus::Familiar, stats.familiar_words),
        (WordStatus::Mastered, stats.mastered_words),
    ];
    for (status, count) in rows {
        let percentage = count as f64 / stats.total_words as f64 * 100.0;
        let bar = "#".repeat((percentage / 5.0).round() as usize);
        println!("{:<12} {:>4} {:>5.1}% {}", status_label(status), count, percentage, bar);
    }
}

fn print_word_line(word: &WordRecord) {
    let status = WordStatus::classify(word);
    println!(
        "{:<12} {:>3}  {} = {}  {}",
        status_label(status),
        word.mastery_score,
        word.word.bold(),
        word.meaning,
        word.id.dimmed()
    );
}

fn status_label(status: WordStatus) -> colored::ColoredString {
    match status {
        WordStatus::New => status.as_str().white(),
        WordStatus::Learning => status.as_str().yellow(),
        WordStatus::Challenging => status.as_str().red(),
        WordStatus::Familiar => status.as_str().blue(),
        WordStatus::Mastered => status.as_str().green(),
    }
}
