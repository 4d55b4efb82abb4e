//! StudyHub CLI - self-study progress, quizzes and flashcards.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use studyhub_api::{NoteFilter, StudyHubClient};
use studyhub_core::{Answers, AppConfig, Day, FlashcardDeck, MissionId, Quiz, UserStats};
use studyhub_progress::{
    Catalog, ExamCountdown, ProgressEngine, ProgressTracker, QuizResult, StatsTracker, Transition,
};
use studyhub_storage::{JsonStorage, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studyhub")]
#[command(about = "Student self-study companion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Storage path, overriding the configuration
    #[arg(short, long)]
    storage: Option<std::path::PathBuf>,

    /// Date to act on (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<Day>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, xp, streak and badges
    Status,
    /// List missions
    Missions,
    /// List badges
    Badges,
    /// Complete a mission
    Complete {
        /// Mission ID
        id: String,
    },
    /// Refresh the daily streak
    Refresh,
    /// Discard all progress
    Reset,
    /// Score a quiz against an answers file
    Score {
        /// Quiz JSON file
        quiz: std::path::PathBuf,
        /// Answers JSON file (question id -> option index)
        answers: std::path::PathBuf,
    },
    /// Show time left until an exam
    Countdown {
        /// Exam date (YYYY-MM-DD)
        date: Day,
        /// Exam name
        #[arg(long, default_value = "Exam")]
        name: String,
        /// Start hour (UTC)
        #[arg(long, default_value = "9")]
        hour: u32,
    },
    /// Manage flashcard decks
    Deck {
        #[command(subcommand)]
        command: DeckCommands,
    },
    /// Log in to the StudyHub backend
    Login {
        /// Username
        username: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List quizzes from the backend
    Quizzes,
    /// List notes from the backend
    Notes {
        /// Only notes with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Only notes containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List shared resources from the backend
    Resources,
}

#[derive(Subcommand)]
enum DeckCommands {
    /// List decks
    List,
    /// Create a deck
    Add {
        /// Deck name
        name: String,
    },
    /// Add a card to a deck
    Card {
        /// Deck ID
        deck: String,
        /// Front side
        front: String,
        /// Back side
        back: String,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            AppConfig::from_json(&json).context("Invalid config")
        }
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    // Open storage
    let mut storage = JsonStorage::new(&config.storage_path).await?;
    let engine = ProgressEngine::new(Catalog::standard(), config.engine.clone());

    match cli.command {
        Commands::Status => {
            let mut tracker = StatsTracker::new(storage, engine);
            let stats = tracker.refresh_streak(today).await?.stats;
            print_status(&stats, tracker.engine());
        }
        Commands::Missions => {
            let stats = StatsTracker::new(storage, engine).stats().await?;
            println!("Missions ({}/{})", stats.completed_missions(), stats.missions.len());
            for mission in &stats.missions {
                println!("  [{}] {} | {} | +{} XP - {}",
                    if mission.completed { "x" } else { " " },
                    mission.id,
                    mission.mission_type.as_str(),
                    mission.xp_reward,
                    mission.title,
                );
            }
        }
        Commands::Badges => {
            let stats = StatsTracker::new(storage, engine).stats().await?;
            for badge in &stats.badges {
                match badge.earned_date {
                    Some(date) => println!("  {} (earned {})", badge.name, date),
                    None => println!("  {} (locked)", badge.name),
                }
            }
        }
        Commands::Complete { id } => {
            let mut tracker = StatsTracker::new(storage, engine);
            tracker.refresh_streak(today).await?;
            let transition = tracker.complete_mission(&MissionId::new(id.clone()), today).await?;
            if !transition.changed() {
                println!("Nothing to do: mission '{}' is unknown or already completed", id);
                return Ok(());
            }
            print_events(&transition);
        }
        Commands::Refresh => {
            let mut tracker = StatsTracker::new(storage, engine);
            let transition = tracker.refresh_streak(today).await?;
            println!("Streak: {} day(s), bonus {}%",
                transition.stats.streak,
                tracker.engine().streak_bonus(&transition.stats),
            );
            print_events(&transition);
        }
        Commands::Reset => {
            let mut tracker = StatsTracker::new(storage, engine);
            tracker.reset().await?;
            println!("Progress reset");
        }
        Commands::Score { quiz, answers } => {
            let quiz: Quiz = read_json_file(&quiz)?;
            let answers: Answers = read_json_file(&answers)?;
            let result = QuizResult::grade(&quiz.questions, &answers)?;

            println!("{}: {}/{} correct ({}%)", quiz.title, result.correct, result.total, result.percentage);
            for review in &result.review {
                let chosen = review.chosen.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
                println!("  {} {} | chosen {} | answer {}",
                    if review.correct { "✓" } else { "✗" },
                    review.id,
                    chosen,
                    review.correct_answer,
                );
            }
        }
        Commands::Countdown { date, name, hour } => {
            let exam_at = date
                .and_hms_opt(hour, 0, 0)
                .context("Invalid hour")?
                .and_utc();
            let countdown = ExamCountdown::new(name, exam_at);
            let now = clock(cli.today);
            match countdown.remaining(now) {
                Some(left) => println!("{}: {} left ({} day(s))", countdown.name, left, countdown.days_until(now.date_naive())),
                None => println!("{}: already started", countdown.name),
            }
        }
        Commands::Deck { command } => {
            let mut decks = storage.load_decks_or_default().await?;

            match command {
                DeckCommands::List => {
                    println!("Decks ({})", decks.len());
                    for deck in &decks {
                        println!("  {} | {} | {}/{} mastered",
                            deck.id, deck.name, deck.mastered_count(), deck.cards.len());
                    }
                }
                DeckCommands::Add { name } => {
                    let deck = FlashcardDeck::new(name);
                    println!("Added deck: {} - {}", deck.id, deck.name);
                    decks.push(deck);
                    storage.save_decks(&decks).await?;
                }
                DeckCommands::Card { deck, front, back } => {
                    let deck_id = deck.parse().map_err(|_| anyhow::anyhow!("Invalid deck ID"))?;
                    let Some(deck) = decks.iter_mut().find(|d| d.id == deck_id) else {
                        println!("Deck not found");
                        return Ok(());
                    };
                    let card = deck.add_card(front, back);
                    println!("Added card {} to {}", card, deck.name);
                    storage.save_decks(&decks).await?;
                }
            }
        }
        Commands::Login { username, password } => {
            let mut client = StudyHubClient::from_config(&config);
            match client.login(&username, &password).await {
                Ok(session) => {
                    storage.save_session(&session).await?;
                    info!(user = %session.username, "Session stored");
                    println!("Logged in as {}", session.username);
                }
                Err(e) => println!("Login failed: {}", e.user_message()),
            }
        }
        Commands::Logout => {
            storage.clear_session().await?;
            println!("Logged out");
        }
        Commands::Quizzes => {
            let client = authenticated_client(&config, &storage).await?;
            match client.list_quizzes().await {
                Ok(quizzes) => {
                    println!("Quizzes ({})", quizzes.len());
                    for quiz in quizzes {
                        println!("  {} | {} question(s) - {}",
                            quiz.id.map(|id| id.to_string()).unwrap_or_default(),
                            quiz.questions.len(),
                            quiz.title,
                        );
                    }
                }
                Err(e) => println!("Error: {}", e.user_message()),
            }
        }
        Commands::Notes { tag, search } => {
            let client = authenticated_client(&config, &storage).await?;
            match client.list_notes().await {
                Ok(notes) => {
                    let filter = NoteFilter { tag, text: search };
                    let matched = filter.apply(&notes);
                    println!("Notes ({})", matched.len());
                    for note in matched {
                        println!("  {} [{}]", note.title, note.tags.join(", "));
                    }
                }
                Err(e) => println!("Error: {}", e.user_message()),
            }
        }
        Commands::Resources => {
            let client = authenticated_client(&config, &storage).await?;
            match client.list_resources().await {
                Ok(resources) => {
                    println!("Resources ({})", resources.len());
                    for resource in resources {
                        println!("  {} | {:?} | {}", resource.title, resource.kind, resource.url);
                    }
                }
                Err(e) => println!("Error: {}", e.user_message()),
            }
        }
    }

    Ok(())
}

async fn authenticated_client(config: &AppConfig, storage: &JsonStorage) -> Result<StudyHubClient> {
    let client = StudyHubClient::from_config(config);
    Ok(match storage.load_session_or_none().await? {
        Some(session) => client.with_session(&session),
        None => client,
    })
}

/// Current instant, or midnight UTC of the `--today` override.
fn clock(today: Option<Day>) -> chrono::DateTime<chrono::Utc> {
    match today {
        Some(day) => day.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => chrono::Utc::now(),
    }
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_status(stats: &UserStats, engine: &ProgressEngine) {
    println!("StudyHub Status");
    println!("  Level: {}", stats.level);
    println!("  XP: {}/{} ({:.0}%)", stats.xp, stats.next_level_xp, stats.level_progress() * 100.0);
    println!("  Streak: {} day(s), bonus {}%", stats.streak, engine.streak_bonus(stats));
    println!("  Missions: {}/{}", stats.completed_missions(), stats.missions.len());
    println!("  Badges: {}/{}", stats.earned_badges().count(), stats.badges.len());
    let achievements = stats.achievements.iter().filter(|a| a.completed).count();
    println!("  Achievements: {}/{}", achievements, stats.achievements.len());
}

fn print_events(transition: &Transition) {
    for event in &transition.events {
        println!("  {}", event);
    }
}
