use std::fmt;
use std::io::Write;

use services::{AppServices, Clock, GameError, WordServiceError};
use tracing_subscriber::EnvFilter;
use vocab_core::model::{QuizMode, UserId};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidMode { raw: String },
    MissingWord,
    MissingText,
    MissingEnv { name: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidMode { raw } => {
                write!(f, "invalid --mode value: {raw} (translation or definition)")
            }
            ArgsError::MissingWord => write!(f, "add requires a word"),
            ArgsError::MissingText => write!(f, "speak requires a text"),
            ArgsError::MissingEnv { name } => write!(f, "{name} is not set"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- words");
    eprintln!("  cargo run -p app -- add <word>");
    eprintln!("  cargo run -p app -- quiz [--mode translation|definition]");
    eprintln!("  cargo run -p app -- stats");
    eprintln!("  cargo run -p app -- speak <text> [--lang en] [--out speech.mp3]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FIREBASE_DATABASE_URL   Realtime Database base URL (required)");
    eprintln!("  FIREBASE_API_KEY        identity provider API key (required)");
    eprintln!("  VOCAB_EMAIL             account email (required)");
    eprintln!("  VOCAB_PASSWORD          account password (required)");
    eprintln!("  HUGGINGFACE_TOKEN       language model token (for `add`)");
    eprintln!("  VOCAB_AI_BASE_URL, VOCAB_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Words,
    Add { word: String },
    Quiz { mode: QuizMode },
    Stats,
    Speak { text: String, lang: String, out: String },
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_command(mut argv: impl Iterator<Item = String>) -> Result<Option<Command>, ArgsError> {
    let Some(first) = argv.next() else {
        return Ok(None);
    };

    match first.as_str() {
        "--help" | "-h" => Ok(None),
        "words" => Ok(Some(Command::Words)),
        "stats" => Ok(Some(Command::Stats)),
        "add" => {
            let word = argv.next().ok_or(ArgsError::MissingWord)?;
            Ok(Some(Command::Add { word }))
        }
        "quiz" => {
            let mut mode = QuizMode::Translation;
            while let Some(arg) = argv.next() {
                match arg.as_str() {
                    "--mode" => {
                        let raw = require_value(&mut argv, "--mode")?;
                        mode = raw
                            .parse()
                            .map_err(|_| ArgsError::InvalidMode { raw })?;
                    }
                    other => return Err(ArgsError::UnknownArg(other.to_owned())),
                }
            }
            Ok(Some(Command::Quiz { mode }))
        }
        "speak" => {
            let text = argv.next().ok_or(ArgsError::MissingText)?;
            let mut lang = "en".to_owned();
            let mut out = "speech.mp3".to_owned();
            while let Some(arg) = argv.next() {
                match arg.as_str() {
                    "--lang" => lang = require_value(&mut argv, "--lang")?,
                    "--out" => out = require_value(&mut argv, "--out")?,
                    other => return Err(ArgsError::UnknownArg(other.to_owned())),
                }
            }
            Ok(Some(Command::Speak { text, lang, out }))
        }
        other => Err(ArgsError::UnknownCommand(other.to_owned())),
    }
}

fn require_env(name: &'static str) -> Result<String, ArgsError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ArgsError::MissingEnv { name })
}

async fn sign_in(services: &AppServices) -> Result<UserId, Box<dyn std::error::Error>> {
    let email = require_env("VOCAB_EMAIL")?;
    let password = require_env("VOCAB_PASSWORD")?;

    match services.auth().sign_in(&email, &password).await {
        Ok(user) => {
            let display = user.username.as_deref().unwrap_or(&user.email);
            println!("Connecté en tant que {display}");
            Ok(user.user_id)
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = match parse_command(std::env::args().skip(1)) {
        Ok(Some(command)) => command,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    let database_url = require_env("FIREBASE_DATABASE_URL")?;
    let services = AppServices::new_firebase(&database_url, Clock::default_clock());
    let owner = sign_in(&services).await?;

    match command {
        Command::Words => list_words(&services, &owner).await,
        Command::Add { word } => add_word(&services, &owner, &word).await,
        Command::Quiz { mode } => run_quiz(&services, &owner, mode).await,
        Command::Stats => show_stats(&services, &owner).await,
        Command::Speak { text, lang, out } => speak(&services, &text, &lang, &out).await,
    }
}

async fn list_words(
    services: &AppServices,
    owner: &UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let words = services.word_service().list_words(owner).await?;
    if words.is_empty() {
        println!("Aucun mot enregistré pour le moment.");
        return Ok(());
    }

    println!("{} mots enregistrés:", words.len());
    for entry in words {
        println!(
            "  {}  — {}  ({})",
            entry.word(),
            entry.translation(),
            entry.created_at().format("%Y-%m-%d")
        );
        if !entry.definition().is_empty() {
            println!("      {}", entry.definition());
        }
    }
    Ok(())
}

async fn add_word(
    services: &AppServices,
    owner: &UserId,
    word: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let ai = services.ai();
    if !ai.enabled() {
        eprintln!("HUGGINGFACE_TOKEN manquant: impossible de générer le contenu.");
        return Err(ArgsError::MissingEnv {
            name: "HUGGINGFACE_TOKEN",
        }
        .into());
    }

    println!("Génération du contenu pour \"{word}\"...");
    let draft = ai.generate_word_content(word).await?;

    println!("  Mot:         {}", draft.word);
    println!("  Traduction:  {}", draft.translation);
    println!("  Définition:  {}", draft.definition);
    println!("  Exemple 1:   {}", draft.example1);
    println!("  Exemple 2:   {}", draft.example2);

    match services.word_service().add_word(owner, draft).await {
        Ok(entry) => {
            println!("'{}' ajouté à vos mots!", entry.word());
            Ok(())
        }
        Err(WordServiceError::Duplicate { word }) => {
            println!("Le mot '{word}' existe déjà dans votre liste.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_quiz(
    services: &AppServices,
    owner: &UserId,
    mode: QuizMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let game_loop = services.game_loop();
    let mut session = match game_loop.start_game(owner, mode).await {
        Ok(session) => session,
        Err(GameError::InsufficientWords { required, actual }) => {
            println!("Il vous faut au moins {required} mots pour jouer. Vous en avez {actual}.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let prompt = match mode {
        QuizMode::Translation => "Quelle est la signification de ce mot en français ?",
        QuizMode::Definition => "Quelle est la définition de ce mot en anglais ?",
    };

    loop {
        let Some(question) = session.current_question() else {
            break;
        };
        let number = session.current_index() + 1;
        let total = session.total_questions();
        let source_word = question.source_word().to_owned();
        let choices: Vec<String> = question.choices().to_vec();

        println!();
        println!("Question {number}/{total}: {source_word}");
        println!("{prompt}");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. {choice}", i + 1);
        }
        let selected = prompt_choice(&choices)?;

        match game_loop.answer_current(owner, &mut session, &selected).await {
            Ok(outcome) => {
                if outcome.answer.is_correct {
                    println!("✅ Correct!");
                } else {
                    println!("❌ Incorrect. Bonne réponse: {}", outcome.answer.correct_answer);
                }
            }
            Err(GameError::Storage(err)) if session.is_complete() => {
                eprintln!("Erreur lors de la sauvegarde du score: {err}");
                eprintln!("Nouvelle tentative...");
                game_loop.finalize_result(owner, &mut session).await?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    let score = session.score();
    let total = session.total_questions();
    #[allow(clippy::cast_precision_loss)]
    let percentage = f64::from(score) * 100.0 / total as f64;

    println!();
    println!("🎉 Quiz terminé!");
    println!("Score final: {score}/{total} ({percentage:.1}%)");
    for (i, answer) in session.answers().iter().enumerate() {
        let marker = if answer.is_correct { "✅" } else { "❌" };
        println!(
            "  {marker} Q{}: {} → {} (bonne réponse: {})",
            i + 1,
            answer.source_word,
            answer.selected_choice,
            answer.correct_answer
        );
    }
    Ok(())
}

fn prompt_choice(choices: &[String]) -> Result<String, Box<dyn std::error::Error>> {
    loop {
        print!("Votre réponse (1-{}): ", choices.len());
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(choices[n - 1].clone()),
            _ => println!("Choisissez un nombre entre 1 et {}.", choices.len()),
        }
    }
}

async fn show_stats(
    services: &AppServices,
    owner: &UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = services.stats();
    let word_count = stats.word_count(owner).await?;
    let game_stats = stats.game_stats(owner).await?;
    let monthly = stats.monthly_progress(owner).await?;

    println!("📚 Mots enregistrés: {word_count}");
    println!("🎮 Parties jouées:   {}", game_stats.total_games);
    match game_stats.best_score {
        Some(best) => println!("🏆 Meilleur score:   {best:.1}%"),
        None => println!("🏆 Meilleur score:   N/A"),
    }
    match game_stats.average_score {
        Some(average) => println!("📊 Score moyen:      {average:.1}%"),
        None => println!("📊 Score moyen:      N/A"),
    }

    if !monthly.is_empty() {
        println!();
        println!("Progression mensuelle:");
        for item in monthly {
            println!("  {}: {} nouveaux mots", item.month, item.count);
        }
    }
    Ok(())
}

async fn speak(
    services: &AppServices,
    text: &str,
    lang: &str,
    out: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let audio = services.tts().synthesize(text, lang).await?;
    std::fs::write(out, &audio)?;
    println!("Audio écrit dans {out} ({} octets)", audio.len());
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
