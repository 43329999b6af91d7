use anyhow::{Context, Result};
use book_companion::config::get_configuration;
use book_companion::controllers::{ChapterPage, SendOutcome};
use book_companion::models::{
    HardwareExperience, LearnerProfile, PasswordSignUp, SignUpProfile, SoftwareBackground,
};
use book_companion::services::{Credentials, SignUp};
use book_companion::startup::build_companion;
use book_companion::Companion;
use clap::{Args, Parser, Subcommand};
use companion_core::observability::init_tracing;
use dotenvy::dotenv;
use secrecy::Secret;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "book-companion")]
#[command(about = "Reader companion for the Physical AI & Humanoid Robotics book", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        email: String,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Use the password form backend
        #[arg(long, requires = "confirm_password")]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    SignOut,
    /// Backend health and session state
    Status,
    /// Translate a chapter to Urdu and claim the bonus
    Translate {
        #[arg(long)]
        chapter: String,
        #[arg(long)]
        file: PathBuf,
        /// Switch back to the original after translating
        #[arg(long)]
        restore: bool,
    },
    /// Rewrite a chapter for a learner profile
    Personalize {
        #[arg(long)]
        chapter: String,
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Ask the book assistant questions
    Chat {
        #[arg(long)]
        selection: Option<String>,
    },
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long, value_enum, default_value_t = SoftwareBackground::Beginner)]
    software_background: SoftwareBackground,
    #[arg(long, value_enum, default_value_t = HardwareExperience::Low)]
    hardware_experience: HardwareExperience,
    /// Comma separated, e.g. "python,c++"
    #[arg(long, default_value = "")]
    languages: String,
    #[arg(long, default_value = "")]
    goal: String,
}

impl ProfileArgs {
    fn into_profile(self) -> LearnerProfile {
        LearnerProfile {
            software_background: self.software_background,
            hardware_experience: self.hardware_experience,
            programming_languages: LearnerProfile::parse_languages(&self.languages),
            learning_goal: self.goal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let telemetry = &configuration.telemetry;
    init_tracing(
        &telemetry.service_name,
        &telemetry.log_level,
        telemetry.otlp_endpoint.as_deref(),
    )?;

    let companion = build_companion(&configuration)?;

    match cli.command {
        Commands::SignUp {
            email,
            profile,
            password,
            confirm_password,
        } => sign_up(&companion, email, profile, password, confirm_password).await?,
        Commands::SignIn { email, password } => {
            let credentials = match password {
                Some(password) => Credentials::Password {
                    email,
                    password: Secret::new(password),
                },
                None => Credentials::Email(email),
            };
            let user = companion.auth.sign_in(credentials).await?;
            println!("Signed in as {}", user.email.as_deref().unwrap_or(&user.external_id));
        }
        Commands::SignOut => {
            companion.auth.sign_out();
            println!("Signed out");
        }
        Commands::Status => status(&companion).await,
        Commands::Translate {
            chapter,
            file,
            restore,
        } => translate(&companion, &chapter, &file, restore).await?,
        Commands::Personalize {
            chapter,
            file,
            profile,
        } => {
            let page = read_page(&file)?;
            let mut personalizer = companion.personalizer(&chapter, &page);
            if personalizer.personalize(&profile.into_profile()).await {
                if let Some(result) = personalizer.personalized() {
                    println!("{}", result.personalized_content);
                }
            } else {
                anyhow::bail!(
                    "{}",
                    personalizer.error().unwrap_or("Failed to personalize chapter")
                );
            }
        }
        Commands::Chat { selection } => chat(&companion, selection).await?,
    }

    Ok(())
}

async fn sign_up(
    companion: &Companion,
    email: String,
    profile: ProfileArgs,
    password: Option<String>,
    confirm_password: Option<String>,
) -> Result<()> {
    let profile = profile.into_profile();
    let request = match password {
        Some(password) => SignUp::WithPassword(PasswordSignUp {
            email,
            password,
            confirm_password: confirm_password.unwrap_or_default(),
            software_background: profile.software_background,
            hardware_experience: profile.hardware_experience,
            programming_languages: profile.programming_languages,
            learning_goal: profile.learning_goal,
        }),
        None => SignUp::Profile(SignUpProfile {
            external_id: None,
            email: Some(email),
            profile,
        }),
    };

    let user = companion.auth.sign_up(request).await?;
    println!("Welcome, {}", user.email.as_deref().unwrap_or(&user.external_id));
    Ok(())
}

async fn status(companion: &Companion) {
    match companion.backend.health().await {
        Ok(health) => println!(
            "backend: {} ({} {})",
            health.status,
            health.service.as_deref().unwrap_or("-"),
            health.version.as_deref().unwrap_or("-")
        ),
        Err(e) => println!("backend: unreachable ({})", e),
    }

    match companion.session.external_id() {
        Some(id) => println!("session: signed in as {}", id),
        None => println!("session: signed out"),
    }
    if let Some(credentials) = companion.session.legacy_credentials() {
        println!("password account: user {}", credentials.user_id);
    }
}

fn read_page(file: &Path) -> Result<ChapterPage> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read chapter file {}", file.display()))?;
    Ok(ChapterPage::new(body))
}

async fn translate(companion: &Companion, chapter: &str, file: &Path, restore: bool) -> Result<()> {
    let page = read_page(file)?;
    let mut actions = companion.chapter_actions(chapter, &page);

    actions.mount().await;
    if !companion.session.is_logged_in() {
        anyhow::bail!("Sign in to translate chapters");
    }
    if actions.is_disabled() {
        anyhow::bail!("{}", actions.message().unwrap_or("Translation unavailable"));
    }

    actions.translate().await;
    if restore && actions.has_translation() {
        actions.toggle().await;
    }

    if let Some(message) = actions.message() {
        eprintln!("{}", message);
    }
    println!("{}", actions.rendered());
    Ok(())
}

async fn chat(companion: &Companion, selection: Option<String>) -> Result<()> {
    let mut session = companion.chat();
    session.capture_selection(selection.as_deref());

    if let Some(welcome) = session.messages().first() {
        println!("{}\n", welcome.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if let Some(text) = line.strip_prefix("/select") {
            session.capture_selection(Some(text));
            match session.selected_text() {
                Some(selected) => println!("(selected: {})", selected),
                None => println!("(selection cleared)"),
            }
            continue;
        }

        match session.send(line).await {
            SendOutcome::Rejected => {
                println!("{}", session.error().unwrap_or("Please enter a message"))
            }
            SendOutcome::Answered | SendOutcome::Failed => {
                if let Some(reply) = session.messages().last() {
                    println!("{}", reply.content);
                    for source in reply.sources.iter().flatten() {
                        println!("  - {} ({}): {}", source.title, source.chapter, source.excerpt(80));
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}
