//! Marketplace CLI
//!
//! Command-line driver for the marketplace core:
//! - Sign up, log in and out
//! - Show or change the theme preference
//! - List purchases and the plugin catalog
//! - Preview the particle background in the terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketplace::{
    AsciiSurface, Category, Config, Control, FileStore, LoadedConfig, LoggingConfig, Marketplace,
    Notice, NoticeKind, Page, PageView, SignInForm, SignUpForm, Theme, TransactionRecord,
};

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plugin marketplace accounts, themes and purchases")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the storage directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup {
        email: String,
        password: String,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Sign in
    Login { email: String, password: String },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// List the signed-in user's purchases
    Transactions,

    /// List plugins for sale
    Catalog {
        /// Category to show (effects, instruments, utilities)
        #[arg(short, long)]
        filter: Option<Category>,
    },

    /// Render the particle background as text
    Animate {
        /// Frames to draw
        #[arg(short, long, default_value = "1")]
        frames: u64,
        /// Frames per second when drawing more than one frame
        #[arg(long, default_value = "30")]
        fps: u64,
        #[arg(long, default_value = "80")]
        columns: usize,
        #[arg(long, default_value = "24")]
        rows: usize,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the saved theme and its palette
    Show,
    /// Save and apply a theme (default, dark, light, nebula)
    Set { theme: Theme },
}

/// Page adapter printing notices to the terminal
struct TerminalView;

impl PageView for TerminalView {
    fn set_control_visible(&self, control: Control, visible: bool) {
        tracing::debug!("{:?} control visible: {}", control, visible);
    }

    fn set_welcome(&self, email: Option<&str>) {
        if let Some(email) = email {
            tracing::info!("Welcome, {}", email);
        }
    }

    fn show_notice(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.text),
            NoticeKind::Error => eprintln!("{}", notice.text),
        }
    }

    fn redirect_after(&self, page: Page, delay: Duration) {
        tracing::debug!("Would open {} after {:?}", page.href(), delay);
    }

    fn set_transactions(&self, records: Vec<TransactionRecord>) {
        tracing::debug!("{} transactions loaded", records.len());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config discovery is reported once the subscriber exists
    let LoadedConfig { mut config, notes } = match &cli.config {
        Some(path) => Config::read_with_env(path)?,
        None => Config::discover_default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    init_logging(&config.logging);
    for note in &notes {
        note.log();
    }

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let store = FileStore::in_dir(&config.storage.data_dir)
        .with_context(|| format!("Cannot open storage in {}", config.storage.data_dir))?;
    tracing::debug!("Storage file: {:?}", store.path());

    let app = Marketplace::new(Rc::new(store), config.auth.backend, &config.auth.identity);

    match cli.command {
        Commands::Signup {
            email,
            password,
            confirm,
        } => {
            let binder = app.bind(Rc::new(TerminalView))?;
            let form = SignUpForm {
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            if binder.submit_sign_up(&form).await.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Login { email, password } => {
            let binder = app.bind(Rc::new(TerminalView))?;
            if binder
                .submit_sign_in(&SignInForm { email, password })
                .await
                .is_err()
            {
                std::process::exit(1);
            }
        }

        Commands::Logout => {
            let binder = app.bind(Rc::new(TerminalView))?;
            if binder.sign_out().await.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Whoami => match app.backend().current_session()? {
            Some(session) => {
                println!("Welcome, {}", session.email);
                if let Some(id) = session.user_id {
                    println!("User id: {}", id);
                }
            }
            None => println!("Not signed in."),
        },

        Commands::Theme { action } => match action {
            ThemeAction::Show => {
                let theme = app.themes().saved_theme()?;
                let palette = theme.palette();
                println!("Theme: {}", theme.label());
                for (name, stop) in ["core", "mid", "edge"].iter().zip(palette.disk_stops) {
                    println!("  disk {:<5} {}", name, stop);
                }
                println!("  particle   {}", palette.particle);
            }
            ThemeAction::Set { theme } => {
                app.themes().apply_theme(theme)?;
                println!("Theme set to {}", theme.label());
            }
        },

        Commands::Transactions => {
            let session = app.backend().current_session()?;
            let Some(session) = session else {
                println!("Log in to see your transactions.");
                return Ok(());
            };

            let panel = app.transactions().toggle_display(Some(&session.email))?;
            println!("Transactions for {}", session.email);
            println!("{}", "-".repeat(50));
            for line in panel.lines {
                println!("{}", line);
            }
        }

        Commands::Catalog { filter } => {
            let catalog = app.catalog();
            if let Some(category) = filter {
                catalog.select(category);
            }

            println!("{:<24} {:<12} {:<8} {}", "Name", "Category", "Price", "Description");
            println!("{}", "-".repeat(90));
            for listing in catalog.visible() {
                println!(
                    "{:<24} {:<12} {:<8} {}",
                    listing.name,
                    listing.category.label(),
                    listing.price,
                    listing.description
                );
            }
        }

        Commands::Animate {
            frames,
            fps,
            columns,
            rows,
        } => {
            // Terminal cells are roughly twice as tall as they are wide
            let (width, height) = (columns as f64 * 8.0, rows as f64 * 16.0);
            let mut renderer = app.renderer(config.renderer.clone(), width, height);
            let mut surface = AsciiSurface::new(columns, rows, width, height);
            let frame_delay = Duration::from_millis(1000 / fps.max(1));

            for frame in 0..frames {
                renderer.draw_frame(&mut surface);
                if frames > 1 {
                    print!("\x1b[2J\x1b[H");
                }
                print!("{}", surface);

                if frame + 1 < frames {
                    tokio::time::sleep(frame_delay).await;
                }
            }
        }

        // Handled before storage is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("marketplace={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = marketplace::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}
