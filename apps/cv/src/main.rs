mod config;
mod content;
mod document;
mod errors;
mod export;
mod i18n;
mod models;
mod projects;
mod routes;
mod sections;
mod site;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::{FileLanguagePersistence, LanguagePersistence, PinnedLanguage};
use crate::export::ExportStrategy;
use crate::i18n::BundledLocaleSource;
use crate::models::Language;
use crate::routes::build_router;
use crate::site::html_document;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "cv", version, about = "Bilingual CV site and document export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the page and the export API.
    Serve,
    /// Render the page for the active language into a directory.
    Build {
        #[arg(long, default_value = "dist")]
        out: PathBuf,
    },
    /// Run one export and write the file.
    Export {
        /// Language to export; defaults to the persisted preference.
        #[arg(long)]
        lang: Option<Language>,
        #[arg(long, default_value = "document")]
        strategy: ExportStrategy,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show or set the persisted language.
    Language { value: Option<Language> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Build { out } => build(config, &out).await,
        Command::Export {
            lang,
            strategy,
            out,
        } => export(config, lang, strategy, &out).await,
        Command::Language { value } => language(config, value).await,
    }
}

fn file_persistence(config: &Config) -> Arc<dyn LanguagePersistence> {
    Arc::new(FileLanguagePersistence::new(config.state_path.clone()))
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting cv v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::bootstrap(config.clone(), file_persistence(&config)).await?;
    let _watcher = state.site.spawn_watcher();

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build(config: Config, out: &Path) -> Result<()> {
    let state = AppState::bootstrap(config.clone(), file_persistence(&config)).await?;
    let tree = state.site.live.snapshot();
    let title = format!("CV - {}", state.store.cv_data().personal_info.full_name());

    let locales_out = out.join("locales");
    tokio::fs::create_dir_all(&locales_out)
        .await
        .with_context(|| format!("creating {}", locales_out.display()))?;
    tokio::fs::write(out.join("index.html"), html_document(&tree, &title, ""))
        .await
        .context("writing index.html")?;

    for language in [Language::Fr, Language::En] {
        let name = format!("{}.json", language.code());
        let text = match &config.locales_dir {
            Some(dir) => tokio::fs::read_to_string(dir.join(&name))
                .await
                .with_context(|| format!("reading locale {name}"))?,
            None => BundledLocaleSource::raw(language).to_string(),
        };
        tokio::fs::write(locales_out.join(&name), text)
            .await
            .with_context(|| format!("writing locale {name}"))?;
    }

    info!(out = %out.display(), language = %state.store.language(), "page built");
    Ok(())
}

async fn export(config: Config, lang: Option<Language>, strategy: ExportStrategy, out: &Path) -> Result<()> {
    let persistence: Arc<dyn LanguagePersistence> = match lang {
        Some(language) => Arc::new(PinnedLanguage(language)),
        None => file_persistence(&config),
    };
    let state = AppState::bootstrap(config, persistence).await?;
    let artifact = state.orchestrator.export(strategy).await?;

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("creating {}", out.display()))?;
    let path = out.join(&artifact.filename);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(file = %path.display(), bytes = artifact.bytes.len(), "export written");
    println!("{}", path.display());
    Ok(())
}

async fn language(config: Config, value: Option<Language>) -> Result<()> {
    let persistence = file_persistence(&config);
    match value {
        Some(language) => {
            persistence.save(language).await?;
            info!(%language, "language preference saved");
            println!("{}", language.code());
        }
        None => {
            let language = persistence.load().await?.unwrap_or_default();
            println!("{}", language.code());
        }
    }
    Ok(())
}
