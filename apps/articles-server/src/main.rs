use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs, DatabaseConfig};

use api_ingress::{ApiIngress, ApiIngressConfig};
use articles::infra::cache::LoggingInvalidator;
use articles::infra::storage::{InMemoryContentRepository, SeaOrmContentRepository};
use articles::{Articles, ArticlesConfig};

use articles::domain::repo::ContentRepository;
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no options are given so the file is created on first run.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, q),
        None => (db_path, "mode=rwc"),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    Ok(format!(
        "sqlite://{}?{}",
        p.to_string_lossy().replace('\\', "/"),
        query
    ))
}

/// Articles Server - REST API for articles with nested addresses
#[derive(Parser)]
#[command(name = "articles-server")]
#[command(about = "Articles Server - REST API for articles with nested addresses")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep content in memory instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Articles Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Module settings for the HTTP host. Without an explicit `bind_addr` the
/// server section decides where to listen.
fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    let explicit_bind = config
        .modules
        .get("api_ingress")
        .and_then(|v| v.get("bind_addr"))
        .is_some();
    if !explicit_bind {
        ingress.bind_addr = config.server.bind_addr();
    }
    Ok(ingress)
}

async fn open_repository(config: &AppConfig) -> Result<Arc<dyn ContentRepository>> {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("No database configuration found, keeping content in memory");
        return Ok(Arc::new(InMemoryContentRepository::new()));
    };

    let backend = detect_from_dsn(db_config)?;
    let mut dsn = db_config.url.trim().to_owned();
    if backend == "sqlite" {
        // Absolutize sqlite DSNs to avoid cwd issues
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir), true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts).await?;
    tracing::info!("Connected DB backend: {}", backend);

    Articles::migrate(&db).await?;
    Ok(Arc::new(SeaOrmContentRepository::new(db)))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let ingress = Arc::new(ApiIngress::new(ingress_config(&config)?));
    let articles_cfg: ArticlesConfig = config.module_config("articles")?;

    let repo = open_repository(&config).await?;
    let articles = Articles::new();
    articles.init(&articles_cfg, repo, Arc::new(LoggingInvalidator))?;

    let router = ingress.rest_prepare(Router::new());
    let router = articles.register_rest(router)?;
    ingress.register_openapi(Articles::openapi());
    ingress.rest_finalize(router)?;

    let cancel = CancellationToken::new();
    let mut server = tokio::spawn(ingress.clone().serve(cancel.clone(), None));

    tokio::select! {
        // Bind failures and the like end the server before any signal arrives
        joined = &mut server => {
            return joined.map_err(|e| anyhow!("HTTP server task failed: {}", e))?;
        }
        res = shutdown_signal() => {
            res?;
            tracing::info!("Shutdown signal received");
            cancel.cancel();
        }
    }

    let joined = match config.server.timeout_sec {
        0 => server.await,
        secs => tokio::time::timeout(Duration::from_secs(secs), server)
            .await
            .map_err(|_| anyhow!("HTTP server did not stop within {}s", secs))?,
    };
    joined.map_err(|e| anyhow!("HTTP server task failed: {}", e))??;

    tracing::info!("Articles Server stopped");
    Ok(())
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = term.recv() => {}
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = config.database.as_ref() {
        detect_from_dsn(db)?;
    }
    let ingress = ingress_config(&config)?;
    ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .map_err(|e| anyhow!("Invalid bind address '{}': {}", ingress.bind_addr, e))?;
    let _: ArticlesConfig = config.module_config("articles")?;

    // AppConfig::load_* already normalized & created home_dir
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
