use chrono::Utc;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mirrorfront::{
    Config,
    cms::CmsClient,
    content::{ContentSource, WordPressSource},
    create_app,
    resolver::{Resolution, ResolveOptions, resolve},
    sitemap::{self, NewsPublication},
    startup_checks,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Overrides `app.log_level` from the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server (default if no command specified)
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,

        /// Automatically quit after specified number of seconds (useful for testing)
        #[arg(long)]
        quit_after: Option<u64>,
    },

    /// Show what a root-level slug resolves to
    Resolve {
        slug: String,
    },

    /// Print the sitemap XML to stdout
    Sitemap {
        /// Print the Google News sitemap instead
        #[arg(long)]
        news: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = load_config(&cli.config)?;
    let level = log_level(cli.log_level.as_deref(), &config.app.log_level);

    // Logs go to stderr so `sitemap` output can be piped
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !config_found {
        info!("Config file not found at {:?}, using defaults", cli.config);
    }

    match cli.command {
        Some(Commands::Serve {
            port,
            host,
            quit_after,
        }) => run_server(config, &cli.config, port, host, quit_after).await,
        Some(Commands::Resolve { slug }) => resolve_command(config, &slug).await,
        Some(Commands::Sitemap { news }) => sitemap_command(config, news).await,
        None => run_server(config, &cli.config, None, None, None).await,
    }
}

fn load_config(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        let config_content = std::fs::read_to_string(config_path)?;
        toml_edit::de::from_str::<Config>(&config_content)?
    } else {
        Config::default()
    };

    config.apply_env_overrides();
    Ok(config)
}

/// The CLI flag wins over the config file; unknown names fall back to info.
fn log_level(cli: Option<&str>, configured: &str) -> Level {
    match cli.unwrap_or(configured).to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn content_source(config: &Config) -> Result<WordPressSource, Box<dyn std::error::Error>> {
    let client = CmsClient::new(&config.cms)?;
    Ok(WordPressSource::new(client))
}

async fn resolve_command(config: Config, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(&config)?;

    match resolve(&source, slug, ResolveOptions::from(&config.home)).await {
        Resolution::Category { category, posts } => {
            println!(
                "category {} ({}) with {} posts",
                category.slug,
                category.name,
                posts.len()
            );
            for post in posts {
                println!("  {}  {}", post.slug, post.title);
            }
        }
        Resolution::Article { post, trending } => {
            println!("article {} ({}): {}", post.slug, post.id, post.title);
            println!("  by {} on {}", post.author.name, post.date);
            for related in trending {
                println!("  trending: {}", related.slug);
            }
        }
        Resolution::NotFound => {
            println!("not found: {}", slug);
        }
    }

    Ok(())
}

async fn sitemap_command(config: Config, news: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = content_source(&config)?;
    let source: &dyn ContentSource = &source;
    let site_url = config.app.site_url();

    let xml = if news {
        let publication = NewsPublication {
            name: &config.app.name,
            language: &config.app.language,
        };
        sitemap::generate_news_sitemap(source, site_url, publication, Utc::now()).await?
    } else {
        sitemap::generate_sitemap(source, site_url, Utc::now()).await?
    };

    print!("{}", xml);
    Ok(())
}

async fn run_server(
    config: Config,
    config_path: &Path,
    port: Option<u16>,
    host: Option<String>,
    quit_after: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = host.unwrap_or(config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info!("Starting {} server", config.app.name);
    info!("Configuration loaded from: {:?}", config_path);
    info!("Template directory: {:?}", config.templates.directory);
    info!(
        "Static files directory: {:?}",
        config.static_files.directory
    );

    match startup_checks::perform_startup_checks(&config).await {
        Ok(()) => info!("All startup checks passed"),
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }

            if errors.iter().any(|e| e.is_critical()) {
                tracing::error!("Critical startup check failed, exiting");
                return Err("Critical startup check failed".into());
            } else {
                tracing::warn!("Non-critical startup checks failed, continuing");
            }
        }
    }

    let app = create_app(config).await?;

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);
    let graceful = server.with_graceful_shutdown(shutdown_signal(quit_after));

    if let Err(e) = graceful.await {
        tracing::error!("Server error: {}", e);
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(quit_after: Option<u64>) {
    use tokio::signal;
    use tokio::time::{Duration, sleep};

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let quit_timer = async {
        if let Some(seconds) = quit_after {
            info!(
                "Server will automatically shut down after {} seconds",
                seconds
            );
            sleep(Duration::from_secs(seconds)).await;
            info!("Quit timer expired, shutting down");
        } else {
            std::future::pending::<()>().await
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        },
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        },
        _ = quit_timer => {},
    }
}
