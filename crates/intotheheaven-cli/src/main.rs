//! IntoTheHeaven shell - a terminal front end for the offline cache and the
//! community API.
//!
//! The cache commands drive the offline controller against a cache directory
//! that persists between runs, so the fallback behaviour can be inspected
//! without a browser. The account commands exercise the API client.

mod host;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use intotheheaven_core::api::NotificationPort;
use intotheheaven_core::auth::DeviceStorage;
use intotheheaven_core::utils::{format_date, format_phone, truncate_string};
use intotheheaven_core::worker::{
    FetchResponse, InstallReport, Network, NotificationClick, OfflineController, PushMessage,
};
use intotheheaven_core::{ApiClient, CacheStorage, Config, Request, Response};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use host::{ConsoleHost, ConsolePort, ShellNetwork};

/// Log file name prefix inside the data directory
const LOG_FILE_PREFIX: &str = "intotheheaven.log";

/// How much of a response body `fetch` prints
const BODY_PREVIEW_CHARS: usize = 400;

/// IntoTheHeaven shell: drive the offline cache and the community API from
/// the terminal.
#[derive(Debug, Parser)]
#[command(name = "intotheheaven", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Precache the app shell for the current cache version.
    Install,

    /// Evict caches from other versions.
    Activate,

    /// Install, then activate.
    Update,

    /// Request a URL or path through the offline controller.
    Fetch {
        /// Absolute URL, or a path resolved against the app origin.
        /// Example: `/groups`
        url: String,

        /// Treat the network as unreachable to exercise the offline fallbacks.
        #[arg(long)]
        offline: bool,
    },

    /// List cache stores and their entries.
    Caches,

    /// Show a push notification.
    Push {
        /// Notification body. Omit for the default message.
        text: Vec<String>,
    },

    /// Click the last notification.
    Click,

    /// Sign in. Defaults to the last email used.
    Login { email: Option<String> },

    /// Forget the stored session.
    Logout,

    /// Show your profile.
    Me,

    /// List groups in your church.
    Groups,

    /// List your prayer requests.
    Prayers,
}

/// Initialize the tracing subscriber for logging.
/// Logs go to stderr (filtered by RUST_LOG, default warn) and to a daily
/// rolling file in the data directory.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
    .with_env();

    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let _guard = init_tracing(&data_dir);
    debug!(command = ?cli.command, "Running command");

    match cli.command {
        Command::Install => install(&config, false).await,
        Command::Activate => activate(&config).await,
        Command::Update => install(&config, true).await,
        Command::Fetch { url, offline } => fetch(&config, &url, offline).await,
        Command::Caches => list_caches(&config).await,
        Command::Push { text } => push(&config, &text).await,
        Command::Click => click(&config).await,
        Command::Login { email } => login(config, email).await,
        Command::Logout => logout(&config).await,
        Command::Me => me(&config).await,
        Command::Groups => groups(&config).await,
        Command::Prayers => prayers(&config).await,
    }
}

// ============================================================================
// Offline cache
// ============================================================================

fn open_storage(config: &Config) -> Result<Arc<CacheStorage>> {
    let dir = config.cache_stores_dir()?;
    let storage = CacheStorage::open_dir(&dir)
        .with_context(|| format!("Failed to open cache directory {}", dir.display()))?;
    Ok(Arc::new(storage))
}

fn controller(
    config: &Config,
    network: ShellNetwork,
) -> Result<OfflineController<ShellNetwork, ConsoleHost>> {
    Ok(OfflineController::new(
        config.controller_config()?,
        open_storage(config)?,
        network,
        ConsoleHost,
    ))
}

async fn install(config: &Config, then_activate: bool) -> Result<()> {
    let controller = controller(config, ShellNetwork::online()?)?;

    match controller.install().await {
        InstallReport::Precached { store, count } => {
            println!("Cached {} app shell assets in {}", count, store);
        }
        InstallReport::Failed { reason } => {
            println!("App shell not cached: {}", reason);
        }
    }

    if then_activate {
        report_activation(&controller).await;
    }
    Ok(())
}

async fn activate(config: &Config) -> Result<()> {
    let controller = controller(config, ShellNetwork::online()?)?;
    report_activation(&controller).await;
    Ok(())
}

async fn report_activation<N: Network>(controller: &OfflineController<N, ConsoleHost>) {
    let report = controller.activate().await;
    if report.deleted.is_empty() {
        println!("No outdated caches");
    } else {
        for name in report.deleted {
            println!("Deleted {}", name);
        }
    }
}

async fn fetch(config: &Config, target: &str, offline: bool) -> Result<()> {
    let controller_config = config.controller_config()?;
    let url = controller_config
        .root_url()
        .join(target)
        .with_context(|| format!("Invalid URL: {}", target))?;

    let network = if offline {
        ShellNetwork::Offline
    } else {
        ShellNetwork::online()?
    };
    let storage = open_storage(config)?;

    let controller =
        OfflineController::start(controller_config, storage, network.clone(), ConsoleHost).await;

    let request = Request::infer(url);
    match controller.handle_fetch(request.clone()).await {
        FetchResponse::Respond(response) => print_response(&response),
        FetchResponse::Passthrough => {
            println!("(not intercepted)");
            match network.fetch(&request).await {
                Ok(response) => print_response(&response),
                Err(e) => println!("Network error: {}", e),
            }
        }
    }
    Ok(())
}

fn print_response(response: &Response) {
    println!("HTTP {}", response.status);
    for (name, value) in &response.headers {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    println!();

    if response.body.is_empty() {
        println!("(empty body)");
    } else if let Ok(text) = std::str::from_utf8(&response.body) {
        println!("{}", truncate_string(text, BODY_PREVIEW_CHARS));
    } else {
        println!("({} bytes of binary data)", response.body.len());
    }
}

async fn list_caches(config: &Config) -> Result<()> {
    let storage = open_storage(config)?;
    let controller_config = config.controller_config()?;

    let names = storage.keys().await;
    if names.is_empty() {
        println!("No cache stores");
        return Ok(());
    }

    for name in names {
        let Some(store) = storage.store(&name).await else {
            continue;
        };
        let marker = if controller_config.is_current_store(&name) {
            ""
        } else {
            " (outdated)"
        };
        println!("{}{}", name, marker);
        for entry in store.entries().await {
            println!(
                "  {} {:>8} B  {:>9}  {}",
                entry.status, entry.size_bytes, entry.age, entry.key
            );
        }
    }
    Ok(())
}

async fn push(config: &Config, words: &[String]) -> Result<()> {
    let controller = controller(config, ShellNetwork::Offline)?;
    let message = if words.is_empty() {
        PushMessage::empty()
    } else {
        PushMessage::text(words.join(" "))
    };
    controller.handle_push(message).await;
    Ok(())
}

async fn click(config: &Config) -> Result<()> {
    let controller = controller(config, ShellNetwork::Offline)?;
    controller
        .handle_notification_click(NotificationClick::default())
        .await;
    Ok(())
}

// ============================================================================
// Account
// ============================================================================

async fn api_client(config: &Config) -> Result<ApiClient> {
    let mut storage = DeviceStorage::new(config.data_dir()?);
    if let Err(e) = storage.load() {
        warn!(error = %e, "Failed to load device state, starting signed out");
    }

    let port: Arc<dyn NotificationPort> = Arc::new(ConsolePort);
    let client = ApiClient::new(config.api_base_url(), Arc::new(Mutex::new(storage)), port)?;
    Ok(client)
}

async fn require_login(client: &ApiClient) -> Result<()> {
    if !client.is_authenticated().await {
        bail!("Not signed in. Run `intotheheaven login` first.");
    }
    Ok(())
}

async fn login(mut config: Config, email: Option<String>) -> Result<()> {
    let Some(email) = email.or_else(|| config.last_email.clone()) else {
        bail!("No email given and none remembered. Run `intotheheaven login <email>`.");
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", email))?;

    let client = api_client(&config).await?;
    let response = client.login(&email, &password).await?;

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if response.is_provisioned() {
        println!("Account needs confirmation before first use.");
        return Ok(());
    }

    let churches = client.my_churches().await?;
    match churches.as_slice() {
        [] => println!("Signed in. You have not joined a church yet."),
        [church] => {
            client.select_church(&church.id).await;
            println!("Signed in to {}.", church.name);
        }
        [first, ..] => {
            client.select_church(&first.id).await;
            println!(
                "Signed in to {} ({} churches available).",
                first.name,
                churches.len()
            );
        }
    }
    Ok(())
}

async fn logout(config: &Config) -> Result<()> {
    let client = api_client(config).await?;
    client.logout().await;
    println!("Signed out.");
    Ok(())
}

async fn me(config: &Config) -> Result<()> {
    let client = api_client(config).await?;
    require_login(&client).await?;

    let user = client.my_info().await?;
    println!("{} <{}>", user.name, user.email);
    println!("Phone:    {}", format_phone(&user.phone));
    println!("Birthday: {}", format_date(&user.birthday));
    if let Some(status) = user.baptism_status {
        println!("Baptism:  {}", status.display_name());
    }
    Ok(())
}

async fn groups(config: &Config) -> Result<()> {
    let client = api_client(config).await?;
    require_login(&client).await?;

    let church_id = client.storage().lock().await.church_id().map(str::to_string);
    let church_id = match church_id {
        Some(id) => id,
        None => {
            let churches = client.my_churches().await?;
            let Some(church) = churches.first() else {
                bail!("You have not joined a church yet.");
            };
            client.select_church(&church.id).await;
            church.id.clone()
        }
    };

    let groups = client.groups_by_church(&church_id).await?;
    if groups.is_empty() {
        println!("No groups");
    }
    for group in groups {
        println!(
            "{:<24} {:>5}  {} ~ {}",
            truncate_string(&group.name, 24),
            group.display_member_count(),
            format_date(&group.start_date),
            format_date(&group.end_date)
        );
    }
    Ok(())
}

async fn prayers(config: &Config) -> Result<()> {
    let client = api_client(config).await?;
    require_login(&client).await?;

    let prayers = client.my_prayers().await?;
    if prayers.is_empty() {
        println!("No prayer requests");
    }
    for prayer in prayers {
        let when = prayer
            .gathering_date
            .as_deref()
            .or(prayer.created_at.as_deref())
            .map(format_date)
            .unwrap_or_default();
        println!(
            "[{}] {}  {}  {}",
            prayer.status_label(),
            truncate_string(&prayer.prayer_request, 40),
            prayer.group_name.as_deref().unwrap_or("-"),
            when
        );
    }
    Ok(())
}
