use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use eventdesk::api::{AdminApi, ApiClient, NotificationsApi, images};
use eventdesk::config::{AdminConfig, ConfigError, normalize_base_url};
use eventdesk::debounce::debounce_search;
use eventdesk::error::{ApiError, Notice, Notifier, Severity};
use eventdesk::list::{ListController, ListSource};
use eventdesk::models::status::DomainStatus;
use eventdesk::models::{BookingStatus, OnboardingStatus, PaymentStatus, Record, RecordId};
use eventdesk::notifications::{NotificationFeed, PollEvent, spawn_notification_poller};
use eventdesk::validation::{self, ValidationError};
use eventdesk::views::directory::DirectorySource;
use eventdesk::views::{self, ViewContext};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid filter `{0}`; expected key=value")]
    InvalidFilter(String),
}

#[derive(Parser, Debug)]
#[command(name = "eventdesk", about = "Admin console for the events-booking backend")]
struct Cli {
    /// Backend base URL (the directory holding admin.php).
    #[arg(long, env = "EVENTDESK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Bookings {
        #[command(subcommand)]
        command: BookingSubcommand,
    },
    Organizers {
        #[command(subcommand)]
        command: DirectorySubcommand,
    },
    Staff {
        #[command(subcommand)]
        command: DirectorySubcommand,
    },
    Suppliers {
        #[command(subcommand)]
        command: DirectorySubcommand,
    },
    Venues {
        #[command(subcommand)]
        command: DirectorySubcommand,
    },
    Payments {
        #[command(subcommand)]
        command: PaymentSubcommand,
    },
    Activity(ListArgs),
    Sessions {
        #[command(subcommand)]
        command: SessionSubcommand,
    },
    /// Upload an image and print the stored path.
    Upload {
        file: PathBuf,
        #[arg(long = "type", default_value = "venue")]
        upload_type: String,
    },
    /// Download a stored image, or print its URL.
    Image {
        path: String,
        #[arg(long, help = "Write bytes here instead of printing the URL")]
        output: Option<PathBuf>,
    },
    Notifications {
        #[command(subcommand)]
        command: NotificationSubcommand,
    },
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long, help = "Extra filter, key=value; repeatable")]
    filter: Vec<String>,
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum BookingSubcommand {
    List(ListArgs),
    /// Read search queries from stdin, one per line, and print each settled page.
    Search,
    SetStatus { id: RecordId, status: String },
    Convert { id: RecordId },
}

#[derive(Subcommand, Debug)]
enum DirectorySubcommand {
    List(ListArgs),
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: RecordId,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: RecordId,
    },
    SetStatus {
        id: RecordId,
        status: String,
    },
}

#[derive(Subcommand, Debug)]
enum PaymentSubcommand {
    List(ListArgs),
    Record {
        #[arg(long)]
        data: String,
    },
    SetStatus { payment_id: RecordId, status: String },
}

#[derive(Subcommand, Debug)]
enum SessionSubcommand {
    List(ListArgs),
    Analytics,
    Terminate { id: RecordId },
}

#[derive(Subcommand, Debug)]
enum NotificationSubcommand {
    Watch {
        #[arg(long)]
        user_id: i64,
        #[arg(long, help = "Only deliver items newer than this timestamp")]
        since: Option<String>,
        #[arg(long, default_value_t = false, help = "Poll once and exit")]
        once: bool,
    },
}

/// Prints notices to stderr so stdout stays machine-readable.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        let label = match notice.severity {
            Severity::Info => "info",
            Severity::Destructive => "error",
        };
        eprintln!("[{label}] {}: {}", notice.title, notice.description);
    }
}

struct CliContext {
    config: AdminConfig,
    client: ApiClient,
    views: ViewContext,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = normalize_base_url(&url);
        config.validate()?;
    }
    let client = ApiClient::new(&config)?;
    let view_ctx = ViewContext::new(client.clone(), config.page_size, Arc::new(StderrNotifier));
    let ctx = CliContext { config, client, views: view_ctx };

    match cli.command {
        Command::Bookings { command } => run_bookings(&ctx, command).await,
        Command::Organizers { command } => run_directory(views::directory::organizers(&ctx.views), command).await,
        Command::Staff { command } => run_directory(views::directory::staff(&ctx.views), command).await,
        Command::Suppliers { command } => run_directory(views::directory::suppliers(&ctx.views), command).await,
        Command::Venues { command } => run_directory(views::directory::venues(&ctx.views), command).await,
        Command::Payments { command } => run_payments(&ctx, command).await,
        Command::Activity(args) => run_list(views::activity::view(&ctx.views), args).await,
        Command::Sessions { command } => run_sessions(&ctx, command).await,
        Command::Upload { file, upload_type } => run_upload(&ctx, &file, &upload_type).await,
        Command::Image { path, output } => run_image(&ctx, &path, output).await,
        Command::Notifications { command } => run_notifications(&ctx, command).await,
    }
}

// =============================================================================
// LISTS
// =============================================================================

async fn run_list<T, S>(mut view: ListController<T, S>, args: ListArgs) -> Result<(), CliError>
where
    T: Record + Serialize,
    S: ListSource<T>,
{
    if let Some(size) = args.page_size {
        view.set_page_size(size).await?;
    }
    for (key, value) in list_filters(&args)? {
        view.stage_filter(&key, &value)?;
    }
    view.load().await?;
    if let Some(page) = args.page {
        view.set_page(page).await?;
    }
    print_page(&view)
}

fn list_filters(args: &ListArgs) -> Result<Vec<(String, String)>, CliError> {
    let mut filters = Vec::new();
    if let Some(search) = &args.search {
        filters.push(("search".to_owned(), search.clone()));
    }
    if let Some(status) = &args.status {
        filters.push(("status".to_owned(), status.clone()));
    }
    for raw in &args.filter {
        let (key, value) = raw.split_once('=').ok_or_else(|| CliError::InvalidFilter(raw.clone()))?;
        filters.push((key.trim().to_owned(), value.to_owned()));
    }
    Ok(filters)
}

fn print_page<T, S>(view: &ListController<T, S>) -> Result<(), CliError>
where
    T: Record + Serialize,
    S: ListSource<T>,
{
    let items = serde_json::to_value(view.page_items())?;
    print_json(&json!({
        "view": view.name(),
        "page": view.page(),
        "page_size": view.page_size(),
        "total_pages": view.total_pages(),
        "total": view.filtered_count(),
        "items": items,
    }))
}

fn print_done<T, S>(view: &ListController<T, S>) -> Result<(), CliError>
where
    T: Record,
    S: ListSource<T>,
{
    print_json(&json!({ "ok": true, "view": view.name(), "count": view.filtered_count() }))
}

// =============================================================================
// ENTITY COMMANDS
// =============================================================================

async fn run_bookings(ctx: &CliContext, command: BookingSubcommand) -> Result<(), CliError> {
    let mut view = views::bookings::view(&ctx.views);
    match command {
        BookingSubcommand::List(args) => run_list(view, args).await,
        BookingSubcommand::Search => run_booking_search(ctx, view).await,
        BookingSubcommand::SetStatus { id, status } => {
            let status = BookingStatus::parse(&status)?;
            view.set_status(id, status).await?;
            print_done(&view)
        }
        BookingSubcommand::Convert { id } => {
            view.convert_to_event(id).await?;
            print_done(&view)
        }
    }
}

/// Each stdin line replaces the search text; only settled values reach
/// the backend.
async fn run_booking_search(ctx: &CliContext, mut view: views::bookings::BookingsView) -> Result<(), CliError> {
    view.load().await?;
    print_page(&view)?;

    let (tx, rx) = watch::channel(String::new());
    let (_handle, mut settled) = debounce_search(rx, ctx.config.search_debounce(), view.cancel_token().clone());

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            tx.send_replace(line);
        }
    });

    while let Some(query) = settled.recv().await {
        if view.apply_filter("search", &query).await.is_ok() {
            print_page(&view)?;
        }
    }
    reader.abort();
    Ok(())
}

async fn run_directory<T>(mut view: ListController<T, DirectorySource<T>>, command: DirectorySubcommand) -> Result<(), CliError>
where
    T: Record + DeserializeOwned + Serialize,
{
    match command {
        DirectorySubcommand::List(args) => return run_list(view, args).await,
        DirectorySubcommand::Create { data } => view.create(parse_object(&data)?).await?,
        DirectorySubcommand::Update { id, data } => view.update(id, parse_object(&data)?).await?,
        DirectorySubcommand::Delete { id } => view.delete(id).await?,
        DirectorySubcommand::SetStatus { id, status } => {
            let status = OnboardingStatus::parse(&status)?;
            view.set_status(id, status).await?;
        }
    }
    print_done(&view)
}

async fn run_payments(ctx: &CliContext, command: PaymentSubcommand) -> Result<(), CliError> {
    let mut view = views::payments::view(&ctx.views);
    match command {
        PaymentSubcommand::List(args) => return run_list(view, args).await,
        PaymentSubcommand::Record { data } => {
            let draft = views::payments::draft_from_payload(&parse_object(&data)?)?;
            view.record_payment(&draft).await?;
        }
        PaymentSubcommand::SetStatus { payment_id, status } => {
            let status = PaymentStatus::parse(&status)?;
            view.set_payment_status(payment_id, status).await?;
        }
    }
    print_done(&view)
}

async fn run_sessions(ctx: &CliContext, command: SessionSubcommand) -> Result<(), CliError> {
    match command {
        SessionSubcommand::List(args) => run_list(views::sessions::view(&ctx.views), args).await,
        SessionSubcommand::Analytics => {
            let cancel = CancellationToken::new();
            let analytics = views::sessions::load_analytics(&ctx.views, &cancel).await?;
            print_json(&serde_json::to_value(analytics)?)
        }
        SessionSubcommand::Terminate { id } => {
            let mut view = views::sessions::view(&ctx.views);
            view.terminate(id).await?;
            print_done(&view)
        }
    }
}

// =============================================================================
// FILES
// =============================================================================

async fn run_upload(ctx: &CliContext, file: &Path, upload_type: &str) -> Result<(), CliError> {
    let file_name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned();
    let size = tokio::fs::metadata(file).await?.len();
    validation::validate_image_upload(&file_name, size, ctx.config.max_upload_bytes)?;

    let bytes = tokio::fs::read(file).await?;
    let api = AdminApi::new(ctx.client.clone());
    let path = api.upload(&file_name, bytes, upload_type, ctx.config.max_upload_bytes).await?;
    print_json(&json!({ "path": path, "url": images::image_url(&ctx.client, &path) }))
}

async fn run_image(ctx: &CliContext, path: &str, output: Option<PathBuf>) -> Result<(), CliError> {
    let Some(output) = output else {
        return print_json(&json!({ "url": images::image_url(&ctx.client, path) }));
    };
    let bytes = images::fetch_image(&ctx.client, path).await?;
    tokio::fs::write(&output, &bytes).await?;
    print_json(&json!({ "written": output.display().to_string(), "bytes": bytes.len() }))
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

async fn run_notifications(ctx: &CliContext, command: NotificationSubcommand) -> Result<(), CliError> {
    let NotificationSubcommand::Watch { user_id, since, once } = command;
    let api = NotificationsApi::new(ctx.client.clone());
    let mut feed = NotificationFeed::new(api, user_id);
    if let Some(since) = since {
        feed = feed.with_since(since);
    }

    if once {
        let outcome = feed.poll_once().await?;
        let items = serde_json::to_value(&outcome.items)?;
        let counts = serde_json::to_value(outcome.counts)?;
        return print_json(&json!({ "items": items, "counts": counts, "since": feed.since() }));
    }

    let cancel = CancellationToken::new();
    let (handle, mut events) = spawn_notification_poller(feed, ctx.config.poll_interval(), cancel.clone());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                let line = match event {
                    PollEvent::Items(items) => json!({ "items": serde_json::to_value(items)? }),
                    PollEvent::Counts(counts) => json!({ "counts": serde_json::to_value(counts)? }),
                };
                println!("{line}");
            }
        }
    }
    handle.await.ok();
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn parse_object(data: &str) -> Result<Map<String, Value>, CliError> {
    let value = serde_json::from_str::<Value>(data)?;
    Ok(validation::as_object(&value)?.clone())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
