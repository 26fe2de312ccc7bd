use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use gatehouse::forms::{FormError, LoginForm, SignupForm};
use gatehouse::config::Timeouts;
use gatehouse::{Config, FileStorage, HttpAuthApi, Notice, Session, SessionStore};
use logbuf::panel::{LevelFilter as PanelFilter, PanelView, badge};
use logbuf::{CaptureLayer, LogBuffer};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] gatehouse::config::ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] gatehouse::ApiError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "gatehouse", about = "Sign in, sign up and inspect the persisted session")]
struct Cli {
    /// API base URL; overrides `BACKEND_URL` from the environment or `.env`.
    #[arg(long, env = "BACKEND_URL")]
    base_url: Option<String>,

    /// Persisted session record.
    #[arg(long, env = "AUTH_STORAGE_PATH")]
    storage: Option<PathBuf>,

    /// Print debug logs to stderr as they happen.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    /// Print the captured log panel after the command finishes.
    #[arg(long, default_value_t = false)]
    show_logs: bool,

    /// Panel filter: all, log, info, warn, error or debug.
    #[arg(long, default_value = "all")]
    log_level: PanelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Signup(SignupArgs),
    /// Sign in with an existing account.
    Login(LoginArgs),
    /// Sign out locally and tell the server.
    Logout,
    /// Refresh the stored user from the server and print it.
    Profile,
    /// Print the persisted session without contacting the server.
    Status,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    password: String,
    /// Defaults to `--password`.
    #[arg(long, hide_env_values = true)]
    confirm_password: Option<String>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let logs = LogBuffer::default();
    init_tracing(cli.verbose, logs.clone());

    let show_logs = cli.show_logs;
    let log_level = cli.log_level;
    let outcome = run(cli).await;

    if show_logs {
        let view = PanelView::build(&logs.entries(), log_level);
        eprintln!("\n{}\n{}", badge(logs.len()), view.render());
    }

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, logs: LogBuffer) {
    let console = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(console))
        .with(CaptureLayer::new(logs).with_filter(LevelFilter::DEBUG))
        .init();
}

/// Clap already resolved `BACKEND_URL` and `AUTH_STORAGE_PATH` into the
/// flags; only the timeouts come from the environment here.
fn config_for(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config { timeouts: Timeouts::from_env(), ..Config::default() };
    if let Some(url) = &cli.base_url {
        config.base_url = gatehouse::config::normalize_base_url(url)?;
    }
    if let Some(path) = &cli.storage {
        config.storage_path.clone_from(path);
    }
    Ok(config)
}

/// Runs the command; `Ok(false)` means the operation itself reported failure.
async fn run(cli: Cli) -> Result<bool, CliError> {
    let config = config_for(&cli)?;
    tracing::debug!(base_url = %config.base_url, storage = %config.storage_path.display(), "starting");

    let api = HttpAuthApi::from_config(&config)?;
    let storage = FileStorage::new(&config.storage_path);
    let (tx, mut notices) = mpsc::unbounded_channel::<Notice>();
    let store = SessionStore::rehydrate(Arc::new(api), Arc::new(storage), Arc::new(tx));

    let ok = match cli.command {
        Command::Signup(args) => run_signup(&store, args).await?,
        Command::Login(args) => run_login(&store, args).await?,
        Command::Logout => {
            store.logout().await;
            true
        }
        Command::Profile => run_profile(&store).await?,
        Command::Status => {
            print_json(&session_json(&store.snapshot().await))?;
            true
        }
    };

    drop(store);
    while let Some(notice) = notices.recv().await {
        print_notice(&notice);
    }
    Ok(ok)
}

async fn run_signup(store: &SessionStore, args: SignupArgs) -> Result<bool, CliError> {
    let form = SignupForm {
        confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
        name: args.name,
        email: args.email,
        password: args.password,
    };
    form.validate()?;
    Ok(store.signup(form.email.trim(), &form.password, form.name.trim()).await)
}

async fn run_login(store: &SessionStore, args: LoginArgs) -> Result<bool, CliError> {
    let form = LoginForm { email: args.email, password: args.password };
    form.validate()?;
    Ok(store.login(form.email.trim(), &form.password).await)
}

async fn run_profile(store: &SessionStore) -> Result<bool, CliError> {
    if !store.is_authenticated().await {
        eprintln!("not logged in");
        return Ok(false);
    }
    store.get_profile().await;
    let session = store.snapshot().await;
    print_json(&session_json(&session))?;
    Ok(session.is_authenticated())
}

fn session_json(session: &Session) -> Value {
    json!({
        "authenticated": session.is_authenticated(),
        "user": session.user,
        "error": session.error,
    })
}

fn print_notice(notice: &Notice) {
    let mark = if notice.is_error() { "✗" } else { "✓" };
    eprintln!("{mark} {}", notice.message());
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
