use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use editsync::auth::{DEFAULT_LOGIN_EMAIL, DEFAULT_LOGIN_NAME, DEFAULT_LOGIN_PASSWORD, SessionSigner, StaticCredentials};
use editsync::banner::{BannerInfo, print_banner};
use editsync::cms::contentstack::{ContentstackClient, Region, StackConfig};
use editsync::completion::Completer;
use editsync::completion::anthropic::AnthropicCompleter;
use editsync::completion::openai::OpenAiCompleter;
use editsync::config::Settings;
use editsync::consts::{DEFAULT_HOST, DEFAULT_PORT, default_db_path};
use editsync::dispatcher::Dispatcher;
use editsync::history::sqlite::SqliteHistory;
use editsync::prompts::PromptTable;
use editsync::server::{self, AppState};

#[derive(Debug, Clone, ValueEnum)]
enum Provider {
    Openai,
    Anthropic,
}

impl Provider {
    fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Openai => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Parser)]
#[command(name = "editsync", version, about = "Find. Replace. Sync.")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "EDITSYNC_HOST", default_value = DEFAULT_HOST)]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "EDITSYNC_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Completion provider
    #[arg(long, value_enum, env = "EDITSYNC_PROVIDER", default_value_t = Provider::Openai)]
    provider: Provider,

    /// Model name (provider-specific)
    #[arg(short, long, env = "EDITSYNC_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,

    /// SQLite database for settings and history (use :memory: for ephemeral)
    #[arg(short, long, env = "EDITSYNC_DB")]
    db: Option<String>,

    /// JSON file overriding operation prompt templates
    #[arg(long, env = "EDITSYNC_PROMPTS")]
    prompts: Option<PathBuf>,

    /// Secret used to sign session tokens (generated and stored if unset)
    #[arg(long, env = "EDITSYNC_SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    /// Mark session cookies Secure (HTTPS only)
    #[arg(long, env = "EDITSYNC_SECURE_COOKIES", default_value_t = false)]
    secure_cookies: bool,

    /// Login email accepted by the credential gate
    #[arg(long, env = "EDITSYNC_LOGIN_EMAIL", default_value = DEFAULT_LOGIN_EMAIL)]
    login_email: String,

    /// Login password accepted by the credential gate
    #[arg(long, env = "EDITSYNC_LOGIN_PASSWORD", default_value = DEFAULT_LOGIN_PASSWORD, hide_env_values = true)]
    login_password: String,

    /// Display name handed out to the signed-in user
    #[arg(long, env = "EDITSYNC_LOGIN_NAME", default_value = DEFAULT_LOGIN_NAME)]
    login_name: String,

    /// Contentstack stack API key (content endpoints are disabled without it)
    #[arg(long, env = "CONTENTSTACK_API_KEY")]
    contentstack_api_key: Option<String>,

    /// Contentstack delivery token
    #[arg(long, env = "CONTENTSTACK_DELIVERY_TOKEN", hide_env_values = true)]
    contentstack_delivery_token: Option<String>,

    /// Contentstack publishing environment
    #[arg(long, env = "CONTENTSTACK_ENVIRONMENT", default_value = "production")]
    contentstack_environment: String,

    /// Contentstack region: us, eu, azure-na, azure-eu or gcp-na
    #[arg(long, env = "CONTENTSTACK_REGION", default_value = "us")]
    contentstack_region: Region,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("editsync=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            let path = default_db_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            path.to_string_lossy().into_owned()
        }
    };

    let settings = Settings::open(&db_path)?;
    let secret = settings.session_secret(cli.session_secret.as_deref())?;

    let prompts = match &cli.prompts {
        Some(path) => PromptTable::load(path)?,
        None => PromptTable::default(),
    };

    // Wire up the completer based on provider + model
    let completer: Arc<dyn Completer> = match cli.provider {
        Provider::Openai => {
            let mut completer = OpenAiCompleter::new(cli.model.clone());
            if let Some(base) = &cli.openai_base_url {
                completer = completer.with_base_url(base);
            }
            Arc::new(completer)
        }
        Provider::Anthropic => Arc::new(AnthropicCompleter::new(cli.model.clone())),
    };
    let api_key_status = if std::env::var(cli.provider.api_key_env())
        .map(|k| !k.is_empty())
        .unwrap_or(false)
    {
        "env ✓".to_string()
    } else {
        format!("missing ({} not set)", cli.provider.api_key_env())
    };

    let content = match (&cli.contentstack_api_key, &cli.contentstack_delivery_token) {
        (Some(api_key), Some(delivery_token)) => Some(ContentstackClient::new(StackConfig {
            api_key: api_key.clone(),
            delivery_token: delivery_token.clone(),
            environment: cli.contentstack_environment.clone(),
            region: cli.contentstack_region,
        })),
        _ => None,
    };
    let content_label = match &content {
        Some(_) => format!(
            "contentstack ({}, {})",
            cli.contentstack_region.delivery_host(),
            cli.contentstack_environment
        ),
        None => "disabled".to_string(),
    };

    let history = Arc::new(SqliteHistory::new(&db_path)?);
    let history_label: &str = if db_path == ":memory:" {
        "ephemeral"
    } else {
        &db_path
    };

    let addr = SocketAddr::new(cli.host, cli.port);
    print_banner(&BannerInfo {
        addr,
        provider: completer.provider(),
        model: completer.model(),
        api_key: &api_key_status,
        login: &cli.login_email,
        content: &content_label,
        history: history_label,
    });

    let dispatcher = Dispatcher::new(prompts, completer);
    let verifier = Arc::new(
        StaticCredentials::new(cli.login_email, cli.login_password).with_name(cli.login_name),
    );
    let mut state = AppState::new(dispatcher, verifier, SessionSigner::new(secret))
        .with_history(history)
        .with_secure_cookies(cli.secure_cookies);
    if let Some(content) = content {
        state = state.with_content(Arc::new(content));
    }

    server::serve(addr, state).await
}
