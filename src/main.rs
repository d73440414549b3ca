use checkout_flow::application::flow::{CheckoutFlow, FlowInput};
use checkout_flow::config::{FlowConfig, FlowTimings, RedirectTrigger};
use checkout_flow::domain::callback::CallbackCredentials;
use checkout_flow::domain::context::DEFAULT_REDIRECT_URL;
use checkout_flow::domain::method::PaymentMethod;
use checkout_flow::domain::ports::{CallbackNotifierRef, SessionStoreBox};
use checkout_flow::domain::query::QueryParams;
use checkout_flow::infrastructure::http::{HttpCallbackNotifier, HttpOptions};
use checkout_flow::infrastructure::in_memory::InMemorySessionStore;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Entry URL of the selection stage, or a bare query string
    entry: String,

    /// Payment method picked on the selection stage
    #[arg(long, default_value = "credit-card")]
    method: PaymentMethod,

    /// Keystrokes typed into the verification code field
    #[arg(long, default_value = "000000")]
    otp: String,

    /// What the processing stage waits for before redirecting
    #[arg(long, value_enum, default_value_t = RedirectTrigger::Auto)]
    redirect_trigger: RedirectTrigger,

    /// Redirect target used when the entry carries no redirect_url
    #[arg(long, default_value = DEFAULT_REDIRECT_URL)]
    fallback_redirect_url: String,

    /// API key sent in the payment callback
    #[arg(long, env = "CHECKOUT_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Security hash sent in the payment callback
    #[arg(long, env = "CHECKOUT_SECURITY_HASH", default_value = "", hide_env_values = true)]
    security_hash: String,

    /// Divides every timer period, to run the flow faster than real time
    #[arg(long, default_value_t = 1)]
    speed: u32,

    /// Total timeout for the callback request, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    callback_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = FlowConfig {
        fallback_redirect_url: cli.fallback_redirect_url,
        credentials: CallbackCredentials::new(cli.api_key, cli.security_hash),
        redirect_trigger: cli.redirect_trigger,
        timings: FlowTimings::default().scaled(cli.speed),
    };

    let notifier: CallbackNotifierRef = Arc::new(
        HttpCallbackNotifier::new(HttpOptions {
            total_timeout: Duration::from_millis(cli.callback_timeout_ms),
            ..HttpOptions::default()
        })
        .into_diagnostic()?,
    );
    let session_store: SessionStoreBox = Box::new(InMemorySessionStore::new());

    let entry = QueryParams::from_entry(&cli.entry).into_diagnostic()?;
    let input = FlowInput {
        method: cli.method,
        otp: cli.otp,
    };

    let flow = CheckoutFlow::new(config, session_store, notifier);
    let outcome = flow.run(entry, &input).await.into_diagnostic()?;

    for navigation in &outcome.navigations {
        println!("{navigation}");
    }

    Ok(())
}
