mod common;

use checkout_flow::application::flow::{CheckoutFlow, FlowInput};
use checkout_flow::application::navigation::Navigation;
use checkout_flow::application::selection::SESSION_SNAPSHOT_KEY;
use checkout_flow::config::FlowConfig;
use checkout_flow::domain::context::DEFAULT_REDIRECT_URL;
use checkout_flow::domain::method::PaymentMethod;
use checkout_flow::domain::ports::SessionStore;
use checkout_flow::domain::query::QueryParams;
use checkout_flow::infrastructure::in_memory::InMemorySessionStore;
use common::RecordingNotifier;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn flow(notifier: &RecordingNotifier) -> CheckoutFlow {
    CheckoutFlow::new(
        FlowConfig::default(),
        Box::new(InMemorySessionStore::new()),
        Arc::new(notifier.clone()),
    )
}

fn input(method: PaymentMethod, otp: &str) -> FlowInput {
    FlowInput {
        method,
        otp: otp.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_bank_transfer_without_backend() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let entry = QueryParams::parse("amount=250&redirect_url=https://merchant.example/done");

    let start = Instant::now();
    let outcome = flow
        .run(entry, &input(PaymentMethod::BankTransfer, "123456"))
        .await
        .unwrap();

    // 2s verification latency, 5s of progress, 1s grace.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_millis(8_100));

    let hrefs: Vec<String> = outcome.navigations.iter().map(Navigation::href).collect();
    assert_eq!(
        hrefs,
        vec![
            "/payment/bank-verification?amount=250&redirect_url=https%3A%2F%2Fmerchant.example%2Fdone&method=bank-transfer",
            "/payment/processing?method=bank-transfer&amount=250&redirect_url=https%3A%2F%2Fmerchant.example%2Fdone",
            "https://merchant.example/done",
        ]
    );
    assert_eq!(
        outcome.redirect(),
        Some(&Navigation::External("https://merchant.example/done".to_string()))
    );
    assert_eq!(notifier.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_backend_flow_posts_once_then_redirects() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let entry = QueryParams::parse(
        "amount=250&redirect_url=https://merchant.example/done\
         &backend_url=https://api.example.com/&gateway_order_id=GW1&customer_order_id=CUST1",
    );

    let start = Instant::now();
    let outcome = flow
        .run(entry, &input(PaymentMethod::BankTransfer, "999999"))
        .await
        .unwrap();

    // Redirect follows the callback right after verification, not the progress bar.
    assert!(start.elapsed() < Duration::from_millis(2_100));
    assert_eq!(
        outcome.redirect().map(Navigation::href).as_deref(),
        Some("https://merchant.example/done")
    );

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://api.example.com/api/payelu/upi/callback");
    assert_eq!(calls[0].1.transaction_id, "GW1");
    assert_eq!(calls[0].1.reference, "CUST1");
}

#[tokio::test(start_paused = true)]
async fn test_entry_snapshot_is_written_but_not_forwarded() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let entry = QueryParams::parse("amount=10&method=digital-wallet&utm_source=mail");

    let outcome = flow
        .run(entry, &input(PaymentMethod::CreditCard, "111111"))
        .await
        .unwrap();

    let raw = flow
        .session_store()
        .get(SESSION_SNAPSHOT_KEY)
        .await
        .unwrap()
        .unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        snapshot,
        serde_json::json!({ "amount": "10", "method": "digital-wallet", "utm_source": "mail" })
    );

    // The selected method replaces the incoming one, and the processing
    // stage only receives the transaction parameters.
    let processing = outcome.navigations[1].href();
    assert!(processing.contains("method=credit-card"));
    assert!(!processing.contains("utm_source"));
    assert_eq!(outcome.redirect().unwrap().href(), DEFAULT_REDIRECT_URL);
}

#[tokio::test(start_paused = true)]
async fn test_any_six_digit_code_is_accepted() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let code = format!("{:06}", rng.gen_range(0..1_000_000));
        let outcome = flow
            .run(QueryParams::new(), &input(PaymentMethod::CreditCard, &code))
            .await
            .unwrap();
        assert!(outcome.redirect().is_some(), "code {code} was rejected");
    }
}

#[tokio::test(start_paused = true)]
async fn test_noisy_keystrokes_are_sanitised() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let outcome = flow
        .run(QueryParams::new(), &input(PaymentMethod::DigitalWallet, "12 34-56 78"))
        .await
        .unwrap();
    assert_eq!(outcome.navigations.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_short_code_never_reaches_processing() {
    let notifier = RecordingNotifier::ok();
    let flow = flow(&notifier);
    let result = flow
        .run(QueryParams::new(), &input(PaymentMethod::CreditCard, "12345"))
        .await;
    assert!(result.is_err());
    assert_eq!(notifier.call_count(), 0);
}
