use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("https://pay.example/payment?amount=250&redirect_url=https%3A%2F%2Fmerchant.example%2Fdone")
        .args(["--method", "bank-transfer", "--otp", "123456", "--speed", "100"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "navigate /payment/bank-verification?amount=250",
        ))
        .stdout(predicate::str::contains(
            "navigate /payment/processing?method=bank-transfer&amount=250",
        ))
        .stdout(predicate::str::ends_with("redirect https://merchant.example/done\n"));

    Ok(())
}

#[test]
fn test_cli_accepts_route_entry() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.arg("/payment?amount=250&redirect_url=https://merchant.example/done")
        .args(["--speed", "100"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "navigate /payment/processing?method=credit-card&amount=250",
        ))
        .stdout(predicate::str::ends_with("redirect https://merchant.example/done\n"));
}

#[test]
fn test_cli_unreachable_backend_logs_and_redirects() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.arg(format!(
        "backend_url=http://{addr}/&gateway_order_id=GW1&customer_order_id=CUST1&redirect_url=https://merchant.example/done"
    ))
    .args(["--speed", "100"])
    .env("CHECKOUT_API_KEY", "k")
    .env("CHECKOUT_SECURITY_HASH", "h")
    .env_remove("RUST_LOG");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("payment callback failed"))
        .stdout(predicate::str::contains("redirect https://merchant.example/done"));
}

#[test]
fn test_cli_short_code_fails() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.arg("amount=1").args(["--otp", "12a45", "--speed", "100"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("verification code must have 6 digits"));
}

#[test]
fn test_cli_rejects_unknown_method() {
    let mut cmd = Command::new(cargo_bin!("checkout-flow"));
    cmd.arg("amount=1").args(["--method", "cash"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown payment method: cash"));
}
