//! Lockstep Transfer - demo runner
//!
//! Seeds two accounts and fires concurrent transfers at them in both
//! directions, then reports the final balances.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────┐    ┌──────────┐
//! │  Config  │───▶│ Accounts │───▶│ Coordinator │───▶│  Report  │
//! │  (YAML)  │    │ (A, B)   │    │ (N tasks)   │    │ (stdout) │
//! └──────────┘    └──────────┘    └─────────────┘    └──────────┘
//! ```
//!
//! Usage: `lockstep_transfer [--env dev] [--transfers 16] [--amount 100.00]`

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::future::join_all;
use rust_decimal::Decimal;

use lockstep_transfer::config::AppConfig;
use lockstep_transfer::money::{DEFAULT_SCALE, format_amount, parse_amount};
use lockstep_transfer::{
    AccountId, AccountsService, InMemoryAccountRepository, LoggingNotifier, TransferCoordinator,
};

// ============================================================
// ARGUMENTS
// ============================================================

fn get_arg(long: &str, short: Option<&str>) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == long || Some(args[i].as_str()) == short) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn get_env() -> String {
    get_arg("--env", Some("-e")).unwrap_or_else(|| "dev".to_string())
}

fn parse_transfer_count(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => anyhow::bail!("--transfers must be a positive integer, got {}", raw),
    }
}

fn get_transfer_count() -> Result<usize> {
    match get_arg("--transfers", Some("-n")) {
        Some(n) => parse_transfer_count(&n),
        None => Ok(16),
    }
}

fn get_amount() -> Result<Decimal> {
    let raw = get_arg("--amount", None).unwrap_or_else(|| "100.00".to_string());
    parse_amount(&raw, DEFAULT_SCALE).with_context(|| format!("invalid --amount {}", raw))
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = lockstep_transfer::logging::init_logging(&app_config);

    let transfers = get_transfer_count()?;
    let amount = get_amount()?;
    let policy = app_config.transfer.lock_policy();

    tracing::info!(
        env = %env,
        transfers,
        amount = %amount,
        max_attempts = policy.max_attempts,
        "Starting transfer demo"
    );

    let service = Arc::new(AccountsService::new(
        Arc::new(InMemoryAccountRepository::new()),
        TransferCoordinator::new(policy),
        Arc::new(LoggingNotifier),
    ));

    let a = AccountId::new("A")?;
    let b = AccountId::new("B")?;
    service.create_account(a.as_str(), parse_amount("1000.00", DEFAULT_SCALE)?)?;
    service.create_account(b.as_str(), parse_amount("500.00", DEFAULT_SCALE)?)?;
    let total_before = service.balance_of(&a).await? + service.balance_of(&b).await?;

    let start = Instant::now();
    let tasks = (0..transfers).map(|i| {
        let service = service.clone();
        // Alternate direction so both lock orders are exercised
        let (from, to) = if i % 2 == 0 {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        tokio::spawn(async move { service.transfer_amount(&from, &to, amount).await })
    });

    let mut ok = 0usize;
    let mut failed = 0usize;
    for joined in join_all(tasks).await {
        match joined.context("transfer task panicked")? {
            Ok(_) => ok += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(code = e.code(), error = %e, "Transfer failed");
            }
        }
    }
    let elapsed = start.elapsed();

    let balance_a = service.balance_of(&a).await?;
    let balance_b = service.balance_of(&b).await?;
    let total_after = balance_a + balance_b;

    println!("\n=== Transfer Demo ({}) ===", env);
    println!("Transfers:    {} ok, {} failed", ok, failed);
    println!("Elapsed:      {:?}", elapsed);
    println!("Account {}:    {}", a, format_amount(balance_a, DEFAULT_SCALE));
    println!("Account {}:    {}", b, format_amount(balance_b, DEFAULT_SCALE));
    println!(
        "Total:        {} (before {})",
        format_amount(total_after, DEFAULT_SCALE),
        format_amount(total_before, DEFAULT_SCALE)
    );

    if total_after != total_before {
        anyhow::bail!(
            "balance conservation violated: {} != {}",
            total_after,
            total_before
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_count() {
        assert_eq!(parse_transfer_count("16").unwrap(), 16);
        assert_eq!(parse_transfer_count("1").unwrap(), 1);
        assert!(parse_transfer_count("0").is_err());
        assert!(parse_transfer_count("-3").is_err());
        assert!(parse_transfer_count("many").is_err());
    }
}
