// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use tether2inr_client::admin_view::{
    deposit_columns, to_csv, withdrawal_columns, AdminQuery, StatusFilter,
};
use tether2inr_client::api::{admin, auth, bank_accounts, dashboard, deposits, withdrawals};
use tether2inr_client::config::{ClientConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV};
use tether2inr_client::market_poller::{MarketPoller, MarketSnapshot};
use tether2inr_client::models::{
    CreateBankAccountRequest, CreateDepositRequest, CreateWithdrawalRequest, Deposit,
    DepositNetwork, LoginRequest, RegisterRequest, ReviewDecision, VerifyOtpRequest, Withdrawal,
};
use tether2inr_client::providers::coingecko::{CoinGeckoClient, PairPrice};
use tether2inr_client::session::{require_admin, require_session, GuardError, Session};
use tether2inr_client::state::AppState;

// =============================================================================
// CLI definition
// =============================================================================

#[derive(Parser)]
#[command(name = "tether2inr", about = "Tether2INR exchange client", version)]
struct Cli {
    /// Backend base URL (default: $TETHER2INR_API_BASE_URL or http://localhost:5000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session (default: $TETHER2INR_SESSION_DIR)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session
    Login {
        email: String,
        #[arg(long, env = "TETHER2INR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account; a one-time code is emailed
    Register {
        email: String,
        #[arg(long, env = "TETHER2INR_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value = "")]
        referral_code: String,
    },
    /// Activate an account with the emailed code
    VerifyOtp { email: String, otp: String },
    /// Email a fresh one-time code
    ResendOtp { email: String },
    /// Forget the saved session
    Logout,
    /// Show the saved session
    Whoami,
    /// Pull the latest profile (balance, referral code) into the session
    Refresh,
    /// Show where to send USDT before reporting a deposit
    DepositAddress {
        #[arg(long, value_parser = parse_network, default_value = "TRC20")]
        network: DepositNetwork,
    },
    /// Report a USDT deposit for review
    Deposit {
        amount: String,
        #[arg(long, value_parser = parse_network, default_value = "TRC20")]
        network: DepositNetwork,
        #[arg(long)]
        tx_hash: String,
    },
    /// Request an INR payout
    Withdraw {
        amount: String,
        #[arg(long)]
        bank_account: String,
    },
    /// Manage saved bank accounts
    BankAccounts {
        #[command(subcommand)]
        command: BankAccountCommands,
    },
    /// Deposit and withdrawal history
    History,
    /// Review deposits and withdrawals (admin only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Live prices for the tracked pairs
    Prices {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
        #[arg(long, default_value = "10")]
        interval_secs: u64,
    },
}

#[derive(Subcommand)]
enum BankAccountCommands {
    List,
    Add {
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        ifsc: String,
        #[arg(long)]
        holder_name: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List all deposits
    Deposits(ListArgs),
    /// List all withdrawals
    Withdrawals(ListArgs),
    /// Approve a pending transfer
    Approve { kind: TransferKind, id: String },
    /// Reject a pending transfer
    Reject { kind: TransferKind, id: String },
}

#[derive(clap::Args)]
struct ListArgs {
    /// Case-insensitive match on email, tx hash or bank details
    #[arg(long)]
    search: Option<String>,
    /// all, pending, approved or rejected
    #[arg(long, value_parser = parse_status, default_value = "all")]
    status: StatusFilter,
    /// Write the filtered rows to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TransferKind {
    Deposit,
    Withdrawal,
}

fn parse_network(s: &str) -> Result<DepositNetwork, String> {
    DepositNetwork::parse(s).ok_or_else(|| format!("unknown network `{s}` (TRC20 or BEP20)"))
}

fn parse_status(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(s).ok_or_else(|| format!("unknown status `{s}`"))
}

// =============================================================================
// Entry point
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_base_url(url).context("invalid --api-url")?;
    }
    if let Some(dir) = cli.session_dir {
        config = config.with_session_dir(dir);
    }

    let state = AppState::from_config(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let session = state.sign_in(&LoginRequest { email, password }).await?;
            println!("Logged in as {} ({})", session.email, session.role);
            Ok(())
        }

        Commands::Register {
            email,
            password,
            confirm_password,
            referral_code,
        } => {
            let request = RegisterRequest {
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                referral_code,
            };
            let ack = auth::register(&state.gateway, &request).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Check your email for the OTP."));
            Ok(())
        }

        Commands::VerifyOtp { email, otp } => {
            let ack = auth::verify_otp(&state.gateway, &VerifyOtpRequest { email, otp }).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Account verified. You can log in now."));
            Ok(())
        }

        Commands::ResendOtp { email } => {
            let ack = auth::resend_otp(&state.gateway, &email).await?;
            println!("{}", ack.message.as_deref().unwrap_or("OTP sent."));
            Ok(())
        }

        Commands::Logout => {
            state.sign_out();
            println!("Logged out");
            Ok(())
        }

        Commands::Whoami => {
            match state.session.current() {
                Some(session) => print_session(&session),
                None => println!("Not logged in"),
            }
            Ok(())
        }

        Commands::Refresh => {
            guarded(require_session(&state.session))?;
            match state.session.refresh(&state.gateway).await {
                Ok(Some(session)) => print_session(&session),
                Ok(None) => {}
                Err(e) if e.is_unauthorized() => {
                    bail!("{e} (session may have expired; run `tether2inr login`)")
                }
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }

        Commands::DepositAddress { network } => {
            println!("Send USDT ({network}) to {}", network.deposit_address());
            Ok(())
        }

        Commands::Deposit {
            amount,
            network,
            tx_hash,
        } => {
            guarded(require_session(&state.session))?;
            let request = CreateDepositRequest {
                amount,
                network,
                tx_hash,
            };
            let ack = deposits::create(&state.gateway, &request).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Deposit submitted for review."));
            println!("Network {network}, receiving address {}", network.deposit_address());
            Ok(())
        }

        Commands::Withdraw {
            amount,
            bank_account,
        } => {
            guarded(require_session(&state.session))?;
            let request = CreateWithdrawalRequest {
                amount,
                bank_account_id: bank_account,
            };
            let ack = withdrawals::create(&state.gateway, &request).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Withdrawal submitted for review."));
            Ok(())
        }

        Commands::BankAccounts { command } => {
            guarded(require_session(&state.session))?;
            cmd_bank_accounts(&state, command).await
        }

        Commands::History => {
            guarded(require_session(&state.session))?;
            let history = dashboard::load_history(&state.gateway).await?;
            let summary = history.summary();
            println!(
                "Total deposits:    {} USDT ({} pending)",
                summary.total_deposits, summary.pending_deposits
            );
            println!(
                "Total withdrawals: {} USDT ({} pending)",
                summary.total_withdrawals, summary.pending_withdrawals
            );
            println!();
            println!("Deposits");
            print_deposits(&history.deposits);
            println!();
            println!("Withdrawals");
            print_withdrawals(&history.withdrawals);
            Ok(())
        }

        Commands::Admin { command } => {
            guarded(require_admin(&state.session, &state.config.admin_emails))?;
            cmd_admin(&state, command).await
        }

        Commands::Prices {
            watch,
            interval_secs,
        } => cmd_prices(&state.config.market_api_base_url, watch, interval_secs).await,
    }
}

/// Turn a guard denial into a command-line error with a next step.
fn guarded(result: Result<Session, GuardError>) -> Result<Session> {
    result.map_err(|e| {
        tracing::debug!(code = e.error_code(), redirect = e.redirect_to(), "Access denied");
        anyhow!("{e} ({})", e.hint())
    })
}

/// `LOG_FORMAT=json` for machine-readable logs; human-readable otherwise.
/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// =============================================================================
// Command implementations
// =============================================================================

async fn cmd_bank_accounts(state: &AppState, command: BankAccountCommands) -> Result<()> {
    match command {
        BankAccountCommands::List => {
            let accounts = bank_accounts::list(&state.gateway).await?;
            if accounts.is_empty() {
                println!("No saved bank accounts");
            }
            for account in accounts {
                println!(
                    "{}  {}  {}  {}",
                    account.id, account.holder_name, account.account_number, account.ifsc
                );
            }
        }
        BankAccountCommands::Add {
            account_number,
            ifsc,
            holder_name,
        } => {
            let request = CreateBankAccountRequest {
                account_number,
                ifsc,
                holder_name,
            };
            let ack = bank_accounts::create(&state.gateway, &request).await?;
            println!("{}", ack.message.as_deref().unwrap_or("Bank account added."));
        }
    }
    Ok(())
}

async fn cmd_admin(state: &AppState, command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Deposits(args) => {
            let rows = query_for(&args).apply(admin::list_deposits(&state.gateway).await?);
            match &args.csv {
                Some(path) => write_csv(path, &to_csv(&rows, &deposit_columns()), rows.len())?,
                None => print_deposits(&rows),
            }
        }
        AdminCommands::Withdrawals(args) => {
            let rows = query_for(&args).apply(admin::list_withdrawals(&state.gateway).await?);
            match &args.csv {
                Some(path) => write_csv(path, &to_csv(&rows, &withdrawal_columns()), rows.len())?,
                None => print_withdrawals(&rows),
            }
        }
        AdminCommands::Approve { kind, id } => {
            review(state, kind, &id, ReviewDecision::Approved).await?;
        }
        AdminCommands::Reject { kind, id } => {
            review(state, kind, &id, ReviewDecision::Rejected).await?;
        }
    }
    Ok(())
}

async fn review(
    state: &AppState,
    kind: TransferKind,
    id: &str,
    decision: ReviewDecision,
) -> Result<()> {
    let status = tether2inr_client::models::TransferStatus::from(decision);
    match kind {
        TransferKind::Deposit => {
            let rows = admin::review_deposit(&state.gateway, id, decision).await?;
            println!("Deposit {status}");
            print_deposits(&rows);
        }
        TransferKind::Withdrawal => {
            let rows = admin::review_withdrawal(&state.gateway, id, decision).await?;
            println!("Withdrawal {status}");
            print_withdrawals(&rows);
        }
    }
    Ok(())
}

async fn cmd_prices(base_url: &str, watch: bool, interval_secs: u64) -> Result<()> {
    let client = CoinGeckoClient::new(base_url)?;

    if !watch {
        let prices = client.fetch_tracked().await?;
        print_prices(&prices);
        return Ok(());
    }

    if interval_secs == 0 {
        bail!("--interval-secs must be at least 1");
    }

    let (poller, mut rx) = MarketPoller::new(client);
    let poller = poller.with_interval(Duration::from_secs(interval_secs));
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(poller.run(shutdown.clone()));

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    shutdown.cancel();
    task.await.context("price poller task failed")?;
    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn query_for(args: &ListArgs) -> AdminQuery {
    AdminQuery {
        search: args.search.clone(),
        status: args.status,
    }
}

fn write_csv(path: &Path, csv: &str, rows: usize) -> Result<()> {
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {rows} rows to {}", path.display());
    Ok(())
}

fn print_session(session: &Session) {
    println!("email:         {}", session.email);
    println!("role:          {}", session.role);
    println!("usdt balance:  {}", session.usdt_balance);
    if let Some(code) = &session.referral_code {
        println!("referral code: {code}");
    }
}

fn owner(user: Option<&tether2inr_client::models::UserRef>) -> &str {
    user.and_then(|u| u.email.as_deref()).unwrap_or("-")
}

fn print_deposits(rows: &[Deposit]) {
    if rows.is_empty() {
        println!("  (none)");
    }
    for d in rows {
        println!(
            "  {}  {}  {} USDT  {}  {}  {}  {}",
            d.id,
            d.created_at.format("%Y-%m-%d %H:%M"),
            d.amount,
            d.network,
            d.status,
            owner(d.user.as_ref()),
            d.tx_hash.as_deref().unwrap_or("-")
        );
    }
}

fn print_withdrawals(rows: &[Withdrawal]) {
    if rows.is_empty() {
        println!("  (none)");
    }
    for w in rows {
        let bank = w
            .bank_details
            .as_ref()
            .map(|b| b.search_text())
            .unwrap_or_default();
        println!(
            "  {}  {}  {} USDT  {}  {}  {}",
            w.id,
            w.created_at.format("%Y-%m-%d %H:%M"),
            w.amount,
            w.status,
            owner(w.user.as_ref()),
            bank
        );
    }
}

fn print_prices(prices: &[PairPrice]) {
    for p in prices {
        println!("{:<11} {:<10} {:>20}", p.pair.symbol, p.pair.name, p.display_price());
    }
}

fn print_snapshot(snapshot: &MarketSnapshot) {
    if let Some(error) = &snapshot.error {
        eprintln!("{error}");
    }
    if let Some(at) = snapshot.updated_at {
        println!("-- {} --", at.format("%H:%M:%S UTC"));
    }
    print_prices(&snapshot.prices);
}
