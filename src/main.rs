//! tesapay-quote - price a transfer against the live fee tables
//!
//! ```text
//! tesapay-quote --env dev --channel momo --amount 500
//! tesapay-quote --env dev --channel crypto --amount 100 --crypto USDT --network TRC20
//! ```
//!
//! Fetches both fee endpoints, prices the amount the same way the transfer
//! composer does, and prints the breakdown. No balance check is made.

use anyhow::{Context, Result, bail};
use tracing::info;

use tesapay_transfers::api::{ApiClient, Session};
use tesapay_transfers::config::AppConfig;
use tesapay_transfers::logging::init_logging;
use tesapay_transfers::money::{format_amount, parse_amount};
use tesapay_transfers::transfer::{ComposeContext, TransferType};
use tesapay_transfers::wallet::WalletBook;

const USAGE: &str = "usage: tesapay-quote [--env dev] --channel momo|crypto --amount <amount> \
                     [--crypto <type> --network <network>] [--token <bearer>]";

/// Value following `--name` (or its short alias), if present
fn get_arg(args: &[String], long: &str, short: Option<&str>) -> Option<String> {
    args.iter()
        .position(|a| a == long || short.is_some_and(|s| a == s))
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let env = get_arg(&args, "--env", Some("-e")).unwrap_or_else(|| "dev".to_string());
    let config = AppConfig::load(&env).with_context(|| format!("loading config for '{}'", env))?;
    let _guard = init_logging(&config.log)?;

    info!(env = %env, git_hash = env!("GIT_HASH"), "tesapay-quote starting");

    let channel: TransferType = get_arg(&args, "--channel", Some("-c"))
        .context(USAGE)?
        .parse()
        .map_err(anyhow::Error::msg)?;
    if !channel.charges_fees() {
        bail!("{} transfers carry no fees", channel);
    }
    let amount_input = get_arg(&args, "--amount", Some("-a")).context(USAGE)?;
    let amount = parse_amount(&amount_input, config.transfer.currency_decimals)
        .with_context(|| format!("invalid amount '{}'", amount_input))?;

    let mut session = Session::new(0);
    if let Some(token) = get_arg(&args, "--token", None) {
        session = session.with_token(token);
    }
    let client = ApiClient::new(&config.api, session)?;
    let fees = client
        .fee_tables()
        .await
        .context("fetching fee tables")?;

    let wallets = WalletBook::default();
    let ctx = ComposeContext::new(&wallets, &fees, &config.transfer);
    let quote = if channel == TransferType::Crypto {
        let crypto = get_arg(&args, "--crypto", None).context("--crypto is required")?;
        let network = get_arg(&args, "--network", None).context("--network is required")?;
        ctx.quote_crypto(amount, &crypto, &network)?
    } else {
        ctx.quote_momo(amount)?
    };

    let dp = config.transfer.currency_decimals;
    println!("Channel:        {}", channel);
    println!("Send amount:    {}", format_amount(quote.send_amount, dp));
    println!("Platform fee:   {}", format_amount(quote.platform_fee, dp));
    println!("Blockchain fee: {}", format_amount(quote.blockchain_fee, dp));
    println!("Total debit:    {}", format_amount(quote.total_debit, dp));

    Ok(())
}
