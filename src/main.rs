//! Dark Exchange - Binary Entry Point
//!
//! Runs a full-take scenario against an in-memory gateway and prints the
//! resulting balances and state commitment.
//!
//! Configuration comes from the TOML file named by `DEX_CONFIG`, or from the
//! `DEX_*` environment variables. Set `RUST_LOG=debug` to see ledger moves.

use dark_exchange::{
    Address, AssetId, Exchange, ExchangeConfig, InMemoryGateway, OrderHash, PlaceOrder, Result,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = if let Ok(path) = std::env::var("DEX_CONFIG") {
        info!("Loading config from: {}", path);
        ExchangeConfig::from_file(&path)?
    } else {
        info!("Loading config from environment variables");
        ExchangeConfig::from_env()?
    };

    let (maker_rate, taker_rate) = config.display_rates();
    info!(
        "Fee account: {}, maker fee: {}, taker fee: {}",
        config.fee_account, maker_rate, taker_rate
    );

    let token = AssetId::token(Address::repeat_byte(0x70));
    let maker = Address::repeat_byte(0xA1);
    let taker = Address::repeat_byte(0xB0);

    let mut gateway = InMemoryGateway::new(Address::repeat_byte(0xEE));
    gateway.mint(AssetId::NATIVE, maker, 1_000_000);
    gateway.mint(token, taker, 1_000_000);

    let mut exchange = Exchange::from_config(&config, gateway)?;

    exchange.deposit(maker, AssetId::NATIVE, 1_000_000, maker, Address::ZERO, 1_000_000)?;
    exchange.deposit(taker, token, 1_000_000, taker, maker, 0)?;

    let hash = OrderHash::from_bytes([0x63; 32]);
    exchange.place_order(
        maker,
        0,
        PlaceOrder {
            sell_amount: 10_000,
            buy_amount: 20_000,
            expiration: 1_000,
            sell_token: AssetId::NATIVE,
            buy_token: token,
            hash,
        },
    )?;

    let fill = exchange.take_order(taker, 1, maker, hash, 20_000)?;
    info!(
        "Order {} {:?}: taker paid {}, received {} (fee {}), maker fee {}",
        hash, fill.status, fill.paid, fill.received, fill.taker_fee, fill.maker_fee
    );

    for (label, account) in [("maker", maker), ("taker", taker), ("fees", config.fee_account)] {
        for (asset, balance) in exchange.balances_of(account) {
            println!(
                "{:<6} {:<10} available={:<10} locked={}",
                label,
                if asset.is_native() { "native".to_string() } else { "token".to_string() },
                balance.available,
                balance.locked
            );
        }
    }

    let commitment = exchange.state_commitment()?;
    println!(
        "version={} orders={} rows={} root={}",
        commitment.version,
        commitment.order_count,
        commitment.balance_rows,
        commitment.state_root_hex()
    );
    println!(
        "taker referrer: {}",
        exchange
            .referrer_of(taker)
            .map_or_else(|| "none".to_string(), |r| r.to_string())
    );

    Ok(())
}
