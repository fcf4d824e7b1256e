//! Stock Sync - supplier feed to marketplace stock & prices
//!
//! Fetches the supplier spreadsheet once, then updates each configured
//! marketplace account in turn. Credentials come from the environment
//! (or a `.env` file).

use clap::{Args, Parser, Subcommand};
use stock_sync::feed::{DEFAULT_FEED_FILE, DEFAULT_FEED_URL, DEFAULT_HEADER_ROW};
use stock_sync::{sync_marketplace, FeedRecord, FeedSource, OzonSeller, Result, YandexMarket};

/// Push supplier stock levels and prices to Ozon and Yandex Market
#[derive(Parser, Debug)]
#[command(name = "stock_sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// URL of the ZIP archive with the stock spreadsheet
    #[arg(long, env = "FEED_URL", default_value = DEFAULT_FEED_URL, global = true)]
    feed_url: String,

    /// Spreadsheet file name inside the archive
    #[arg(long, default_value = DEFAULT_FEED_FILE, global = true)]
    feed_file: String,

    /// Zero-based row holding the column labels
    #[arg(long, default_value_t = DEFAULT_HEADER_ROW, global = true)]
    header_row: u32,

    #[command(subcommand)]
    target: Target,
}

#[derive(Subcommand, Debug)]
enum Target {
    /// Update the Ozon seller account
    Ozon(OzonArgs),
    /// Update both Yandex Market campaigns (FBS and DBS)
    Yandex(YandexArgs),
    /// Update Ozon, then Yandex Market
    All {
        #[command(flatten)]
        ozon: OzonArgs,
        #[command(flatten)]
        yandex: YandexArgs,
    },
}

#[derive(Args, Debug)]
struct OzonArgs {
    /// Ozon seller API key
    #[arg(long, env = "SELLER_TOKEN", hide_env_values = true)]
    seller_token: String,

    /// Ozon client id
    #[arg(long, env = "CLIENT_ID")]
    client_id: String,
}

#[derive(Args, Debug)]
struct YandexArgs {
    /// Yandex Market OAuth token
    #[arg(long, env = "MARKET_TOKEN", hide_env_values = true)]
    market_token: String,

    /// FBS campaign id
    #[arg(long, env = "FBS_ID")]
    fbs_id: String,

    /// DBS campaign id
    #[arg(long, env = "DBS_ID")]
    dbs_id: String,

    /// Warehouse id for the FBS campaign
    #[arg(long, env = "WAREHOUSE_FBS_ID")]
    warehouse_fbs_id: String,

    /// Warehouse id for the DBS campaign
    #[arg(long, env = "WAREHOUSE_DBS_ID")]
    warehouse_dbs_id: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("Starting stock_sync...");

    if let Err(e) = run(cli).await {
        log::error!("{}: {}", e.tag(), e);
        std::process::exit(1);
    }

    log::info!("Sync completed successfully.");
}

async fn run(cli: Cli) -> Result<()> {
    let source = FeedSource {
        url: cli.feed_url,
        file_name: cli.feed_file,
        header_row: cli.header_row,
    };
    let records = source.fetch().await?;

    match cli.target {
        Target::Ozon(ozon) => sync_ozon(&ozon, &records).await,
        Target::Yandex(yandex) => sync_yandex(&yandex, &records).await,
        Target::All { ozon, yandex } => {
            sync_ozon(&ozon, &records).await?;
            sync_yandex(&yandex, &records).await
        }
    }
}

async fn sync_ozon(args: &OzonArgs, records: &[FeedRecord]) -> Result<()> {
    let seller = OzonSeller::new(args.client_id.clone(), args.seller_token.clone());
    sync_marketplace(&seller, records).await?;
    Ok(())
}

async fn sync_yandex(args: &YandexArgs, records: &[FeedRecord]) -> Result<()> {
    let market = YandexMarket::new(args.market_token.clone());

    let fbs = market.campaign("FBS", &args.fbs_id, &args.warehouse_fbs_id);
    sync_marketplace(&fbs, records).await?;

    let dbs = market.campaign("DBS", &args.dbs_id, &args.warehouse_dbs_id);
    sync_marketplace(&dbs, records).await?;
    Ok(())
}
