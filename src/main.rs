use std::{env, sync::Arc, time::Duration};

use anyhow::Result;

use crate::{
    crawler::google::{extractor::PriceExtractor, GoogleFinance},
    declare::Symbol,
    nosql::redis::Redis,
    scheduler::{pipeline::Pipeline, Poller},
};

pub mod config;
pub mod crawler;
pub mod declare;
pub mod error;
pub mod logging;
pub mod nosql;
pub mod scheduler;
pub mod util;
pub mod web;

#[cfg(test)]
mod test_support;

#[cfg(all(target_os = "linux", target_env = "musl"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let settings = config::App::get()?;

    let source = Arc::new(GoogleFinance::new(&settings.source));
    let extractor = PriceExtractor::new(&settings.source.selector)?;
    let store = Arc::new(Redis::new(&settings.nosql.redis)?);

    match store.ping().await {
        Ok(pong) => logging::info_file_async(format!("Redis {}", pong)),
        Err(why) => {
            logging::error_file_async(format!("Failed to ping redis because {:?}", why))
        }
    }

    let symbols = settings
        .poller
        .symbols
        .iter()
        .map(|s| Symbol::new(s.as_str()))
        .collect();
    let pipeline = Pipeline::new(source, extractor, store, settings.store.key_prefix.as_str());
    let poller = Arc::new(Poller::new(
        symbols,
        Duration::from_millis(settings.poller.interval_ms),
        pipeline,
    )?);

    logging::info_file_async(format!(
        "IndexFetcher 已啟動 Rust OS/Arch: {}/{}",
        env::consts::OS,
        env::consts::ARCH
    ));

    web::serve(settings.server.port, poller).await
}
