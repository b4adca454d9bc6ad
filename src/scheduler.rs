use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use tokio::{
    task::{self, JoinHandle},
    time::{self, Instant, MissedTickBehavior},
};

use crate::{declare::Symbol, logging};

/// fetch → extract → store
pub mod pipeline;

use pipeline::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// 依序輪流抓取每個代號的報價
///
/// 每個間隔觸發一次，輪到的代號另外開一個 task 執行 [`Pipeline`]，
/// 不等上一個完成，所以可能同時有多個在執行。
pub struct Poller {
    symbols: Arc<[Symbol]>,
    period: Duration,
    pipeline: Arc<Pipeline>,
    cursor: Arc<AtomicUsize>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new(symbols: Vec<Symbol>, period: Duration, pipeline: Pipeline) -> Result<Self> {
        if symbols.is_empty() {
            return Err(anyhow!("The symbol list is empty"));
        }

        if period.is_zero() {
            return Err(anyhow!("The polling interval must be greater than zero"));
        }

        Ok(Poller {
            symbols: symbols.into(),
            period,
            pipeline: Arc::new(pipeline),
            cursor: Arc::new(AtomicUsize::new(0)),
            ticker: Mutex::new(None),
        })
    }

    /// 已在執行中就什麼都不做
    pub fn start(&self) -> StartOutcome {
        let mut ticker = self.lock_ticker();
        if ticker.as_ref().is_some_and(|t| !t.is_finished()) {
            return StartOutcome::AlreadyRunning;
        }

        let symbols = Arc::clone(&self.symbols);
        let cursor = Arc::clone(&self.cursor);
        let pipeline = Arc::clone(&self.pipeline);
        let period = self.period;

        *ticker = Some(task::spawn(async move {
            // 第一次在啟動後一個間隔才觸發
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let symbol = next_symbol(&symbols, &cursor);
                let pipeline = Arc::clone(&pipeline);
                task::spawn(async move {
                    pipeline.execute(&symbol).await;
                });
            }
        }));

        logging::info_file_async(format!(
            "Started fetching {} symbols every {:?}",
            self.symbols.len(),
            self.period
        ));

        StartOutcome::Started
    }

    /// 只停止之後的觸發，已經開始執行的 pipeline 會跑完
    pub fn stop(&self) -> StopOutcome {
        match self.lock_ticker().take() {
            Some(ticker) => {
                ticker.abort();
                logging::info_file_async(format!("Stopped fetching at cursor {}", self.cursor()));
                StopOutcome::Stopped
            }
            None => StopOutcome::NotRunning,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// 下一次觸發要抓的代號位置
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(ticker) = self.lock_ticker().take() {
            ticker.abort();
        }
    }
}

/// cursor 只在計時的 task 內前進，不會和自己競爭
fn next_symbol(symbols: &[Symbol], cursor: &AtomicUsize) -> Symbol {
    let index = cursor.load(Ordering::Acquire) % symbols.len();
    cursor.store((index + 1) % symbols.len(), Ordering::Release);
    symbols[index].clone()
}
