use chrono::{format::DelayedFormat, DateTime, Local};
use concat_string::concat_string;
use crossbeam_channel::{unbounded, Sender};
use once_cell::sync::Lazy;
use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

const LOG_DIR: &str = "log";

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 寫檔前暫存的上限，超過就先寫出
const FLUSH_THRESHOLD: usize = 4096;

pub struct Logger {
    writer: Sender<LogMessage>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<LogMessage>();
        let mut file = DailyFile::new(LOG_DIR, log_name);

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let mut lines = String::with_capacity(FLUSH_THRESHOLD);
            let mut batch_at: Option<DateTime<Local>> = None;

            while let Ok(received) = rx.recv() {
                // 跨日的訊息不和前一天的放在同一批
                if let Some(at) = batch_at {
                    if at.date_naive() != received.created_at.date_naive() {
                        file.write_batch(at, &lines);
                        lines.clear();
                    }
                }

                batch_at = Some(received.created_at);
                lines.push_str(&received.to_line());

                if !rx.is_empty() && lines.len() < FLUSH_THRESHOLD {
                    continue;
                }

                file.write_batch(received.created_at, &lines);
                lines.clear();
                batch_at = None;
            }
        });

        Logger { writer: tx }
    }

    pub fn info(&self, log: String) {
        self.send(log::Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(log::Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(log::Level::Error, log);
    }

    pub fn debug(&self, log: String) {
        self.send(log::Level::Debug, log);
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
    }
}

/// 依日期切換的記錄檔，檔名為 `{dir}/{name}_{date}.log`
struct DailyFile {
    dir: PathBuf,
    name: String,
    cur_fn: PathBuf,
    out: Option<BufWriter<File>>,
}

impl DailyFile {
    fn new(dir: impl Into<PathBuf>, name: &str) -> Self {
        DailyFile {
            dir: dir.into(),
            name: name.to_string(),
            cur_fn: PathBuf::new(),
            out: None,
        }
    }

    fn file_name(&self, now: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.log", self.name, now.format("%Y-%m-%d")))
    }

    /// 日期變更時關閉舊檔並開啟新的檔案，開檔失敗就回傳 None
    fn get_writer(&mut self, now: DateTime<Local>) -> Option<&mut BufWriter<File>> {
        let path = self.file_name(now);

        if path != self.cur_fn {
            if let Some(mut old) = self.out.take() {
                let _ = old.flush();
            }

            match fs::create_dir_all(&self.dir).and_then(|_| open_log_file(&path)) {
                Ok(file) => self.out = Some(BufWriter::new(file)),
                Err(why) => {
                    error_console(format!("Failed to open log file {:?}: {:?}", path, why))
                }
            }

            self.cur_fn = path;
        }

        self.out.as_mut()
    }

    /// 寫不進檔案時改輸出到 console
    fn write_batch(&mut self, now: DateTime<Local>, lines: &str) {
        if lines.is_empty() {
            return;
        }

        match self.get_writer(now) {
            Some(w) => {
                if w.write_all(lines.as_bytes()).and_then(|_| w.flush()).is_err() {
                    info_console(lines.to_string());
                }
            }
            None => info_console(lines.to_string()),
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }

    fn to_line(&self) -> String {
        concat_string!(
            self.created_at.format("%F %X%.6f").to_string(),
            " ",
            self.level.to_string(),
            " ",
            self.msg,
            "\r\n"
        )
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}
