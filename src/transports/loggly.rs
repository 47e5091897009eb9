use crate::error::{Result, TransportError};
use crate::logger_levels::LoggerLevels;
use crate::transport_config::LogglyTransportOptions;
use chrono::{SecondsFormat, Utc};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use logform::LogInfo;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use std::thread;
use std::time::{Duration, Instant};
use winston_transport::Transport;

pub const DEFAULT_ENDPOINT: &str = "https://logs-01.loggly.com";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

enum BulkMessage {
    Event(String),
    Flush(Sender<std::result::Result<(), String>>),
    Shutdown,
}

/// Ships entries to Loggly, batching them on a worker thread when
/// `is_bulk` is set.
///
/// Sends that fail are reported through `log` and the affected events are
/// dropped.
pub struct LogglyTransport {
    options: LogglyTransportOptions,
    levels: LoggerLevels,
    sender: Sender<BulkMessage>,
    worker_thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl LogglyTransport {
    pub fn new(options: LogglyTransportOptions) -> Result<Self> {
        Self::builder(options).build()
    }

    pub fn builder(options: LogglyTransportOptions) -> LogglyTransportBuilder {
        LogglyTransportBuilder::new(options)
    }

    pub fn options(&self) -> &LogglyTransportOptions {
        &self.options
    }

    /// Minimum level this transport forwards.
    pub fn level(&self) -> &str {
        &self.options.level
    }

    fn encode(&self, info: LogInfo) -> Result<String> {
        if !self.options.json {
            return Ok(info.message);
        }

        let mut event: Map<String, Value> = info.meta.into_iter().collect();
        event.insert("level".to_string(), Value::String(info.level));
        event.insert("message".to_string(), Value::String(info.message));
        event.entry("timestamp").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });

        Ok(serde_json::to_string(&event)?)
    }

    fn worker_loop(
        receiver: Receiver<BulkMessage>,
        client: BulkClient,
        batch_size: usize,
        flush_interval: Duration,
    ) {
        let mut buffer: Vec<String> = Vec::new();
        // `None` when the interval is too long to represent; only full
        // batches, flushes and shutdown send in that case.
        let mut deadline = Instant::now().checked_add(flush_interval);

        loop {
            let message = match deadline {
                Some(deadline) => {
                    receiver.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match message {
                Ok(BulkMessage::Event(event)) => {
                    buffer.push(event);
                    if buffer.len() >= batch_size {
                        let _ = client.send_batch(&mut buffer);
                    }
                }
                Ok(BulkMessage::Flush(reply)) => {
                    let result = client.send_batch(&mut buffer).map_err(|e| e.to_string());
                    let _ = reply.send(result);
                }
                Ok(BulkMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = client.send_batch(&mut buffer);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let _ = client.send_batch(&mut buffer);
                    deadline = Instant::now().checked_add(flush_interval);
                }
            }
        }
    }
}

impl Transport<LogInfo> for LogglyTransport {
    fn log(&self, info: LogInfo) {
        if !self.levels.is_enabled(&self.options.level, &info.level) {
            return;
        }

        match self.encode(info) {
            Ok(event) => {
                if self.sender.send(BulkMessage::Event(event)).is_err() {
                    log::warn!("[winston_env] {}", TransportError::WorkerGone);
                }
            }
            Err(e) => log::warn!("[winston_env] dropping Loggly event: {}", e),
        }
    }

    fn flush(&self) -> std::result::Result<(), String> {
        let (reply_tx, reply_rx) = bounded(1);
        self.sender
            .send(BulkMessage::Flush(reply_tx))
            .map_err(|_| TransportError::WorkerGone.to_string())?;
        reply_rx
            .recv()
            .map_err(|_| TransportError::WorkerGone.to_string())?
    }
}

impl Drop for LogglyTransport {
    fn drop(&mut self) {
        let _ = self.sender.send(BulkMessage::Shutdown);
        if let Some(handle) = self.worker_thread.lock().take() {
            if handle.join().is_err() {
                log::warn!("[winston_env] Loggly worker thread panicked");
            }
        }
    }
}

struct BulkClient {
    client: Client,
    endpoint: String,
    options: LogglyTransportOptions,
}

impl BulkClient {
    /// Sends and clears `buffer`. Events are dropped whether or not the
    /// request succeeds.
    fn send_batch(&self, buffer: &mut Vec<String>) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        let events = std::mem::take(buffer);
        let count = events.len();
        let result = self.send(events);

        match &result {
            Ok(()) => log::debug!("[winston_env] sent {} event(s) to Loggly", count),
            Err(e) => log::warn!(
                "[winston_env] error while sending batch of {} event(s) to Loggly: {}",
                count,
                e
            ),
        }
        result
    }

    fn send(&self, events: Vec<String>) -> Result<()> {
        let token = self
            .options
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TransportError::MissingToken)?;
        let tags = self.options.tag_path();

        if self.options.is_bulk {
            let url = format!("{}/bulk/{}/tag/{}/", self.endpoint, token, tags);
            return self.post(&url, "text/plain", events.join("\n"));
        }

        let url = format!("{}/inputs/{}/tag/{}/", self.endpoint, token, tags);
        let content_type = if self.options.json {
            "application/json"
        } else {
            "text/plain"
        };
        // Every event gets its own attempt; the first failure is reported.
        let mut first_error = None;
        for event in events {
            if let Err(e) = self.post(&url, content_type, event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn post(&self, url: &str, content_type: &str, body: String) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status {
                service: "Loggly",
                status,
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

pub struct LogglyTransportBuilder {
    options: LogglyTransportOptions,
    endpoint: String,
    batch_size: usize,
    flush_interval: Duration,
    timeout: Duration,
    channel_capacity: usize,
}

impl LogglyTransportBuilder {
    pub fn new(options: LogglyTransportOptions) -> Self {
        Self {
            options,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Base URL of the Loggly input API, without a trailing slash.
    pub fn endpoint<T: Into<String>>(mut self, endpoint: T) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// How long queued events may wait before being sent. `Duration::MAX`
    /// disables the timer.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval.max(MIN_FLUSH_INTERVAL);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> Result<LogglyTransport> {
        let client = Client::builder().timeout(self.timeout).build()?;
        // Without bulk mode every event goes out on its own.
        let batch_size = if self.options.is_bulk {
            self.batch_size
        } else {
            1
        };

        let (sender, receiver) = bounded(self.channel_capacity);
        let bulk_client = BulkClient {
            client,
            endpoint: self.endpoint,
            options: self.options.clone(),
        };
        let flush_interval = self.flush_interval;
        let worker_thread = thread::spawn(move || {
            LogglyTransport::worker_loop(receiver, bulk_client, batch_size, flush_interval);
        });

        Ok(LogglyTransport {
            options: self.options,
            levels: LoggerLevels::default(),
            sender,
            worker_thread: Mutex::new(Some(worker_thread)),
        })
    }
}
