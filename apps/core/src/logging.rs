use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "devtools-showcase.log";
const ROTATE_AT_BYTES: u64 = 512 * 1024;
const KEPT_GENERATIONS: usize = 3;

static SINK: Mutex<Option<LogSink>> = Mutex::new(None);
static PANIC_HOOK: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Everything the showcase writes to its log. Lines are `key=value` so a
/// support request can be grepped by event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent<'a> {
    Startup {
        hotkey: &'a str,
        step: u8,
        interval_ms: u64,
        config_path: &'a Path,
    },
    ConfigWritten(&'a Path),
    QueryApplied {
        text: &'a str,
        category: &'a str,
        results: usize,
    },
    InstallStarted {
        step: u8,
    },
    InstallCancelled {
        percent: u8,
        by_teardown: bool,
    },
    InstallCompleted {
        run: u64,
    },
    Panic {
        location: String,
        payload: String,
    },
}

impl LogEvent<'_> {
    pub fn level(&self) -> Level {
        match self {
            Self::InstallCancelled {
                by_teardown: true, ..
            } => Level::Warn,
            Self::Panic { .. } => Level::Error,
            _ => Level::Info,
        }
    }
}

impl Display for LogEvent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Startup {
                hotkey,
                step,
                interval_ms,
                config_path,
            } => write!(
                f,
                "event=startup hotkey={hotkey} step={step} interval_ms={interval_ms} config={}",
                config_path.display()
            ),
            Self::ConfigWritten(path) => write!(f, "event=config_written path={}", path.display()),
            Self::QueryApplied {
                text,
                category,
                results,
            } => write!(
                f,
                "event=query text={text:?} category={category} results={results}"
            ),
            Self::InstallStarted { step } => write!(f, "event=install_started step={step}"),
            Self::InstallCancelled {
                percent,
                by_teardown,
            } => write!(
                f,
                "event=install_cancelled percent={percent} teardown={by_teardown}"
            ),
            Self::InstallCompleted { run } => write!(f, "event=install_completed run={run}"),
            Self::Panic { location, payload } => {
                write!(f, "event=panic at={location} payload={payload:?}")
            }
        }
    }
}

/// Open log file plus the byte count that drives rotation.
struct LogSink {
    path: PathBuf,
    file: File,
    written: u64,
}

impl LogSink {
    fn open(path: PathBuf) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
        })
    }

    fn write_event(&mut self, ts: u64, event: &LogEvent<'_>) -> Result<(), std::io::Error> {
        if self.written >= ROTATE_AT_BYTES {
            shift_generations(&self.path)?;
            *self = Self::open(self.path.clone())?;
        }

        let line = format!("[{ts}] [{}] {event}\n", event.level().as_str());
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        self.written += line.len() as u64;
        Ok(())
    }
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

pub fn init() -> Result<(), std::io::Error> {
    init_in(&logs_dir())
}

/// (Re)points the process log at `log_dir`. A later call replaces the
/// earlier sink.
pub fn init_in(log_dir: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(log_dir)?;
    let sink = LogSink::open(log_dir.join(LOG_FILE_NAME))?;
    if let Ok(mut slot) = SINK.lock() {
        *slot = Some(sink);
    }
    PANIC_HOOK.call_once(install_panic_hook);
    Ok(())
}

/// Closes the log file. Events recorded afterwards are dropped.
pub fn shutdown() {
    if let Ok(mut slot) = SINK.lock() {
        *slot = None;
    }
}

/// Writes one event. A no-op until `init` succeeds; write failures are
/// swallowed so logging never changes program behavior.
pub fn record(event: &LogEvent<'_>) {
    let Ok(mut slot) = SINK.lock() else {
        return;
    };
    if let Some(sink) = slot.as_mut() {
        let _ = sink.write_event(now_secs(), event);
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn generation_path(log_path: &Path, generation: usize) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{generation}"));
    PathBuf::from(name)
}

/// `log` -> `log.1` -> `log.2` ... ; the oldest generation falls off.
fn shift_generations(log_path: &Path) -> Result<(), std::io::Error> {
    let oldest = generation_path(log_path, KEPT_GENERATIONS);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for generation in (1..KEPT_GENERATIONS).rev() {
        let from = generation_path(log_path, generation);
        if from.exists() {
            fs::rename(&from, generation_path(log_path, generation + 1))?;
        }
    }
    if log_path.exists() {
        fs::rename(log_path, generation_path(log_path, 1))?;
    }
    Ok(())
}

fn install_panic_hook() {
    let prior = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        record(&LogEvent::Panic { location, payload });
        prior(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        generation_path, logs_dir, shift_generations, Level, LogEvent, LogSink, KEPT_GENERATIONS,
        ROTATE_AT_BYTES,
    };

    fn scratch_dir(label: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("devtools-showcase-{label}-{unique}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn logs_dir_uses_stable_app_data_layout() {
        let dir = logs_dir();
        assert!(dir
            .to_string_lossy()
            .to_ascii_lowercase()
            .contains("devtools-showcase"));
    }

    #[test]
    fn events_render_as_key_value_lines() {
        let query = LogEvent::QueryApplied {
            text: "ai",
            category: "all",
            results: 1,
        };
        assert_eq!(
            query.to_string(),
            r#"event=query text="ai" category=all results=1"#
        );
        assert_eq!(query.level(), Level::Info);

        let startup = LogEvent::Startup {
            hotkey: "Ctrl+K",
            step: 2,
            interval_ms: 50,
            config_path: Path::new("cfg.json"),
        };
        assert_eq!(
            startup.to_string(),
            "event=startup hotkey=Ctrl+K step=2 interval_ms=50 config=cfg.json"
        );
    }

    #[test]
    fn teardown_cancel_is_a_warning() {
        let by_user = LogEvent::InstallCancelled {
            percent: 40,
            by_teardown: false,
        };
        let by_teardown = LogEvent::InstallCancelled {
            percent: 40,
            by_teardown: true,
        };
        assert_eq!(by_user.level(), Level::Info);
        assert_eq!(by_teardown.level(), Level::Warn);
    }

    #[test]
    fn shift_keeps_bounded_generations() {
        let dir = scratch_dir("rotate");
        let log = dir.join("app.log");
        for round in 0..(KEPT_GENERATIONS + 2) {
            std::fs::write(&log, format!("round {round}")).unwrap();
            shift_generations(&log).unwrap();
        }

        assert!(!log.exists());
        assert_eq!(
            std::fs::read_to_string(generation_path(&log, 1)).unwrap(),
            format!("round {}", KEPT_GENERATIONS + 1)
        );
        assert!(generation_path(&log, KEPT_GENERATIONS).exists());
        assert!(!generation_path(&log, KEPT_GENERATIONS + 1).exists());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn sink_rotates_once_over_threshold() {
        let dir = scratch_dir("sink");
        let log = dir.join("app.log");
        std::fs::write(&log, vec![b'x'; ROTATE_AT_BYTES as usize]).unwrap();

        let mut sink = LogSink::open(log.clone()).unwrap();
        sink.write_event(7, &LogEvent::InstallCompleted { run: 1 })
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "[7] [INFO] event=install_completed run=1\n"
        );
        assert_eq!(
            std::fs::metadata(generation_path(&log, 1)).unwrap().len(),
            ROTATE_AT_BYTES
        );

        std::fs::remove_dir_all(dir).unwrap();
    }
}
