use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, Layer, Registry};

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s).map_or(LevelFilter::OFF, LevelFilter::from_level)
}

/// Returns true if target == prefix or target starts with "prefix::"
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

/// Routes each record to the file of the longest matching target section,
/// falling back to the "default" file. Unclaimed records are dropped.
#[derive(Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_target: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_target
            .iter()
            .filter(|(prefix, _)| matches_target_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_target.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.default {
            Some(w) => Box::new(w.clone()),
            None => Box::new(std::io::sink()),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        match self.resolve_for(meta.target()) {
            Some(w) => Box::new(w),
            None => Box::new(std::io::sink()),
        }
    }
}

// -------- path resolution helpers --------

/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Create a rotating writer, ensuring the parent directory exists.
fn create_rotating_writer_at_path(
    log_path: &Path,
    section: &Section,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rot = FileRotate::new(
        log_path,
        AppendCount::new(backups),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let log_path = resolve_log_path(&section.file, base_dir);
    match create_rotating_writer_at_path(&log_path, section) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.to_string_lossy(),
                e
            );
            None
        }
    }
}

// -------- filter construction --------

/// Console filter: the "default" section sets the fallback level and every
/// other section overrides it for its own target prefix.
fn build_console_targets(cfg: &LoggingConfig) -> Targets {
    let fallback = cfg
        .get(DEFAULT_SECTION)
        .map_or(LevelFilter::OFF, |s| level_filter(&s.console_level));

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(fallback), |targets, (name, s)| {
            targets.with_target(name.clone(), level_filter(&s.console_level))
        })
}

/// File filter: only sections that own a file contribute. A target section
/// without a file falls through to the default file.
fn build_file_targets(cfg: &LoggingConfig, router: &FileRouter) -> Targets {
    let fallback = match (cfg.get(DEFAULT_SECTION), &router.default) {
        (Some(s), Some(_)) => level_filter(&s.file_level),
        _ => LevelFilter::OFF,
    };

    router
        .by_target
        .iter()
        .filter_map(|(name, _)| cfg.get(name).map(|s| (name, s)))
        .fold(Targets::new().with_default(fallback), |targets, (name, s)| {
            targets.with_target(name.clone(), level_filter(&s.file_level))
        })
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg {
        let Some(writer) = open_section_file(name, section, base_dir) else {
            continue;
        };
        if name == DEFAULT_SECTION {
            router.default = Some(writer);
        } else {
            router.by_target.push((name.clone(), writer));
        }
    }
    router
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: sections keyed by target prefix, "default" being the catch-all
/// - `base_dir`: directory used to resolve relative log file paths
///
/// Console output goes to stderr so stdout stays free for rendered documents.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(build_console_targets(cfg));

    let router = build_file_router(cfg, base_dir);
    let file_layer = (!router.is_empty()).then(|| {
        let targets = build_file_targets(cfg, &router);
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(targets)
    });

    let subscriber = Registry::default().with(console_layer).with(file_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
}

// =================== tests ===================
