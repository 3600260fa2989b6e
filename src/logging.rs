//! File logger setup
//!
//! The TUI owns the terminal, so log lines go to `<work_dir>/drilldown.log`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::config::SessionConfig;

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. Returns the log file path.
///
/// A logger that is already installed is left in place.
pub fn init(session: &SessionConfig) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(&session.work_dir)?;
    let path = session.log_path();
    let file = open_log(&path)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_ignore_str("hyper")
        .build();

    let _ = WriteLogger::init(level_for(session.verbose), log_config, file);
    Ok(path)
}

fn open_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_creates_work_dir_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionConfig {
            work_dir: dir.path().join("nested").join("tmp"),
            ..SessionConfig::default()
        };

        let path = init(&session).unwrap();
        assert_eq!(path, session.work_dir.join("drilldown.log"));
        assert!(path.exists());
    }
}
