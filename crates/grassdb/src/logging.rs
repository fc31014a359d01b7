use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

/// Log file for the interactive console, which owns the terminal.
pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("grassdb").join("console.log"))
}

/// Logger for one-shot commands. Results go to stdout, logs to stderr.
pub fn init_stderr() {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .target(Target::Stderr)
        .init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Logger for the interactive console.
///
/// Appends to [`log_file_path`] and returns that path. When no data
/// directory exists or the file cannot be opened, logging stays off and the
/// console starts anyway.
pub fn init_file() -> Option<PathBuf> {
    let path = log_file_path()?;

    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Console logging disabled ({}): {}", path.display(), e);
            return None;
        }
    };

    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .init();

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_and_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grassdb").join("console.log");

        open_log_file(&path).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn unusable_log_directory_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("grassdb");
        fs::write(&blocker, "not a directory").unwrap();

        let result = open_log_file(&blocker.join("console.log"));

        assert!(result.is_err());
    }
}
