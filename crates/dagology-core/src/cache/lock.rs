use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;

/// Exclusive advisory lock held while a cache entry is rewritten.
///
/// Released on drop.
#[derive(Debug)]
pub(crate) struct CacheLock {
    file: File,
}

impl CacheLock {
    /// Acquire the lock at `path`, polling until `timeout` elapses.
    pub(crate) fn acquire(path: &Path, timeout: Duration) -> io::Result<Self> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "lock path has no parent")
        })?;
        fs::create_dir_all(parent)?;

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            if file.try_lock_exclusive().is_ok() {
                return Ok(Self { file });
            }

            if start.elapsed() >= timeout {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    format!(
                        "cache lock timed out after {:?} at {}",
                        start.elapsed(),
                        path.display()
                    ),
                ));
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
