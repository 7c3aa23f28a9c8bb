//! Consolidated test log
//!
//! Serializes the results coming from all workers into one flat text
//! transcript. Each task becomes one block:
//!
//! ```text
//! BEGIN: <executable>
//! <stderr>
//! END: <executable> | result: <exit code>
//!
//! ```

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::models::ExecutionResult;

/// Single shared log stream guarded by one lock
#[derive(Debug)]
pub struct LogAggregator<W> {
    writer: Mutex<W>,
    blocks: AtomicUsize,
}

impl LogAggregator<File> {
    /// Create (or truncate) the log file at `path`
    pub async fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self::new(file))
    }
}

impl<W> LogAggregator<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            blocks: AtomicUsize::new(0),
        }
    }

    /// Append the block for `result` and flush it
    ///
    /// Blocks from concurrent callers never interleave; their order is the
    /// order in which callers get the lock.
    pub async fn record(&self, result: &ExecutionResult) -> io::Result<()> {
        let block = format_block(&result.task.executable, &result.stderr, result.exit_code);

        let mut writer = self.writer.lock().await;
        writer.write_all(block.as_bytes()).await?;
        writer.flush().await?;
        self.blocks.fetch_add(1, Ordering::Relaxed);

        Ok(())
    }

    /// Number of blocks written so far
    pub fn blocks_written(&self) -> usize {
        self.blocks.load(Ordering::Relaxed)
    }

    /// Flush and shut down the stream, handing back the writer
    pub async fn close(self) -> io::Result<W> {
        let mut writer = self.writer.into_inner();
        writer.flush().await?;
        writer.shutdown().await?;
        Ok(writer)
    }
}

/// Render one log block
pub fn format_block(executable: &str, stderr: &str, exit_code: i32) -> String {
    format!("BEGIN: {executable}\n{stderr}\nEND: {executable} | result: {exit_code}\n\n")
}
