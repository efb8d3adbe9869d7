use std::{
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

/// Destination of rendered message blocks.
///
/// Implementations must write a block in one piece: blocks from concurrent
/// callers never interleave.
pub trait LogWriter: Send + Sync {
    fn write_block(&self, block: &str);
}

/// Writes blocks to the process standard output.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn write_block(&self, block: &str) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(block.as_bytes()).ok();
        stdout.flush().ok();
    }
}

/// In-memory writer. Clones share the same buffer.
#[derive(Default, Debug, Clone)]
pub struct LogBuffer {
    buffer: Arc<Mutex<String>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
    /// Empties the buffer and returns what it held.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
    /// Splits the contents into blocks, each ending with its `<<<<<` line.
    pub fn blocks(&self) -> Vec<String> {
        let contents = self.contents();
        contents
            .split_inclusive(crate::utils::BLOCK_END)
            .map(String::from)
            .collect()
    }
}

impl LogWriter for LogBuffer {
    fn write_block(&self, block: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(block);
    }
}

#[test]
fn test_log_buffer() {
    let buffer = LogBuffer::new();
    let clone = buffer.clone();
    clone.write_block("first\n<<<<<\n");
    clone.write_block("second\n<<<<<\n");
    assert_eq!(
        buffer.blocks(),
        vec!["first\n<<<<<\n".to_string(), "second\n<<<<<\n".to_string()]
    );
    assert_eq!(buffer.take(), "first\n<<<<<\nsecond\n<<<<<\n");
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_log_stdout() {
    LogStdout.write_block("Hello, world!\n<<<<<\n");
}
