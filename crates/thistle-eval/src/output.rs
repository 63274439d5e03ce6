//! Output sink for the `print` construct.
//!
//! The sink is injected at evaluator construction so tests and embedding
//! hosts can capture output instead of writing to stdout. Enum dispatch,
//! no trait object: the evaluator owns the sink and runs single-threaded.

/// Where `print` sends its lines.
#[derive(Debug)]
pub enum PrintSink {
    /// Write each printed value to stdout (default).
    Stdout,
    /// Capture printed lines for assertions.
    Buffer(Vec<String>),
}

impl PrintSink {
    /// A capturing sink with an empty buffer.
    pub fn buffer() -> Self {
        PrintSink::Buffer(Vec::new())
    }

    /// Emit one printed line.
    pub fn emit(&mut self, line: &str) {
        match self {
            PrintSink::Stdout => println!("{line}"),
            PrintSink::Buffer(lines) => lines.push(line.to_string()),
        }
    }

    /// Captured lines, empty for the stdout sink.
    pub fn captured(&self) -> &[String] {
        match self {
            PrintSink::Stdout => &[],
            PrintSink::Buffer(lines) => lines,
        }
    }
}

impl Default for PrintSink {
    fn default() -> Self {
        PrintSink::Stdout
    }
}
