//! `cpp`-backed [`Preprocessor`]: expands `#include` and macros so the
//! extractor sees what the driver would compile.

use dgd_doc::{PreprocessError, Preprocessor};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;

/// Name cpp gives to source read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// `# 12 "/usr/include/foo.h" 2` line markers emitted by cpp.
static RE_LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^# (?P<line>\d+) "(?P<file>[^"]*)""#).unwrap());

/// Runs `cpp -C -D__DGD__ -I<dir>... -` with the text on stdin.
#[derive(Debug, Clone)]
pub struct CppPreprocessor {
    program: String,
    include_dirs: Vec<PathBuf>,
}

/// Cleaned cpp output plus where each of its lines came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub lines: LineMap,
}

/// Maps lines of cleaned cpp output back to `(file, line)` in the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    files: Vec<String>,
    /// Per output line: index into `files`, 1-based source line.
    lines: Vec<(usize, usize)>,
}

impl Default for LineMap {
    fn default() -> Self {
        // Text before the first marker belongs to the input itself.
        Self {
            files: vec![STDIN_NAME.to_string()],
            lines: Vec::new(),
        }
    }
}

impl LineMap {
    /// Source file and line of a 1-based output line.
    pub fn origin(&self, line: usize) -> Option<(&str, usize)> {
        let &(file, source_line) = self.lines.get(line.checked_sub(1)?)?;
        Some((self.files.get(file)?.as_str(), source_line))
    }

    fn file_index(&mut self, name: &str) -> usize {
        match self.files.iter().position(|f| f == name) {
            Some(i) => i,
            None => {
                self.files.push(name.to_string());
                self.files.len() - 1
            }
        }
    }
}

impl Default for CppPreprocessor {
    fn default() -> Self {
        Self {
            program: "cpp".to_string(),
            include_dirs: Vec::new(),
        }
    }
}

impl CppPreprocessor {
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        // -C keeps comments; doc comments are what we're after.
        cmd.arg("-C").arg("-D__DGD__");
        for dir in &self.include_dirs {
            cmd.arg(format!("-I{}", dir.display()));
        }
        cmd.arg("-");
        cmd
    }

    /// Run cpp over `text` and keep the line origins its markers describe.
    pub fn expand(&self, text: &str) -> Result<Expansion, PreprocessError> {
        let mut cmd = self.command();
        tracing::debug!(?cmd, "running preprocessor");

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        // Feed stdin from another thread so a full stdout pipe can't stall us.
        let mut stdin = child.stdin.take().ok_or("preprocessor stdin unavailable")?;
        let input = text.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| "preprocessor input thread panicked")?;

        // A cpp that bails out early also breaks the input pipe; its own
        // message is the one worth showing.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )
            .into());
        }
        written?;

        let stdout = String::from_utf8(output.stdout)?;
        Ok(clean_cpp_output(&stdout))
    }
}

impl Preprocessor for CppPreprocessor {
    fn preprocess(&self, text: &str) -> Result<String, PreprocessError> {
        Ok(self.expand(text)?.text)
    }
}

/// Drop line markers and the blank lines cpp leaves behind, recording the
/// origin of every line that is kept.
pub fn clean_cpp_output(raw: &str) -> Expansion {
    let mut text = String::with_capacity(raw.len());
    let mut lines = LineMap::default();
    let mut file = 0;
    let mut next_line = 1;

    for line in raw.lines() {
        if let Some(caps) = RE_LINE_MARKER.captures(line) {
            file = lines.file_index(&caps["file"]);
            next_line = caps["line"].parse().unwrap_or(1);
            continue;
        }
        let source_line = next_line;
        next_line += 1;
        if line.is_empty() {
            continue;
        }
        text.push_str(line);
        text.push('\n');
        lines.lines.push((file, source_line));
    }

    Expansion { text, lines }
}
