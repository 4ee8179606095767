//! dgddoc — generate documentation pages from DGD LPC source files.
//!
//! Two modes:
//!
//! - **stdin mode**: `dgddoc < object.c` writes one page to stdout
//! - **file mode**: `dgddoc -o docs/ lib/*.c include/` writes one page per file

mod markup;
mod page;
mod preprocess;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use dgd_doc::{MarkupRenderer, ParseError, SourceFile};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::page::Page;
use crate::preprocess::{CppPreprocessor, LineMap, STDIN_NAME};

#[derive(Parser)]
#[command(
    name = "dgddoc",
    about = "Generate documentation from doc comments in DGD LPC source files"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), html, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Run sources through cpp before extracting documentation
    #[arg(long)]
    preprocess: bool,

    /// DGD tree root; its include/ directory is added to the cpp include path
    #[arg(long, value_name = "DIR")]
    dgd_root: Option<PathBuf>,

    /// Include private members and @private functions in output
    #[arg(long)]
    show_private: bool,

    /// Log pipeline progress to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// stdin mode: read one source from stdin, write one page to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let renderer = render::create_renderer(&cli.format)?;
    let markup = render::markup_for(&cli.format);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let (file, lines) =
        parse_input(cli, markup.as_ref(), &input, None).context("failed to parse stdin")?;
    report_diagnostics(STDIN_NAME, &file, lines.as_ref());

    let page = Page::new("stdin", &file, cli.show_private);
    print!("{}", renderer.render(&page)?);
    Ok(())
}

/// file mode: parse every input, write one page per file to the output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let renderer = render::create_renderer(&cli.format)?;
    let markup = render::markup_for(&cli.format);
    let ext = renderer.file_extension();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    let mut used_names = HashSet::new();

    for path in &input_files {
        let parsed = dgd_doc::read_source(path)
            .and_then(|text| parse_input(cli, markup.as_ref(), &text, Some(path.as_path())));
        let (file, lines) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };
        report_diagnostics(&path.display().to_string(), &file, lines.as_ref());

        let name = derive_output_name(path, &mut used_names);
        let page = Page::new(name.as_str(), &file, cli.show_private);
        if page.is_empty() {
            tracing::debug!(path = %path.display(), "nothing documented");
        }

        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(&page)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Parse one source, through cpp when `--preprocess` is given. The line map
/// comes back with the model so warnings can name the lines as written.
fn parse_input(
    cli: &Cli,
    markup: &dyn MarkupRenderer,
    text: &str,
    source: Option<&Path>,
) -> Result<(SourceFile, Option<LineMap>), ParseError> {
    let parser = dgd_doc::Parser::new(markup);
    if !cli.preprocess {
        return Ok((parser.parse_str(text)?, None));
    }
    let expansion = preprocessor(cli, source)
        .expand(text)
        .map_err(ParseError::Preprocess)?;
    let file = parser.parse_str(&expansion.text)?;
    Ok((file, Some(expansion.lines)))
}

/// cpp configured for one source: its own directory, then the DGD include tree.
fn preprocessor(cli: &Cli, source: Option<&Path>) -> CppPreprocessor {
    let mut cpp = CppPreprocessor::default();
    if let Some(dir) = source.and_then(Path::parent) {
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
        cpp = cpp.include_dir(dir);
    }
    if let Some(ref root) = cli.dgd_root {
        cpp = cpp.include_dir(root.join("include"));
    }
    cpp
}

/// `warning: lib/obj.c:12: doc comment without a matching ... [orphan-comment]`
///
/// After preprocessing, lines are mapped back through cpp's markers; text
/// pulled in by `#include` is reported against the header it came from.
fn report_diagnostics(name: &str, file: &SourceFile, lines: Option<&LineMap>) {
    for d in file.diagnostics() {
        let line = file.line_of(d.offset);
        let (origin, line) = match lines.and_then(|map| map.origin(line)) {
            Some((STDIN_NAME, source_line)) => (name, source_line),
            Some((header, source_line)) => (header, source_line),
            None => (name, line),
        };
        eprintln!("warning: {}:{}: {}", origin, line, d);
    }
}

/// File extensions recognized as LPC sources.
const SUPPORTED_EXTENSIONS: &[&str] = &["c", "h"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Output file name (without extension) for a source path.
///
/// "lib/user.c" → "user". When the stem is already taken (say by
/// "lib/user.h"), the full file name is used with its dot replaced: "user_h".
fn derive_output_name(path: &Path, used: &mut HashSet<String>) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());

    let name = if used.contains(&stem) {
        file_name.replace('.', "_")
    } else {
        stem
    };
    used.insert(name.clone());
    name
}
