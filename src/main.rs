//! # Quill, a source-code editor core
//!
//! Headless driver for the editor core. It opens a file (and optionally a
//! workspace), prints a syntax-highlighted preview with diagnostic
//! underlines, and can run one compile round-trip against the configured
//! compile service, printing the terminal panel the editor surface would
//! show.
//!
//! ## Quick Start
//!
//! ```bash
//! # Highlight a file
//! cargo run -- path/to/main.py
//!
//! # Highlight and compile remotely
//! cargo run -- path/to/main.py --compile
//!
//! # Open a workspace
//! cargo run -- --workspace path/to/project
//! ```

use clap::Parser;
use crossterm::style::{Attribute, Color as TermColor, Stylize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_compile::CompileClient;
use quill_core::{EditorConfig, EditorSession, FileNode, Highlighted, autosave};
use quill_syntax::{Color, DiagnosticMark, Theme, TokenCategory, TokenSpan};

/// Quill - a lightweight source-code editor core
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Workspace directory to open
    #[arg(short, long, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Send the buffer to the compile service and print the result
    #[arg(short, long)]
    compile: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Quill v{}", env!("CARGO_PKG_VERSION"));

    let config = EditorConfig::load();
    let auto_save_period = Duration::from_secs(config.files.auto_save_secs.max(1));
    let service_url = config.compile.service_url.clone();
    let request_timeout = Duration::from_secs(config.compile.request_timeout_secs);

    let session = Arc::new(Mutex::new(EditorSession::new(config)));
    let auto_save = autosave::spawn(session.clone(), auto_save_period);

    if let Some(dir) = &args.workspace {
        let mut session = session.lock().await;
        session.open_workspace(dir)?;
        if let Some(workspace) = session.workspace() {
            println!(
                "workspace {} ({} files)",
                workspace.name(),
                workspace.tree().file_count()
            );
            print_tree(workspace.tree(), 0);
            println!();
        }
    }

    if let Some(file) = &args.file {
        let mut session = session.lock().await;
        session.open(file)?;
        let highlighted = session.highlight();
        print!(
            "{}",
            render_preview(session.text(), &highlighted, session.highlighter().theme())
        );
        println!();
    }

    if args.compile {
        let request = session.lock().await.begin_compile();
        match request {
            Some(request) => {
                let client = CompileClient::with_timeout(&service_url, request_timeout)?;
                let outcome = client.compile(&request).await;

                let mut session = session.lock().await;
                match outcome {
                    Ok(response) => session.finish_compile(response),
                    Err(error) => session.fail_compile(&error),
                }

                if let Some(terminal) = session.terminal_output() {
                    println!("{terminal}");
                }
                for diagnostic in session.diagnostics() {
                    let line = format!("[{:?}] {}", diagnostic.severity, diagnostic.message);
                    println!("{}", line.with(term_color(diagnostic.severity.color())));
                }
                if let Some(status) = session.take_status() {
                    println!("{status}");
                }
            }
            None => tracing::warn!("compile already in flight, request refused"),
        }
    }

    auto_save.abort();
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Renders the buffer with theme colors and diagnostic underlines.
fn render_preview(text: &str, highlighted: &Highlighted, theme: &Theme) -> String {
    // Passthrough mode (no language rule): one default span for everything.
    let passthrough = [TokenSpan {
        start: 0,
        end: text.len(),
        category: TokenCategory::Default,
    }];
    let spans: &[TokenSpan] = if highlighted.spans.is_empty() {
        &passthrough
    } else {
        &highlighted.spans
    };

    let mut out = String::new();
    for span in spans {
        render_span(&mut out, text, span, &highlighted.marks, theme);
    }
    out
}

fn render_span(
    out: &mut String,
    text: &str,
    span: &TokenSpan,
    marks: &[DiagnosticMark],
    theme: &Theme,
) {
    let mut at = span.start;
    while at < span.end {
        // Cut at the next mark boundary inside the span, keeping the cut on
        // a character boundary.
        let mut cut = marks
            .iter()
            .flat_map(|m| [m.start, m.end])
            .filter(|&p| p > at && p < span.end)
            .min()
            .unwrap_or(span.end);
        while cut < span.end && !text.is_char_boundary(cut) {
            cut += 1;
        }

        let Some(segment) = text.get(at..cut) else {
            break;
        };
        let marked = marks.iter().find(|m| m.start <= at && at < m.end);

        let styled = match marked {
            Some(mark) => segment
                .with(term_color(mark.severity.color()))
                .attribute(Attribute::Underlined),
            None => {
                let base = segment.with(term_color(theme.color_for(span.category)));
                if span.category == TokenCategory::Keyword {
                    base.attribute(Attribute::Bold)
                } else {
                    base
                }
            }
        };
        out.push_str(&styled.to_string());
        at = cut;
    }
}

fn print_tree(node: &FileNode, depth: usize) {
    if depth > 0 {
        let suffix = if node.is_dir { "/" } else { "" };
        println!("{:indent$}{}{}", "", node.name, suffix, indent = depth * 2);
    }
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["quill"]);
        assert!(args.file.is_none());
        assert!(!args.compile);
    }

    #[test]
    fn test_args_with_file_and_compile() {
        let args = Args::parse_from(["quill", "test.py", "--compile"]);
        assert_eq!(args.file, Some(PathBuf::from("test.py")));
        assert!(args.compile);
    }

    #[test]
    fn test_render_preview_covers_text() {
        use quill_syntax::{Highlighter, SyntaxConfig};

        let text = "if x: # note\n";
        let highlighter = Highlighter::new(SyntaxConfig::builtin());
        let highlighted = Highlighted {
            spans: highlighter.highlight(text, Some("t.py")),
            marks: Vec::new(),
        };

        let rendered = render_preview(text, &highlighted, highlighter.theme());
        // Every source character survives styling.
        assert_eq!(strip_ansi(&rendered), text);
    }

    #[test]
    fn test_render_preview_passthrough() {
        let text = "plain text";
        let highlighted = Highlighted {
            spans: Vec::new(),
            marks: Vec::new(),
        };
        let rendered = render_preview(text, &highlighted, &Theme::default());
        assert_eq!(strip_ansi(&rendered), text);
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for esc in chars.by_ref() {
                    if esc == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
