//! The boundary to the diagram generator.
//!
//! The generator is a pure function of the macro source and the four option
//! flags. Everything about the macro language itself lives on the other side
//! of [`DiagramRenderer`].

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::dom::DomError;
use crate::options::DiagramOptions;

/// A successfully generated diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub svg: String,
    /// Preferred display width in pixels.
    pub width: f64,
}

/// The only error the core knows about: the generator could not produce a diagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderFailure {
    pub message: String,
}

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<DomError> for RenderFailure {
    fn from(e: DomError) -> Self {
        Self::new(format!("unusable diagram markup: {e}"))
    }
}

pub type RenderResult = Result<Diagram, RenderFailure>;

pub trait DiagramRenderer {
    /// Must be referentially transparent: equal inputs give equivalent markup.
    fn render(&self, source: &str, options: &DiagramOptions) -> RenderResult;

    fn version_info(&self) -> Option<String> {
        None
    }
}

/// Adapts a closure into a renderer.
pub struct FnRenderer<F>(pub F);

impl<F> DiagramRenderer for FnRenderer<F>
where
    F: Fn(&str, &DiagramOptions) -> RenderResult,
{
    fn render(&self, source: &str, options: &DiagramOptions) -> RenderResult {
        (self.0)(source, options)
    }
}

/// The generator's structurally tagged reply:
/// `{"Ok":{"svg":"..","width":N}}` or `{"Err":".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireResult {
    Ok(Diagram),
    Err(String),
}

impl WireResult {
    pub fn into_result(self) -> RenderResult {
        match self {
            WireResult::Ok(diagram) => Ok(diagram),
            WireResult::Err(message) => Err(RenderFailure::new(message)),
        }
    }

    pub fn parse(bytes: &[u8]) -> RenderResult {
        serde_json::from_slice::<WireResult>(bytes)
            .map_err(|e| RenderFailure::new(format!("malformed generator reply: {e}")))?
            .into_result()
    }
}

/// Runs an external generator program per render.
///
/// The source is written to the program's stdin and the four flags are
/// appended to its arguments as `true`/`false`, in boundary order. The program
/// answers with a [`WireResult`] on stdout.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl DiagramRenderer for CommandRenderer {
    fn render(&self, source: &str, options: &DiagramOptions) -> RenderResult {
        let spawn_failed =
            |e: io::Error| RenderFailure::new(format!("failed to run `{}`: {e}", self.program));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(options.flags().map(|flag| flag.to_string()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failed)?;

        // stdin is fed from its own thread while wait_with_output drains the
        // other two pipes
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer =
                stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(source.as_bytes())));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });
        let output = output.map_err(spawn_failed)?;
        // a generator may answer without reading all of its input
        if let Err(e) = written {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(spawn_failed(e));
            }
        }
        if !output.status.success() {
            return Err(RenderFailure::new(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        WireResult::parse(&output.stdout)
    }

    fn version_info(&self) -> Option<String> {
        Some(format!(
            "{} {} using generator `{}`",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.program
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_success_becomes_diagram() {
        let result = WireResult::parse(br#"{"Ok":{"svg":"<svg/>","width":412}}"#);
        assert_eq!(
            result,
            Ok(Diagram {
                svg: "<svg/>".to_string(),
                width: 412.0,
            })
        );
    }

    #[test]
    fn wire_error_becomes_failure() {
        let result = WireResult::parse(br#"{"Err":"expected `macro_rules`"}"#);
        assert_eq!(result, Err(RenderFailure::new("expected `macro_rules`")));
    }

    #[test]
    fn garbage_reply_is_a_failure() {
        let result = WireResult::parse(b"<svg/>");
        assert!(result
            .unwrap_err()
            .message
            .starts_with("malformed generator reply"));
    }

    #[test]
    fn fn_renderer_forwards_flags() {
        let renderer = FnRenderer(|source: &str, options: &DiagramOptions| -> RenderResult {
            Ok(Diagram {
                svg: format!("<svg><text>{source} {:?}</text></svg>", options.flags()),
                width: 1.0,
            })
        });
        let mut options = DiagramOptions::default();
        options.show_legend = false;
        let diagram = renderer.render("x", &options).unwrap();
        assert_eq!(diagram.svg, "<svg><text>x [true, true, true, false]</text></svg>");
        assert_eq!(renderer.version_info(), None);
    }

    #[test]
    fn missing_program_is_a_failure() {
        let renderer = CommandRenderer::new("railview-no-such-generator", Vec::new());
        let failure = renderer.render("x", &DiagramOptions::default()).unwrap_err();
        assert!(failure.message.contains("railview-no-such-generator"));
    }

    fn sh(script: &str) -> CommandRenderer {
        CommandRenderer::new("sh", vec!["-c".into(), script.into(), "generator".into()])
    }

    fn render_within(renderer: CommandRenderer, source: String) -> RenderResult {
        let (tx, rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(renderer.render(&source, &DiagramOptions::default()));
        });
        rx.recv_timeout(std::time::Duration::from_secs(30))
            .expect("generator call did not complete")
    }

    #[test]
    fn chatty_generator_with_large_source_completes() {
        let renderer = sh(
            r#"head -c 200000 /dev/zero | tr '\0' x >&2; n=$(wc -c); printf '{"Ok":{"svg":"<svg/>","width":%s}}' "$n""#,
        );
        let diagram = render_within(renderer, "x".repeat(200_000)).unwrap();
        assert_eq!(diagram.width, 200_000.0);
    }

    #[test]
    fn generator_may_ignore_its_input() {
        let renderer = sh(r#"printf '{"Ok":{"svg":"<svg/>","width":3}}'"#);
        let diagram = render_within(renderer, "x".repeat(500_000)).unwrap();
        assert_eq!(diagram.svg, "<svg/>");
    }

    #[test]
    fn failing_generator_reports_stderr() {
        let renderer = sh("cat > /dev/null; echo 'no rules found' >&2; exit 2");
        let failure = render_within(renderer, "macro_rules! m {}".to_string()).unwrap_err();
        assert!(failure.message.contains("no rules found"));
    }
}
