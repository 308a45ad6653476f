//! Layout model backed by an external inference program
//!
//! Protocol, one process per call:
//!
//! ```text
//! program [args..] [--weights FILE] IMAGE
//! program [args..] [--weights FILE] --structure IMAGE X Y W H
//! ```
//!
//! Both print a JSON array on stdout:
//! `[{"label": "table", "bbox": [x, y, w, h], "score": 0.93}, ...]`.
//! Structure output uses the labels `row` and `column`, with boxes
//! relative to the table's top-left corner. A process that outlives its
//! deadline is killed.

use super::{LayoutModel, LayoutModelConfig, LayoutRegion, LayoutUnavailable};
use crate::{DetectError, DetectResult, PageImage};
use catseg_core::Block;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct WireRegion {
    label: String,
    bbox: [f64; 4],
    #[serde(default = "full_score")]
    score: f32,
}

fn full_score() -> f32 {
    1.0
}

/// External-program layout model
#[derive(Debug, Clone)]
pub struct CommandLayoutModel {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandLayoutModel {
    /// Resolve the program and weights named by `config`
    pub fn load(config: &LayoutModelConfig) -> Result<Self, LayoutUnavailable> {
        let program = config
            .program
            .as_ref()
            .ok_or(LayoutUnavailable::NotConfigured)?;
        let resolved = resolve_program(program)
            .ok_or_else(|| LayoutUnavailable::ProgramNotFound(program.clone()))?;

        let mut args = config.args.clone();
        if let Some(weights) = &config.weights {
            if !weights.is_file() {
                return Err(LayoutUnavailable::WeightsNotFound(weights.clone()));
            }
            args.push("--weights".to_string());
            args.push(weights.display().to_string());
        }

        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());

        Ok(Self {
            name,
            program: resolved,
            args,
            timeout: Duration::from_millis(config.timeout_ms.max(1)),
        })
    }

    fn model_error(&self, message: impl Into<String>) -> DetectError {
        DetectError::Model {
            model: self.name.clone(),
            message: message.into(),
        }
    }

    fn page_path<'a>(&self, page: &'a PageImage) -> DetectResult<&'a Path> {
        page.path()
            .ok_or_else(|| self.model_error(format!("page '{}' has no source file", page.name())))
    }

    fn run(&self, extra: &[String]) -> DetectResult<Vec<LayoutRegion>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.model_error(format!("spawn failed: {}", e)))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    kill(&mut child);
                    return Err(DetectError::Timeout {
                        what: format!("layout model '{}'", self.name),
                        after: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill(&mut child);
                    return Err(self.model_error(format!("wait failed: {}", e)));
                }
            }
        };

        let out = stdout
            .recv_timeout(DRAIN_TIMEOUT)
            .map_err(|_| self.model_error("stdout not closed after exit"))?;
        if !status.success() {
            let err = stderr.recv_timeout(DRAIN_TIMEOUT).unwrap_or_default();
            let err = String::from_utf8_lossy(&err);
            return Err(self.model_error(format!("{}: {}", status, err.trim())));
        }

        debug!(model = %self.name, bytes = out.len(), elapsed = ?started.elapsed(), "layout model ran");
        parse_regions(&out).map_err(|e| self.model_error(format!("bad output: {}", e)))
    }
}

impl LayoutModel for CommandLayoutModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect_layout(&self, page: &PageImage) -> DetectResult<Vec<LayoutRegion>> {
        let path = self.page_path(page)?;
        self.run(&[path.display().to_string()])
    }

    fn recognize_structure(
        &self,
        page: &PageImage,
        table: &Block,
    ) -> DetectResult<Vec<LayoutRegion>> {
        let path = self.page_path(page)?;
        self.run(&[
            "--structure".to_string(),
            path.display().to_string(),
            table.x.to_string(),
            table.y.to_string(),
            table.w.to_string(),
            table.h.to_string(),
        ])
    }
}

/// Parse the JSON region list printed by the model program
pub(crate) fn parse_regions(bytes: &[u8]) -> Result<Vec<LayoutRegion>, serde_json::Error> {
    let wire: Vec<WireRegion> = serde_json::from_slice(bytes)?;
    Ok(wire
        .into_iter()
        .map(|r| {
            let [x, y, w, h] = r.bbox.map(|v| v.round() as i32);
            LayoutRegion::new(r.label, Block::new_unchecked(x, y, w.max(0), h.max(0)), r.score)
        })
        .collect())
}

/// Read a pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    } else {
        let _ = tx.send(Vec::new());
    }
    rx
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Find `program` directly when it has a directory part, else on `PATH`.
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regions() {
        let json = br#"[
            {"label": "table", "bbox": [10.4, 20.6, 100, 50], "score": 0.9},
            {"label": "text", "bbox": [0, 0, 5, 5]}
        ]"#;
        let regions = parse_regions(json).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].bbox, Block::new_unchecked(10, 21, 100, 50));
        assert_eq!(regions[1].score, 1.0);
        assert!(parse_regions(b"{not json").is_err());
    }

    #[test]
    fn test_missing_program() {
        let config = LayoutModelConfig {
            program: Some(PathBuf::from("/nonexistent/dir/layout-model")),
            ..LayoutModelConfig::default()
        };
        assert!(matches!(
            CommandLayoutModel::load(&config),
            Err(LayoutUnavailable::ProgramNotFound(_))
        ));
    }
}
