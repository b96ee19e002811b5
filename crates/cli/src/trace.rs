use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sketchfit::input::PointerEvent;
use sketchfit::session::SessionCfg;
use std::fs;
use std::io::Write;
use std::path::Path;

/// A recorded or synthesized pointer-event stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub label: Option<String>,
    pub events: Vec<PointerEvent>,
}

/// Accepted on-disk layouts: `{"events": [...]}` or a bare event array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TraceFile {
    Wrapped(Trace),
    Bare(Vec<PointerEvent>),
}

pub fn load_trace(path: &Path) -> Result<Trace> {
    let bytes = fs::read(path).with_context(|| format!("reading trace {}", path.display()))?;
    let file: TraceFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing trace {}", path.display()))?;
    Ok(match file {
        TraceFile::Wrapped(trace) => trace,
        TraceFile::Bare(events) => Trace {
            label: None,
            events,
        },
    })
}

/// Session configuration from `path`, or the defaults. Missing fields take
/// their default values.
pub fn load_cfg(path: Option<&Path>) -> Result<SessionCfg> {
    let Some(path) = path else {
        return Ok(SessionCfg::default());
    };
    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
}

/// Pretty JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            fs::write(path, body).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}
