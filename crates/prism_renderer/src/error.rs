/// Error types for the renderer.
///
/// `IncompleteTarget`, `Compile` and `Link` are fatal at startup. `RuntimeState`
/// is reported per frame and never stops the loop.
use thiserror::Error;

use crate::graph::TargetId;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render target `{label}` is incomplete: {reason}")]
    IncompleteTarget { label: String, reason: Incomplete },

    #[error("shader `{label}` failed to compile: {log}")]
    Compile { label: String, log: String },

    #[error("pipeline `{label}` failed to link: {log}")]
    Link { label: String, log: String },

    #[error("invalid runtime state: {0}")]
    RuntimeState(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Why a render target cannot be drawn into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incomplete {
    #[error("zero-sized target ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("{width}x{height} exceeds the device limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },

    #[error("no colour attachment")]
    MissingColor,

    #[error("no depth/stencil attachment")]
    MissingDepthStencil,

    #[error("{attachment} attachment is {width}x{height}, target is {target_width}x{target_height}")]
    SizeMismatch {
        attachment: &'static str,
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("{0:?} is not a colour format")]
    BadColorFormat(wgpu::TextureFormat),

    #[error("{0:?} is not a combined depth/stencil format")]
    BadDepthStencilFormat(wgpu::TextureFormat),

    #[error("backend rejected the attachments: {0}")]
    Backend(String),

    #[error("target has been destroyed")]
    Destroyed,
}

/// Pass-ordering violations, detected when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("pass `{pass}` reads {input:?} before any earlier pass writes it")]
    InputNotWritten { pass: String, input: TargetId },

    #[error("pass `{pass}` reads its own target {target:?}")]
    ReadsOwnTarget { pass: String, target: TargetId },

    #[error("{target:?} is written by both `{first}` and `{second}`")]
    MultipleWriters {
        target: TargetId,
        first: String,
        second: String,
    },

    #[error("pass `{pass}` uses offscreen target {index}, but only {count} exist")]
    UnknownTarget { pass: String, index: usize, count: usize },
}
