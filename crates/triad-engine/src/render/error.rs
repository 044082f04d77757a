use std::fmt;

use thiserror::Error;

use super::uniform::UniformKind;

/// Step of program creation that failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStep {
    VertexCompile,
    FragmentCompile,
    ProgramLink,
}

impl fmt::Display for ShaderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStep::VertexCompile => "vertex shader compile",
            ShaderStep::FragmentCompile => "fragment shader compile",
            ShaderStep::ProgramLink => "program link",
        })
    }
}

/// Shader compile or program link failure.
///
/// `reason` is the driver diagnostic log, at most [`ProgramError::MAX_REASON_LEN`] bytes.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{step} failed: {reason}")]
pub struct ProgramError {
    pub step: ShaderStep,
    pub reason: String,
}

impl ProgramError {
    pub const MAX_REASON_LEN: usize = 512;

    pub(crate) fn new(step: ShaderStep, log: impl Into<String>) -> Self {
        Self {
            step,
            reason: truncate_log(log.into(), Self::MAX_REASON_LEN),
        }
    }
}

/// Trims trailing NULs/whitespace and cuts the log to `max` bytes on a char boundary.
fn truncate_log(mut log: String, max: usize) -> String {
    if log.len() > max {
        let mut end = max;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    let trimmed = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()).len();
    log.truncate(trimmed);
    log
}

/// Vertex upload rejected before any data reached the driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum VertexBufferError {
    #[error("buffer size {buffer_size} is not a multiple of the descriptor stride {stride}")]
    InvalidBufferSizeForDescriptors { buffer_size: usize, stride: usize },

    #[error("attribute descriptor list is empty")]
    EmptyDescriptorArray,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UniformError {
    /// The linked program has no active uniform with this name.
    #[error("uniform `{name}` is not an active uniform of the program")]
    NotFound { name: String },

    /// The name already owns a slot; `kind` is the kind it was first bound as.
    #[error("uniform `{name}` is already bound as {kind:?}")]
    BoundAlready { name: String, kind: UniformKind },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum TextureError {
    #[error("texture dimensions must be in 1..=i32::MAX, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("mip level {0} exceeds i32::MAX")]
    InvalidMipLevel(u32),

    #[error("pixel data is {actual} bytes, expected {expected}")]
    PixelDataSize { expected: usize, actual: usize },
}

/// The driver refused to create a GL object.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("failed to create {object}: {reason}")]
pub struct ResourceError {
    pub object: &'static str,
    pub reason: String,
}

impl ResourceError {
    pub(crate) fn new(object: &'static str, reason: impl Into<String>) -> Self {
        Self {
            object,
            reason: reason.into(),
        }
    }
}

/// Texture creation failure: invalid input or driver refusal.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CreateTextureError {
    #[error(transparent)]
    Invalid(#[from] TextureError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_truncated_to_512_bytes() {
        let err = ProgramError::new(ShaderStep::ProgramLink, "x".repeat(2000));
        assert_eq!(err.reason.len(), 512);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 511 ASCII bytes followed by a 2-byte char straddling the limit.
        let log = format!("{}é", "a".repeat(511));
        let err = ProgramError::new(ShaderStep::VertexCompile, log);
        assert_eq!(err.reason.len(), 511);
    }

    #[test]
    fn trailing_nuls_and_newlines_are_trimmed() {
        let err = ProgramError::new(ShaderStep::FragmentCompile, "0:1: error\n\0\0");
        assert_eq!(err.reason, "0:1: error");
    }

    #[test]
    fn display_names_the_step() {
        let err = ProgramError::new(ShaderStep::VertexCompile, "bad");
        assert_eq!(err.to_string(), "vertex shader compile failed: bad");
    }
}
