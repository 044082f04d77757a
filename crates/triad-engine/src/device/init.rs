/// Initialization parameters for the GL context.
///
/// Keep this structure minimal. Add flags only when a concrete platform
/// requirement exists.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlInit {
    /// Requested `(major, minor)` OpenGL version. A core profile is always requested.
    pub version: (u8, u8),

    /// Synchronize buffer swaps with the display refresh.
    ///
    /// A driver refusing the swap interval is logged and otherwise ignored.
    pub vsync: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            version: (3, 3),
            vsync: true,
        }
    }
}
