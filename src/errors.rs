/// Errors raised while parsing the text formats used by the geometry types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("not a valid length for color code ({0}); only 3, 6 and 8 supported")]
    HexLength(usize),

    #[error("not a valid hex color code: {0}")]
    HexDigit(String),

    #[error("'{0}': not a valid coordinate string")]
    Point(String),

    #[error("'{0}': invalid resolution format, should be <width>x<height>")]
    Resolution(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The host asked the application to terminate. Not a crash.
    #[error("quit requested")]
    Quit,

    #[error("no bitmap data stored for {0}")]
    TextureNotFound(String),

    #[error("engine has not been set up")]
    NotInitialized,

    #[error("backend setup failed: {0}")]
    Setup(String),

    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl RenderError {
    /// Returns true when this is the quit signal rather than a failure.
    pub fn is_quit(&self) -> bool {
        matches!(self, RenderError::Quit)
    }
}
