pub mod software;

/// Browser canvas backend
#[cfg(feature = "backend_canvas")]
pub mod canvas;
