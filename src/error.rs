use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open video: {0}")]
    SourceOpen(String),

    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("unknown tracking algorithm `{0}` (expected one of: kcf, csrt, mil)")]
    UnknownAlgorithm(String),

    #[error("failed to load overlay image {path}: {source}")]
    OverlayLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("raster shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "opencv")]
    #[error("OpenCV Error: {0}")]
    OpenCv(#[from] opencv::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::UnknownAlgorithm(_) => 2,
            Error::SourceOpen(_) => 3,
            _ => 1,
        }
    }
}
