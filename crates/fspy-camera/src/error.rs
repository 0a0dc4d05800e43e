/// Error types for the camera module.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The state has no `cameraParameters` section.
    #[error("No camera parameters found")]
    MissingCameraParameters,

    /// The state JSON does not have the expected shape.
    #[error("Invalid camera state: {0}")]
    InvalidState(#[source] serde_json::Error),

    /// Failed to read the fSpy container.
    #[error(transparent)]
    Container(#[from] fspy_io::FspyError),

    /// The up axis name is not one of `X`, `Y`, `Z`, `-X`, `-Y`, `-Z`.
    #[error("Unknown up axis: {0}")]
    UnknownUpAxis(String),

    /// The host scene rejected an operation.
    #[error("Scene graph operation failed: {0}")]
    Scene(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CameraError {
    pub(crate) fn scene<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CameraError::Scene(Box::new(err))
    }
}
