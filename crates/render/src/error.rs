use std::path::PathBuf;

/// Errors raised while setting up or feeding a render backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(String),
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(String),
    #[error("error in {label} shader: {message}")]
    ShaderCompile { label: String, message: String },
    #[error("texture error: {0}")]
    Texture(String),
    #[error("failed to load model {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },
}

impl RenderError {
    /// Whether the demo has to stop. Model and texture failures are reported
    /// and the demo carries on without them.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ModelLoad { .. } | Self::Texture(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_errors_are_fatal() {
        let e = RenderError::ShaderCompile {
            label: "VERTEX".into(),
            message: "bad token".into(),
        };
        assert!(e.is_fatal());
        assert_eq!(e.to_string(), "error in VERTEX shader: bad token");
    }

    #[test]
    fn model_errors_are_not_fatal() {
        let e = RenderError::ModelLoad {
            path: "astronaut.glb".into(),
            reason: "missing".into(),
        };
        assert!(!e.is_fatal());
        assert!(e.to_string().contains("astronaut.glb"));
    }
}
