use spinlab_render::{ModelRequest, Primitive, RenderError};
use std::path::Path;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_HEADER_LEN: usize = 12;

/// Fixed header of a binary glTF container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    /// Total file length declared by the header.
    pub length: u32,
}

pub fn parse_glb_header(bytes: &[u8]) -> Result<GlbHeader, String> {
    if bytes.len() < GLB_HEADER_LEN {
        return Err(format!("{} bytes is too short for a GLB header", bytes.len()));
    }
    if &bytes[0..4] != GLB_MAGIC {
        return Err("missing glTF magic".into());
    }
    let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    let header = GlbHeader {
        version: word(4),
        length: word(8),
    };
    if header.version != 2 {
        return Err(format!("unsupported GLB version {}", header.version));
    }
    if header.length as usize > bytes.len() {
        return Err(format!(
            "header declares {} bytes, file has {}",
            header.length,
            bytes.len()
        ));
    }
    Ok(header)
}

pub fn load_glb(path: &Path) -> Result<GlbHeader, RenderError> {
    let model_error = |reason: String| RenderError::ModelLoad {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| model_error(e.to_string()))?;
    parse_glb_header(&bytes).map_err(model_error)
}

/// Stand-in geometry drawn where a requested model was accepted.
pub fn placeholder(request: &ModelRequest) -> Primitive {
    tracing::debug!(path = %request.path.display(), "drawing model placeholder");
    Primitive::cube(2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glb(version: u32, length: u32, total: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(GLB_MAGIC);
        bytes.extend_from_slice(&version.to_le_bytes());
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.resize(total, 0);
        bytes
    }

    #[test]
    fn accepts_version_two() {
        let header = parse_glb_header(&glb(2, 20, 20)).unwrap();
        assert_eq!(header, GlbHeader { version: 2, length: 20 });
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = glb(2, 12, 12);
        bytes[0] = b'x';
        assert!(parse_glb_header(&bytes).unwrap_err().contains("magic"));
    }

    #[test]
    fn rejects_other_versions() {
        assert!(parse_glb_header(&glb(1, 12, 12)).unwrap_err().contains("version 1"));
    }

    #[test]
    fn rejects_truncated_files() {
        assert!(parse_glb_header(b"glTF").is_err());
        assert!(parse_glb_header(&glb(2, 100, 16)).is_err());
    }

    #[test]
    fn missing_file_is_model_error() {
        let err = load_glb(Path::new("/nonexistent/astronaut.glb")).unwrap_err();
        assert!(matches!(err, RenderError::ModelLoad { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.glb");
        std::fs::write(&path, glb(2, 24, 24)).unwrap();
        assert_eq!(load_glb(&path).unwrap().length, 24);
    }
}
