use image::{Rgba, RgbaImage};
use spinlab_render::RenderError;
use std::path::Path;

/// Decode an image file into RGBA rows with the bottom row first, so that
/// texture coordinate (0, 0) addresses the lower-left corner of the picture.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, RenderError> {
    let decoded = image::open(path)
        .map_err(|e| RenderError::Texture(format!("{}: {e}", path.display())))?;
    Ok(image::imageops::flip_vertical(&decoded.to_rgba8()))
}

/// Grey checkerboard with `cells` squares per side.
pub fn checker(size: u32, cells: u32) -> RgbaImage {
    let size = size.max(1);
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([200, 200, 200, 255])
        } else {
            Rgba([60, 60, 60, 255])
        }
    })
}

/// The texture at `path`, or a checkerboard if it cannot be read.
pub fn load_or_checker(path: &Path) -> RgbaImage {
    load_rgba(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using checker texture");
        checker(256, 8)
    })
}

/// Upload an RGBA image as a single-mip sRGB texture.
pub fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
) -> wgpu::Texture {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_alternates() {
        let img = checker(64, 8);
        assert_eq!(img.dimensions(), (64, 64));
        assert_ne!(img.get_pixel(0, 0), img.get_pixel(8, 0));
        assert_eq!(img.get_pixel(0, 0), img.get_pixel(8, 8));
    }

    #[test]
    fn missing_file_is_texture_error() {
        let err = load_rgba(Path::new("/nonexistent/skybox.png")).unwrap_err();
        assert!(matches!(err, RenderError::Texture(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn missing_file_falls_back_to_checker() {
        let img = load_or_checker(Path::new("/nonexistent/skybox.png"));
        assert_eq!(img.dimensions(), (256, 256));
    }

    #[test]
    fn loaded_rows_are_flipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_rows.png");
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*loaded.get_pixel(0, 1), Rgba([255, 0, 0, 255]));
    }
}
