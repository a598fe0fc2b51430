use std::ffi::c_void;
use std::path::Path;

use anyhow::Context;
use image::DynamicImage;

use crate::renderer::gl;

/// A mipmapped 2D texture decoded from an image file.
pub struct Texture2D {
    pub texture: gl::types::GLuint,
    pub width: u32,
    pub height: u32,
}

impl Texture2D {
    /// Decodes the image at `path` and uploads it.
    ///
    /// `filter` is used for both minification and magnification (e.g.
    /// `gl::LINEAR` or `gl::NEAREST`), and `internal_format` is the format
    /// the texture is stored in on the GPU (e.g. `gl::RGBA8`).
    pub fn from_file(
        path: &Path,
        flip: bool,
        filter: gl::types::GLenum,
        internal_format: gl::types::GLenum,
    ) -> anyhow::Result<Texture2D> {
        let image = image::open(path)
            .with_context(|| format!("could not decode texture {}", path.display()))?;
        let image = if flip { image.flipv() } else { image };
        let (format, width, height, pixels) = pixel_data(image);

        let mut texture = 0;
        gl::call!(gl::GenTextures(1, &mut texture));
        gl::call!(gl::BindTexture(gl::TEXTURE_2D, texture));
        gl::call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter as i32));
        gl::call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter as i32));
        // Rows of 1 and 3 channel images are not 4-byte aligned.
        gl::call!(gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1));
        gl::call!(gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            internal_format as i32,
            width as i32,
            height as i32,
            0,
            format,
            gl::UNSIGNED_BYTE,
            pixels.as_ptr() as *const c_void,
        ));
        gl::call!(gl::GenerateMipmap(gl::TEXTURE_2D));
        gl::call!(gl::BindTexture(gl::TEXTURE_2D, 0));

        log::info!("Loaded texture {} ({width}x{height})", path.display());
        Ok(Texture2D {
            texture,
            width,
            height,
        })
    }

    pub fn set_active(&self, unit: u32) {
        gl::call!(gl::ActiveTexture(gl::TEXTURE0 + unit));
        gl::call!(gl::BindTexture(gl::TEXTURE_2D, self.texture));
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        gl::call!(gl::DeleteTextures(1, &self.texture));
    }
}

/// Returns the GL pixel format matching the image's channels, along with the
/// 8-bit pixel data. Formats without an 8-bit GL counterpart become RGBA.
fn pixel_data(image: DynamicImage) -> (gl::types::GLenum, u32, u32, Vec<u8>) {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(image) => (gl::RED, width, height, image.into_raw()),
        DynamicImage::ImageLumaA8(image) => (gl::RG, width, height, image.into_raw()),
        DynamicImage::ImageRgb8(image) => (gl::RGB, width, height, image.into_raw()),
        DynamicImage::ImageRgba8(image) => (gl::RGBA, width, height, image.into_raw()),
        image => (gl::RGBA, width, height, image.into_rgba8().into_raw()),
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, RgbImage};

    use super::*;

    #[test]
    fn pixel_format_follows_channels() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 3));
        let (format, width, height, pixels) = pixel_data(gray);
        assert_eq!((format, width, height, pixels.len()), (gl::RED, 2, 3, 6));

        let rgb = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let (format, _, _, pixels) = pixel_data(rgb);
        assert_eq!((format, pixels.len()), (gl::RGB, 12));

        let wide = DynamicImage::ImageRgb16(image::ImageBuffer::new(1, 1));
        let (format, _, _, pixels) = pixel_data(wide);
        assert_eq!((format, pixels.len()), (gl::RGBA, 4));
    }
}
