//! BMP texture loading.

use glow::HasContext as _;
use std::path::Path;

use crate::util::{Error, Result};

/// Decoded RGB8 image, rows ordered bottom to top to match GL's
/// bottom-left texture origin.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl TextureImage {
    pub fn decode_bmp(path: &Path) -> Result<Self> {
        use image::{ImageFormat, ImageReader};

        let decode_err = |message: String| Error::TextureDecode {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = ImageReader::open(path).map_err(|e| decode_err(e.to_string()))?;
        reader.set_format(ImageFormat::Bmp);
        let img = reader.decode().map_err(|e| decode_err(e.to_string()))?;

        let rgb = img.flipv().into_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(decode_err("image has no pixels".into()));
        }

        Ok(Self {
            width,
            height,
            rgb: rgb.into_raw(),
        })
    }

    /// Row `y` (0 = bottom) as packed RGB triples, `None` past the top.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        self.rgb.get(start..start + stride)
    }
}

/// Upload an image as a repeating, mipmapped 2D texture.
pub fn upload_texture(gl: &glow::Context, image: &TextureImage) -> Result<glow::Texture> {
    let width = i32::try_from(image.width).map_err(|_| Error::other("texture too wide"))?;
    let height = i32::try_from(image.height).map_err(|_| Error::other("texture too tall"))?;

    unsafe {
        let texture = gl.create_texture().map_err(Error::Gl)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGB8 as i32,
            width,
            height,
            0,
            glow::RGB,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(image.rgb.as_slice())),
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl.generate_mipmap(glow::TEXTURE_2D);
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
        gl.bind_texture(glow::TEXTURE_2D, None);
        super::check_gl(gl, "upload_texture");
        Ok(texture)
    }
}

/// Decode and upload `path`. Failures are logged and yield `None`; the plane
/// still draws without the texture.
pub fn load_texture(gl: &glow::Context, path: &Path) -> Option<glow::Texture> {
    let result = TextureImage::decode_bmp(path).and_then(|image| {
        tracing::info!("loaded texture {} ({}x{})", path.display(), image.width, image.height);
        upload_texture(gl, &image)
    });
    match result {
        Ok(texture) => Some(texture),
        Err(e) => {
            tracing::warn!("texture {} unavailable: {}", path.display(), e);
            None
        }
    }
}
