use image::ImageFormat;
use macroquad::texture::{FilterMode, Texture2D};
use scroller_rendering::RenderingError;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Rejects payloads that are not PNG encoded.
pub(crate) fn check_png_signature(bytes: &[u8]) -> Result<(), RenderingError> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        Ok(())
    } else {
        Err(RenderingError::InvalidSprite {
            reason: format!("missing PNG signature in {} byte payload", bytes.len()),
        })
    }
}

/// Sprite pixels ready for upload.
#[derive(Debug)]
pub(crate) struct DecodedSprite {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) rgba: Vec<u8>,
}

/// Decodes PNG bytes into RGBA pixels without touching the GPU.
pub(crate) fn decode_sprite(bytes: &[u8]) -> Result<DecodedSprite, RenderingError> {
    check_png_signature(bytes)?;
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|error| RenderingError::InvalidSprite {
            reason: error.to_string(),
        })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    let (Ok(width), Ok(height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(RenderingError::InvalidSprite {
            reason: format!("{width}x{height} exceeds the texture size limit"),
        });
    };
    Ok(DecodedSprite {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Creates the sprite texture from PNG bytes.
///
/// Requires an active macroquad context.
pub(crate) fn load_sprite(bytes: &[u8]) -> Result<Texture2D, RenderingError> {
    let sprite = decode_sprite(bytes)?;
    let texture = Texture2D::from_rgba8(sprite.width, sprite.height, &sprite.rgba);
    texture.set_filter(FilterMode::Linear);
    Ok(texture)
}
