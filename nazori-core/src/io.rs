//! # Bitmap import/export
//!
//! The only crossing between live pixels and a storable form. Snapshots are 8-bit RGBA PNGs, so
//! `draw_blob_to_canvas(canvas_to_blob(canvas))` reproduces the canvas up to premultiplication rounding
//! on partially transparent pixels. Opaque and fully transparent pixels round-trip exactly.

use crate::{canvas::Canvas, geometry::Size};

/// Side length of the image a brand new drawing starts from.
pub const EMPTY_CANVAS_SIZE: u32 = 512;

/// An encoded bitmap. Opaque to everything but this module; cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Blob(std::sync::Arc<[u8]>);
impl Blob {
    #[must_use]
    pub fn from_bytes(bytes: impl Into<std::sync::Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// An opaque white image of the given size.
    /// # Errors
    /// If the size has no area.
    pub fn blank(size: Size) -> Result<Self, CodecError> {
        let mut pixmap = tiny_skia::Pixmap::new(size.width, size.height)
            .ok_or(CodecError::BadDimensions(size))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        canvas_to_blob(&Canvas::from_pixmap(pixmap))
    }
}
impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blob({})", human_bytes::human_bytes(self.0.len() as f64))
    }
}
impl serde::Serialize for Blob {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(&self.0))
    }
}
impl<'de> serde::Deserialize<'de> for Blob {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use base64::Engine;
        let string = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(string.as_bytes())
            .map(Self::from_bytes)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("failed to decode png: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported png layout {0:?}")]
    Unsupported(png::ColorType),
    #[error("image dimensions {}x{} unusable", .0.width, .0.height)]
    BadDimensions(Size),
}

/// Encode the whole canvas as a PNG.
/// # Errors
/// Forwarded from the encoder.
pub fn canvas_to_blob(canvas: &Canvas) -> Result<Blob, CodecError> {
    let pixmap = canvas.pixmap();
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
        writer.finish()?;
    }
    log::trace!(
        "Encoded {}x{} snapshot into {}",
        pixmap.width(),
        pixmap.height(),
        human_bytes::human_bytes(bytes.len() as f64)
    );
    Ok(Blob::from_bytes(bytes))
}

/// Decode a blob into a premultiplied pixmap of its own size.
fn decode(blob: &Blob) -> Result<tiny_skia::Pixmap, CodecError> {
    let mut decoder = png::Decoder::new(std::io::Cursor::new(blob.as_bytes()));
    // Palette -> RGB(A), 16 -> 8 bit. Leaves us with only four layouts to handle.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buffer = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buffer)?;
    let data = &buffer[..info.buffer_size()];
    let size = Size::new(info.width, info.height);

    let rgba: Vec<[u8; 4]> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], 0xff])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&l| [l, l, l, 0xff]).collect(),
        other @ png::ColorType::Indexed => return Err(CodecError::Unsupported(other)),
    };

    let mut premultiplied = Vec::with_capacity(rgba.len() * 4);
    for [r, g, b, a] in rgba {
        let color = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
        premultiplied.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    let int_size = tiny_skia::IntSize::from_wh(size.width, size.height)
        .ok_or(CodecError::BadDimensions(size))?;
    tiny_skia::Pixmap::from_vec(premultiplied, int_size).ok_or(CodecError::BadDimensions(size))
}

/// Clear the canvas and draw the decoded blob at the origin. Parts of the image that don't fit are dropped.
/// # Errors
/// If the blob is not a readable PNG. The canvas is not touched in that case.
pub fn draw_blob_to_canvas(canvas: &mut Canvas, blob: &Blob) -> Result<(), CodecError> {
    let pixmap = decode(blob)?;
    canvas.replace_contents(&pixmap);
    Ok(())
}

/// Decode a blob into a fresh canvas of the image's own size.
/// # Errors
/// If the blob is not a readable PNG.
pub fn blob_to_canvas(blob: &Blob) -> Result<Canvas, CodecError> {
    decode(blob).map(Canvas::from_pixmap)
}
