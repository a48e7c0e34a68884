//! PNG embedding
//!
//! Decodes PNG data and places each image on its own page, sized to the
//! image's pixel dimensions. PNG is the only supported encoding.

use crate::builder::OutputDocument;
use crate::error::StitchError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Object, Stream};
use std::io::{Cursor, Write};

/// Raw 8-bit samples of a decoded image, alpha split out
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub color: ColorModel,
    /// Color samples, row-major, no padding
    pub pixels: Vec<u8>,
    /// One alpha sample per pixel when the source had transparency
    pub alpha: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray,
    Rgb,
}

impl ColorModel {
    fn color_space(self) -> &'static [u8] {
        match self {
            ColorModel::Gray => b"DeviceGray",
            ColorModel::Rgb => b"DeviceRGB",
        }
    }
}

/// Decode a PNG file into 8-bit gray or RGB samples
pub fn decode_png(name: &str, bytes: &[u8]) -> Result<DecodedImage, StitchError> {
    let decode_err = |e: png::DecodingError| StitchError::ImageDecode {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette and sub-byte depths expand to 8 bits, tRNS becomes alpha
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(decode_err)?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(decode_err)?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(StitchError::ImageDecode {
            name: name.to_string(),
            reason: format!("unsupported bit depth {:?}", frame.bit_depth),
        });
    }

    let (color, pixels, alpha) = match frame.color_type {
        png::ColorType::Grayscale => (ColorModel::Gray, buf, None),
        png::ColorType::Rgb => (ColorModel::Rgb, buf, None),
        png::ColorType::GrayscaleAlpha => {
            let (pixels, alpha) = split_alpha(&buf, 1);
            (ColorModel::Gray, pixels, Some(alpha))
        }
        png::ColorType::Rgba => {
            let (pixels, alpha) = split_alpha(&buf, 3);
            (ColorModel::Rgb, pixels, Some(alpha))
        }
        png::ColorType::Indexed => {
            return Err(StitchError::ImageDecode {
                name: name.to_string(),
                reason: "indexed color was not expanded".into(),
            })
        }
    };

    Ok(DecodedImage {
        width: frame.width,
        height: frame.height,
        color,
        pixels,
        alpha,
    })
}

/// Decode one PNG and append it as a full-bleed page
pub fn embed_png(out: &mut OutputDocument, name: &str, bytes: &[u8]) -> Result<(), StitchError> {
    let image = decode_png(name, bytes)?;
    let (width, height) = (image.width as i64, image.height as i64);

    let doc = out.document_mut();

    let mut image_dict = image_xobject_dict(&image, image.color.color_space());
    if let Some(alpha) = &image.alpha {
        let mask = Stream::new(image_xobject_dict(&image, b"DeviceGray"), deflate(alpha)?)
            .with_compression(false);
        let mask_id = doc.add_object(mask);
        image_dict.set("SMask", Object::Reference(mask_id));
    }
    let image_id = doc.add_object(
        Stream::new(image_dict, deflate(&image.pixels)?).with_compression(false),
    );

    // Scale the unit square to the page, origin at the lower-left corner
    let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ", width, height);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page = Dictionary::from_iter(vec![
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);
    out.push_page(page);

    tracing::debug!(name, width, height, "embedded image page");
    Ok(())
}

/// Build a PDF from in-memory PNGs, one page per image
///
/// Returns the saved bytes together with the page count.
pub fn images_to_pdf(
    images: &[(String, Vec<u8>)],
    compress: bool,
) -> Result<(Vec<u8>, usize), StitchError> {
    if images.is_empty() {
        return Err(StitchError::NoImages);
    }

    let mut out = OutputDocument::new();
    for (name, bytes) in images {
        embed_png(&mut out, name, bytes)?;
    }
    let page_count = out.page_count();
    Ok((out.finish(compress)?, page_count))
}

fn image_xobject_dict(image: &DecodedImage, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(image.width as i64)),
        ("Height", Object::Integer(image.height as i64)),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ])
}

/// Split interleaved samples with a trailing alpha channel
fn split_alpha(samples: &[u8], color_channels: usize) -> (Vec<u8>, Vec<u8>) {
    let stride = color_channels + 1;
    let pixel_count = samples.len() / stride;
    let mut pixels = Vec::with_capacity(pixel_count * color_channels);
    let mut alpha = Vec::with_capacity(pixel_count);
    for chunk in samples.chunks_exact(stride) {
        pixels.extend_from_slice(&chunk[..color_channels]);
        alpha.push(chunk[color_channels]);
    }
    (pixels, alpha)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, StitchError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| StitchError::OperationError(format!("Compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| StitchError::OperationError(format!("Compression failed: {}", e)))
}
