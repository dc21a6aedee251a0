//! Rasterizer for scanned PDFs: pulls the page image straight out of the file.
//!
//! A scanned receipt is a page whose only content is one big image XObject.
//! Decoding that image gives the scan at its native resolution without an
//! external renderer.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Rgb};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfRasterizer, Result};
use crate::error::PdfError;

/// Returns the largest decodable image on the first page.
#[derive(Debug, Default)]
pub struct EmbeddedImageRasterizer;

impl EmbeddedImageRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn load(data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.is_encrypted() && doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        Ok(doc)
    }

    /// Resources of a page, following `Parent` links for inherited entries.
    fn page_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;
        loop {
            let Object::Dictionary(dict) = doc.get_object(node_id).ok()? else {
                return None;
            };
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => node_id = *parent_id,
                _ => return None,
            }
        }
    }

    fn decode_image(doc: &Document, obj: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;
        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
        let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
        trace!("Found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                _ => None,
            };
            match filter_name {
                Some(b"DCTDecode") => {
                    return image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                        .ok();
                }
                Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("Skipping image with unsupported filter");
                    return None;
                }
                _ => {}
            }
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);
        if bits != 8 {
            trace!("Unsupported bits per component: {}", bits);
            return None;
        }

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let pixels = (width as usize) * (height as usize);
        match color_space {
            b"DeviceGray" | b"G" if data.len() >= pixels => {
                GrayImage::from_raw(width, height, data[..pixels].to_vec())
                    .map(DynamicImage::ImageLuma8)
            }
            b"DeviceRGB" | b"RGB" if data.len() >= pixels * 3 => {
                ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data[..pixels * 3].to_vec())
                    .map(DynamicImage::ImageRgb8)
            }
            _ => {
                trace!(
                    "Could not decode image: colorspace={:?}, data_len={}",
                    String::from_utf8_lossy(color_space),
                    data.len()
                );
                None
            }
        }
    }
}

impl PdfRasterizer for EmbeddedImageRasterizer {
    fn first_page(&self, path: &Path) -> Result<DynamicImage> {
        let data = std::fs::read(path)?;
        let doc = Self::load(&data)?;

        let pages = doc.get_pages();
        let (_, &page_id) = pages.iter().next().ok_or(PdfError::NoPages)?;

        let resources = Self::page_resources(&doc, page_id).ok_or(PdfError::NoImage(1))?;
        let Ok(Object::Dictionary(xobjects)) = resources
            .get(b"XObject")
            .and_then(|o| doc.dereference(o).map(|(_, obj)| obj))
        else {
            return Err(PdfError::NoImage(1));
        };

        let mut best: Option<DynamicImage> = None;
        for (_, value) in xobjects.iter() {
            let Ok((_, obj)) = doc.dereference(value) else {
                continue;
            };
            if let Some(img) = Self::decode_image(&doc, obj) {
                let area = u64::from(img.width()) * u64::from(img.height());
                let best_area = best
                    .as_ref()
                    .map(|b| u64::from(b.width()) * u64::from(b.height()))
                    .unwrap_or(0);
                if area > best_area {
                    best = Some(img);
                }
            }
        }

        let img = best.ok_or(PdfError::NoImage(1))?;
        debug!(
            "Extracted {}x{} page image from {}",
            img.width(),
            img.height(),
            path.display()
        );
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    fn scanned_pdf(images: &[(i64, i64)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut xobjects = Dictionary::new();
        for (i, &(w, h)) in images.iter().enumerate() {
            let pixels = vec![200u8; (w * h) as usize];
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => w,
                    "Height" => h,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                pixels,
            );
            let image_id = doc.add_object(image);
            xobjects.set(format!("Im{}", i), image_id);
        }

        let resources_id = doc.add_object(dictionary! { "XObject" => xobjects });
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q /Im0 Do Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        // Resources live on the page tree node and are inherited by the page.
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_largest_image_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.pdf");
        std::fs::write(&path, scanned_pdf(&[(4, 3), (10, 8), (6, 6)])).unwrap();

        let img = EmbeddedImageRasterizer::new().first_page(&path).unwrap();
        assert_eq!((img.width(), img.height()), (10, 8));
    }

    #[test]
    fn test_page_without_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.pdf");
        std::fs::write(&path, scanned_pdf(&[])).unwrap();

        let err = EmbeddedImageRasterizer::new().first_page(&path).unwrap_err();
        assert!(matches!(err, PdfError::NoImage(1)));
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = EmbeddedImageRasterizer::new().first_page(&path).unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EmbeddedImageRasterizer::new()
            .first_page(Path::new("/nonexistent/receipt.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}
