use crate::error::Error;

use ndarray::aview1;
use ndarray::prelude::*;
use std::path::Path;

/// Decoded video frame: 8-bit BGR, laid out as (rows, cols, channel).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub data: Array3<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, 3)),
        }
    }

    pub fn filled(width: usize, height: usize, bgr: [u8; 3]) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill(bgr);
        frame
    }

    pub fn from_bgr_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self, Error> {
        Ok(Self {
            data: Array3::from_shape_vec((height, width, 3), data)?,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let px = self.data.slice(s![y, x, ..]);
        [px[0], px[1], px[2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, bgr: [u8; 3]) {
        for (dst, src) in self.data.slice_mut(s![y, x, ..]).iter_mut().zip(bgr) {
            *dst = src;
        }
    }

    pub fn fill(&mut self, bgr: [u8; 3]) {
        for mut px in self.data.lanes_mut(Axis(2)) {
            px.assign(&aview1(&bgr));
        }
    }

    /// Contiguous BGR bytes, row-major.
    pub fn to_bgr_vec(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}

/// Overlay raster: 8-bit BGRA, same channel order as [`Frame`] plus alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayImage {
    pub data: Array3<u8>,
}

impl OverlayImage {
    /// Loads an image file; formats without alpha become fully opaque.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::OverlayLoad {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self::from_rgba(&img.to_rgba8()))
    }

    pub fn from_rgba(img: &image::RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let data = Array3::from_shape_fn((h as usize, w as usize, 4), |(y, x, c)| {
            let px = img.get_pixel(x as u32, y as u32).0;
            match c {
                0 => px[2],
                1 => px[1],
                2 => px[0],
                _ => px[3],
            }
        });

        Self { data }
    }

    pub fn filled(width: usize, height: usize, bgra: [u8; 4]) -> Self {
        let mut data = Array3::zeros((height, width, 4));
        for mut px in data.lanes_mut(Axis(2)) {
            px.assign(&aview1(&bgra));
        }

        Self { data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_swizzled_to_bgra() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 40]));
        let overlay = OverlayImage::from_rgba(&img);

        assert_eq!(overlay.width(), 3);
        assert_eq!(overlay.height(), 2);
        assert_eq!(overlay.data.slice(s![1, 2, ..]).to_vec(), vec![30, 20, 10, 40]);
    }

    #[test]
    fn frame_shape_is_checked() {
        assert!(Frame::from_bgr_vec(2, 2, vec![0; 12]).is_ok());
        assert!(Frame::from_bgr_vec(2, 2, vec![0; 11]).is_err());
    }

    #[test]
    fn fill_sets_every_pixel() {
        let frame = Frame::filled(4, 3, [1, 2, 3]);

        assert_eq!(frame.pixel(3, 2), [1, 2, 3]);
        assert_eq!(frame.pixel(0, 0), [1, 2, 3]);
    }
}
