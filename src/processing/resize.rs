use fast_image_resize as fir;
use image::RgbaImage;

use crate::config::ResizeFilter;
use crate::error::Error;

impl ResizeFilter {
    fn algorithm(self) -> fir::ResizeAlg {
        match self {
            Self::Nearest => fir::ResizeAlg::Nearest,
            Self::Bilinear => fir::ResizeAlg::Convolution(fir::FilterType::Bilinear),
            Self::CatmullRom => fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom),
            Self::Lanczos3 => fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3),
        }
    }
}

/// Resample `source` to exactly `target_w`×`target_h`.
pub fn resize_rgba(
    source: &RgbaImage,
    target_w: u32,
    target_h: u32,
    filter: ResizeFilter,
) -> Result<RgbaImage, Error> {
    if target_w == 0 || target_h == 0 {
        return Err(Error::Resize("resize dimensions must be positive".into()));
    }
    if source.width() == target_w && source.height() == target_h {
        return Ok(source.clone());
    }

    let src_view = fir::images::ImageRef::new(
        source.width(),
        source.height(),
        source.as_raw(),
        fir::PixelType::U8x4,
    )
    .map_err(|e| Error::Resize(format!("source view: {e}")))?;
    let mut dst_image = fir::images::Image::new(target_w, target_h, fir::PixelType::U8x4);
    let options = fir::ResizeOptions::new().resize_alg(filter.algorithm());
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&options))
        .map_err(|e| Error::Resize(e.to_string()))?;
    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| Error::Resize("resized buffer has unexpected length".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn downsamples_to_requested_size() {
        let src = RgbaImage::from_pixel(300, 200, Rgba([10, 20, 30, 255]));
        for filter in [
            ResizeFilter::Nearest,
            ResizeFilter::Bilinear,
            ResizeFilter::CatmullRom,
            ResizeFilter::Lanczos3,
        ] {
            let out = resize_rgba(&src, 128, 85, filter).unwrap();
            assert_eq!(out.dimensions(), (128, 85), "filter {filter}");
            let px = out.get_pixel(64, 40).0;
            for (got, want) in px.iter().zip([10u8, 20, 30, 255]) {
                assert!(got.abs_diff(want) <= 1, "filter {filter}: {px:?}");
            }
        }
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 4]));
        let out = resize_rgba(&src, 4, 3, ResizeFilter::default()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = RgbaImage::new(4, 4);
        assert!(matches!(
            resize_rgba(&src, 0, 4, ResizeFilter::default()),
            Err(Error::Resize(_))
        ));
    }
}
