/// Size of `src_w`×`src_h` scaled to fit inside a `max_dim` square.
///
/// Images already inside the box are returned unchanged; nothing is enlarged.
/// Otherwise the longer side becomes `max_dim` and the shorter one is rounded
/// to the nearest pixel, never below 1.
pub fn fit_within(src_w: u32, src_h: u32, max_dim: u32) -> (u32, u32) {
    let max_dim = max_dim.max(1);
    if src_w <= max_dim && src_h <= max_dim {
        return (src_w, src_h);
    }
    let iw = f64::from(src_w.max(1));
    let ih = f64::from(src_h.max(1));
    let scale = (f64::from(max_dim) / iw).min(f64::from(max_dim) / ih);
    let w = (iw * scale).round().clamp(1.0, f64::from(max_dim));
    let h = (ih * scale).round().clamp(1.0, f64::from(max_dim));
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use super::fit_within;

    #[test]
    fn small_images_are_untouched() {
        assert_eq!(fit_within(64, 32, 128), (64, 32));
        assert_eq!(fit_within(128, 128, 128), (128, 128));
        assert_eq!(fit_within(1, 1, 128), (1, 1));
    }

    #[test]
    fn landscape_is_bounded_by_width() {
        assert_eq!(fit_within(300, 200, 128), (128, 85));
        assert_eq!(fit_within(1920, 1080, 128), (128, 72));
    }

    #[test]
    fn portrait_is_bounded_by_height() {
        assert_eq!(fit_within(200, 300, 128), (85, 128));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 10, 128), (128, 1));
        assert_eq!(fit_within(1, 5_000, 128), (1, 128));
    }

    #[test]
    fn only_one_side_over_the_box() {
        assert_eq!(fit_within(129, 10, 128), (128, 10));
    }
}
