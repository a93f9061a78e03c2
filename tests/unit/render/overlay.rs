use super::*;
use crate::{codec::image_codec::ImageCodec, foundation::core::Dimensions};

#[test]
fn overlay_is_stretched_to_placement_size() {
    let overlay = Raster::filled(20, 10, [0, 0, 255, 128]).unwrap();
    let placement = OverlayPlacement {
        left: 4,
        top: 30,
        width: 32,
        height: 16,
    };
    let out = resize_overlay(&ImageCodec::new(), &overlay, &placement).unwrap();
    assert_eq!(out.dimensions(), Dimensions::new(32, 16));
    assert!(out.has_alpha);

    let px = out.pixel(16, 8).unwrap();
    assert!(px[3].abs_diff(128) <= 1, "{px:?}");
    assert!(px[2] >= 250, "{px:?}");
}
