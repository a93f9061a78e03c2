use super::*;
use crate::codec::image_codec::ImageCodec;

/// 4x3 raster where each pixel's red channel encodes `y * 10 + x`.
fn numbered() -> Raster {
    let mut data = Vec::new();
    for y in 0..3u8 {
        for x in 0..4u8 {
            data.extend_from_slice(&[y * 10 + x, 0, 0, 255]);
        }
    }
    Raster::new(4, 3, false, data).unwrap()
}

#[test]
fn extract_copies_the_requested_window() {
    let rect = CropRect {
        left: 1,
        top: 1,
        width: 2,
        height: 2,
    };
    let out = extract(&numbered(), &rect).unwrap();
    assert_eq!(out.dimensions(), Dimensions::new(2, 2));
    let reds: Vec<u8> = out.data.chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(reds, vec![11, 12, 21, 22]);
}

#[test]
fn extract_rejects_out_of_bounds_rect() {
    let rect = CropRect {
        left: 3,
        top: 0,
        width: 2,
        height: 1,
    };
    let err = extract(&numbered(), &rect).unwrap_err();
    assert!(matches!(err, PhotomaskError::InvalidFormat(_)));
}

#[test]
fn crop_and_fill_hits_exact_canvas() {
    let source = Raster::filled(80, 60, [50, 150, 250, 255]).unwrap();
    let rect = CropRect {
        left: 23,
        top: 0,
        width: 33,
        height: 60,
    };
    let out = crop_and_fill(&ImageCodec::new(), &source, &rect, Dimensions::new(54, 96)).unwrap();
    assert_eq!(out.dimensions(), Dimensions::new(54, 96));
    let px = out.pixel(27, 48).unwrap();
    assert!(px[0].abs_diff(50) <= 1 && px[2].abs_diff(250) <= 1, "{px:?}");
}
