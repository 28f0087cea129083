use imgsearch::{
    channels, message_for_code, pack_rgb, Match, PixelBuffer, SearchConfig, SearchError,
    SearchRect, SearchRequest,
};

#[test]
fn pixel_buffer_rejects_length_mismatch() {
    let err = PixelBuffer::new(vec![0; 5], 2, 3).err().unwrap();
    assert_eq!(
        err,
        SearchError::BufferSizeMismatch {
            expected: 6,
            got: 5,
        }
    );
    assert_eq!(err.code(), -8);
}

#[test]
fn pixel_buffer_rejects_overflowing_dimensions() {
    let err = PixelBuffer::new(Vec::new(), usize::MAX, 2).err().unwrap();
    assert_eq!(
        err,
        SearchError::InvalidDimensions {
            width: usize::MAX,
            height: 2,
        }
    );
}

#[test]
fn zero_sized_buffers_are_allowed_but_empty() {
    let buffer = PixelBuffer::new(Vec::new(), 0, 4).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.row(0), None);
}

#[test]
fn pixel_buffer_accessors_are_row_major() {
    let buffer = PixelBuffer::from_fn(3, 2, |x, y| (y * 10 + x) as u32).unwrap();
    assert_eq!(buffer.get(2, 1), Some(12));
    assert_eq!(buffer.get(3, 0), None);
    assert_eq!(buffer.row(1).unwrap(), &[10, 11, 12]);
    let crop = buffer.crop(1, 0, 2, 2).unwrap();
    assert_eq!(crop.into_pixels(), vec![1, 2, 11, 12]);
    assert!(buffer.crop(2, 0, 2, 1).is_err());
}

#[test]
fn colour_packing_is_rgb_order() {
    let c = pack_rgb(0x12, 0x34, 0x56);
    assert_eq!(c, 0x0012_3456);
    assert_eq!(channels(c), (0x12, 0x34, 0x56));
    assert_eq!(channels(0xFF00_0001), (0, 0, 1));
}

#[test]
fn error_codes_cover_the_taxonomy() {
    let cases = [
        (
            SearchError::InvalidPath {
                path: String::new(),
            },
            -1,
        ),
        (
            SearchError::LoadFailed {
                path: "a".into(),
                reason: "io".into(),
            },
            -2,
        ),
        (SearchError::DeviceContext, -3),
        (SearchError::CompatibleContext, -4),
        (
            SearchError::BufferCreation {
                width: 1,
                height: 1,
            },
            -5,
        ),
        (SearchError::SelectBuffer, -6),
        (
            SearchError::CaptureFailed {
                reason: "x".into(),
            },
            -7,
        ),
        (SearchError::PixelExtraction, -8),
        (
            SearchError::InvalidSearchRegion {
                left: 0,
                top: 0,
                right: 0,
                bottom: 0,
            },
            -9,
        ),
        (
            SearchError::InvalidScale {
                width: 0,
                height: 1,
            },
            -10,
        ),
        (SearchError::OutputTooLarge { len: 2, limit: 1 }, -11),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message_for_code(code));
    }
    assert_eq!(message_for_code(-7), "BitBlt (screen capture) failed");
}

#[test]
fn request_normalization_clamps_everything() {
    let request = SearchRequest::new("a.png")
        .with_rect(SearchRect::new(-20, 5, -1, 9999))
        .with_config(SearchConfig {
            tolerance: 300,
            scale_min: -2.0,
            scale_max: 0.0,
            scale_step: 0.0,
            ..SearchConfig::default()
        });
    let normalized = request.normalized(640, 480).unwrap();
    assert_eq!(normalized.rect, SearchRect::new(0, 5, 640, 480));
    assert_eq!(normalized.config.tolerance, 255);
    assert_eq!(normalized.config.scale_min, 0.1);
    assert_eq!(normalized.config.scale_max, 0.1);
    assert_eq!(normalized.config.scale_step, 0.1);
    assert_eq!(normalized.references, "a.png");
}

#[test]
fn request_normalization_rejects_inverted_rect() {
    let request = SearchRequest::new("a.png").with_rect(SearchRect::new(0, 300, 100, 200));
    let err = request.normalized(640, 480).unwrap_err();
    assert_eq!(err.code(), -9);
}

#[test]
fn centering_keeps_size() {
    let m = Match {
        x: 10,
        y: 20,
        w: 5,
        h: 4,
    };
    assert_eq!(
        m.centered(),
        Match {
            x: 12,
            y: 22,
            w: 5,
            h: 4,
        }
    );
}
