use super::*;

#[test]
fn frame_range_length_saturates() {
    let r = FrameRange::starting_at(FrameIndex(2), 3);
    assert_eq!(r.end, FrameIndex(5));
    assert_eq!(r.len_frames(), 3);
    let edge = FrameRange::starting_at(FrameIndex(u64::MAX - 1), 10);
    assert_eq!(edge.end, FrameIndex(u64::MAX));
}

#[test]
fn frame_range_starting_at_is_contiguous() {
    let a = FrameRange::starting_at(FrameIndex(0), 20);
    let b = FrameRange::starting_at(a.end, 0);
    assert_eq!(b.start, FrameIndex(20));
    assert!(b.is_empty());
}

#[test]
fn fps_parses_integer_and_rational() {
    assert_eq!(Fps::parse("20").unwrap(), Fps { num: 20, den: 1 });
    assert_eq!(
        Fps::parse("30000/1001").unwrap(),
        Fps {
            num: 30000,
            den: 1001
        }
    );
    assert!(Fps::parse("0").is_err());
    assert!(Fps::parse("abc").is_err());
    assert!(Fps::parse("30/0").is_err());
    assert_eq!(Fps::parse("30000/1001").unwrap().to_string(), "30000/1001");
}

#[test]
fn fps_secs_to_frames_floor() {
    let fps = Fps::new(20, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(1.0), 20);
    assert_eq!(fps.secs_to_frames_floor(2.5), 50);
    assert_eq!(fps.secs_to_frames_floor(0.04), 0);
    assert_eq!(fps.secs_to_frames_floor(0.09), 1);

    let ten = Fps::new(10, 1).unwrap();
    assert_eq!(ten.secs_to_frames_floor(2.3), 23);
}

#[test]
fn fps_rational_rates_floor() {
    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_floor(1.0), 29);
    assert_eq!(ntsc.secs_to_frames_floor(1001.0), 30000);
}

#[test]
fn resolution_and_position_parse() {
    assert_eq!(
        Resolution::parse("800, 600").unwrap(),
        Resolution {
            width: 800,
            height: 600
        }
    );
    assert!(Resolution::parse("800").is_err());
    assert!(Resolution::parse("0,600").is_err());
    assert_eq!(
        GridPosition::parse("1,0").unwrap(),
        GridPosition { row: 1, column: 0 }
    );
    assert!(GridPosition::parse("-1,0").is_err());
}
