// Host-side tests for the reusable style-value buffers.

#![allow(dead_code)]
use glam::Vec2;
use pointer_fx_core::StyleBuffer;

#[test]
fn values_are_formatted_for_css() {
    let mut buf = StyleBuffer::new();
    assert_eq!(buf.number(0.5), "0.5000");
    assert_eq!(buf.px(-12.5), "-12.50px");
    assert_eq!(buf.integer(7), "7");
    assert_eq!(
        buf.translate(Vec2::new(1.5, -2.25)),
        "translate3d(1.50px, -2.25px, 0)"
    );
}

#[test]
fn axis_names_cover_any_index() {
    let mut buf = StyleBuffer::new();
    assert_eq!(buf.axis_name(0), "--fx-0");
    assert_eq!(buf.axis_name(3), "--fx-3");
    assert_eq!(buf.axis_name(12), "--fx-12");
    assert_eq!(buf.axis(1, 0.25), ("--fx-1", "0.2500"));
    assert_eq!(buf.axis(5, 1.0), ("--fx-5", "1.0000"));
}

#[test]
fn each_write_replaces_the_previous_value() {
    let mut buf = StyleBuffer::new();
    assert_eq!(buf.px(1000.0), "1000.00px");
    assert_eq!(buf.px(1.0), "1.00px");
    assert_eq!(buf.number(0.0), "0.0000");
}

#[test]
fn warm_buffer_does_not_reallocate() {
    let mut buf = StyleBuffer::new();
    // Widest values first so later frames fit in the same storage.
    buf.translate(Vec2::new(-9999.99, -9999.99));
    let (_, warm) = buf.axis(100, -1.0);
    let value_ptr = warm.as_ptr();
    let name_ptr = buf.axis_name(100).as_ptr();

    for frame in 0..500 {
        let t = frame as f32 * 0.01;
        assert_eq!(buf.axis(4 + frame % 90, t.sin()).1.as_ptr(), value_ptr);
        assert_eq!(buf.axis_name(10 + frame % 90).as_ptr(), name_ptr);
        assert_eq!(buf.number(t).as_ptr(), value_ptr);
        assert_eq!(buf.translate(Vec2::new(t, -t)).as_ptr(), value_ptr);
    }
}
