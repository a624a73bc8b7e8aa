// Copyright (c) 2026 rezky_nightky

pub const RAIN_GLYPHS: [char; 3] = ['|', '.', '`'];

/// Lightning heat ramp, densest first. A segment walks down the ramp as it
/// ages.
pub const BOLT_GLYPHS: [char; 3] = ['#', '+', '*'];

/// Picks the bolt glyph for a segment at `norm_age` (age / lifespan).
/// Returns `None` once the segment has outlived its lifespan.
pub fn bolt_glyph(norm_age: f32) -> Option<char> {
    if !(0.0..=1.0).contains(&norm_age) {
        return None;
    }
    let idx = if norm_age < 0.33 {
        0
    } else if norm_age < 0.66 {
        1
    } else {
        2
    };
    Some(BOLT_GLYPHS[idx])
}
