//! Cell-state color mapping helpers.
//!
//! Rule families map each discrete state to a packed `0xAARRGGBB` color.
//! Multi-state automata build their maps once at construction from the
//! ramps below; dark mode inverts the RGB channels of the light map.

use palette::{FromColor, Hsv, Srgb};

/// Packs RGB channels into an opaque `0xAARRGGBB` value.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Opaque gray of the given level.
pub fn gray(level: u8) -> u32 {
    pack_rgb(level, level, level)
}

/// Inverts the RGB channels, keeping alpha. Used to derive dark-mode
/// colors from a light-theme map.
pub fn invert_rgb(argb: u32) -> u32 {
    (argb & 0xFF00_0000) | (!argb & 0x00FF_FFFF)
}

/// HSV color (hue in degrees, saturation and value in `[0, 1]`) packed as
/// `0xAARRGGBB`.
pub fn hsv(hue_deg: f32, saturation: f32, value: f32) -> u32 {
    let rgb = Srgb::from_color(Hsv::new(hue_deg, saturation, value)).into_format::<u8>();
    pack_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Single-hue saturation ramp over states `0..=n`.
///
/// Saturation falls from 1 at state 0 to `min_saturation` at state `n`
/// along a power-curve of the given `order`; higher orders hold early
/// states vivid and wash out only near the top of the range.
pub fn monochrome_ramp(n: usize, hue_deg: f32, min_saturation: f32, order: f32) -> Vec<u32> {
    (0..=n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let y_n = (min_saturation.powf(order) - 1.0) * t + 1.0;
            hsv(hue_deg, y_n.powf(1.0 / order), 1.0)
        })
        .collect()
}

/// Hue-cycle map over states `0..=n`: state 0 is white, state `n` is
/// black, intermediate states sweep the hue range at full saturation.
pub fn hue_cycle(n: usize, hue_start_deg: f32, hue_end_deg: f32) -> Vec<u32> {
    (0..=n)
        .map(|i| {
            if i == 0 {
                gray(255)
            } else if i == n {
                gray(0)
            } else {
                let t = (i - 1) as f32 / (n - 1).max(1) as f32;
                hsv(hue_start_deg + (hue_end_deg - hue_start_deg) * t, 1.0, 1.0)
            }
        })
        .collect()
}
