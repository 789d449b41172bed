//! Color space conversions for the lighting record.
//!
//! Kelvin ↔ RGB ↔ CIE xy plus mired and perceptual brightness mapping.
//! Everything here is an approximation good enough for lighting control:
//! the Planckian-locus RGB fit and the Kang cubic xy fit agree to within a
//! few hundredths across the supported 500–6500 K range, which is below
//! what a lamp can render anyway.

use crate::common::constants::{DEFAULT_MAX_COLOR_TEMP, DEFAULT_MIN_COLOR_TEMP};

/// Map a linear brightness percentage to a perceptual 0–1 level.
///
/// `gamma_ui` is the configuration's integer-style control value; it maps to
/// the exponent `1 - gamma_ui/100`, so the default 38 yields ≈0.62. Input is
/// clamped to [0, 100]; 0 maps to 0.0 and 100 to 1.0 for any gamma.
pub fn perceptual_brightness(linear_pct: f64, gamma_ui: f64) -> f64 {
    let fraction = (linear_pct.clamp(0.0, 100.0)) / 100.0;
    let exponent = (1.0 - gamma_ui / 100.0).clamp(0.01, 1.0);
    fraction.powf(exponent)
}

/// Convert Kelvin to mireds, clamping into the given Kelvin bounds first
/// (the fixed 500–6500 defaults when unspecified).
pub fn kelvin_to_mired(kelvin: f64, bounds: Option<(f64, f64)>) -> u32 {
    let (min, max) = bounds.unwrap_or((DEFAULT_MIN_COLOR_TEMP, DEFAULT_MAX_COLOR_TEMP));
    let clamped = if min < max {
        kelvin.clamp(min, max)
    } else {
        // Degenerate bounds: fall back to the fixed range
        kelvin.clamp(DEFAULT_MIN_COLOR_TEMP, DEFAULT_MAX_COLOR_TEMP)
    };
    (1_000_000.0 / clamped).round() as u32
}

/// Convert a color temperature to an RGB triple.
///
/// Piecewise polynomial fit of the Planckian locus in kelvin/100
/// (Tanner Helland's approximation), clamped to byte range.
pub fn kelvin_to_rgb(kelvin: f64) -> (u8, u8, u8) {
    let temp = (kelvin / 100.0).clamp(5.0, 400.0);

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * temp.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7
    };

    (
        red.clamp(0.0, 255.0).round() as u8,
        green.clamp(0.0, 255.0).round() as u8,
        blue.clamp(0.0, 255.0).round() as u8,
    )
}

// Cubic evaluation via Horner's rule
fn cubic(input: f64, q: [f64; 4]) -> f64 {
    q[0].mul_add(input, q[1])
        .mul_add(input, q[2])
        .mul_add(input, q[3])
}

/// Convert a color temperature to CIE 1931 xy chromaticity.
///
/// Cubic polynomial fit in inverse kelvin (Kang et al. 2002), valid across
/// the supported range and clamped to [0, 1].
#[rustfmt::skip]
pub fn kelvin_to_xy(kelvin: f64) -> (f64, f64) {
    const X_OVER_ZERO: [f64; 4] = [-0.266_123_90, -0.234_358_90, 0.877_695_60,  0.179_910_00];
    const X_OVER_4000: [f64; 4] = [-3.025_846_90,  2.107_037_90, 0.222_634_70,  0.240_390_00];
    const Y_OVER_ZERO: [f64; 4] = [-1.106_381_40, -1.348_110_20, 2.185_558_32, -0.202_196_83];
    const Y_OVER_2222: [f64; 4] = [-0.954_947_60, -1.374_185_93, 2.091_370_15, -0.167_488_67];
    const Y_OVER_4000: [f64; 4] = [ 3.081_758_00, -5.873_386_70, 3.751_129_97, -0.370_014_83];

    let kelvin = kelvin.max(1.0);
    let mk = 1000.0 / kelvin;

    let x = if kelvin <= 4000.0 {
        cubic(mk, X_OVER_ZERO)
    } else {
        cubic(mk, X_OVER_4000)
    };

    let y = if kelvin <= 2222.0 {
        cubic(x, Y_OVER_ZERO)
    } else if kelvin <= 4000.0 {
        cubic(x, Y_OVER_2222)
    } else {
        cubic(x, Y_OVER_4000)
    };

    (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

// sRGB inverse companding: gamma-encoded channel to linear light
fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB triple to CIE 1931 xy chromaticity.
///
/// Gamma-corrects the input, transforms through the sRGB D65 XYZ matrix,
/// and projects to xy. Black has no chromaticity; it maps to the D65 white
/// point rather than dividing by zero.
pub fn rgb_to_xy(rgb: (u8, u8, u8)) -> (f64, f64) {
    let r = srgb_to_linear(rgb.0);
    let g = srgb_to_linear(rgb.1);
    let b = srgb_to_linear(rgb.2);

    let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
    let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
    let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

    let sum = x + y + z;
    if sum <= 0.0 {
        return (0.3127, 0.3290);
    }
    ((x / sum).clamp(0.0, 1.0), (y / sum).clamp(0.0, 1.0))
}
