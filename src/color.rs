//! Color utilities for range highlighting.

/// The discrete palette new ranges are colored from. The order decides ties.
pub const BASE_HUES: [u16; 12] = [
    0,   // Red
    120, // Green
    240, // Blue
    60,  // Yellow
    180, // Cyan
    300, // Magenta
    30,  // Orange
    90,  // Yellow-green
    150, // Blue-green
    210, // Blue-purple
    270, // Purple
    330, // Pink
];

/// Saturation (percent) of every picked color.
pub const PICK_SATURATION: f64 = 70.0;
/// Lightness (percent) of every picked color.
pub const PICK_LIGHTNESS: f64 = 90.0;

/// Validate if a string is a valid hex color (e.g., #RRGGBB).
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Convert an HSL color (hue in degrees, saturation and lightness in percent)
/// to a lowercase `#rrggbb` string.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let h = h / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

// Channels are always in [0, 1] here, so round() is round-half-up.
fn to_byte(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Extract the hue (degrees, in `[0, 360)`) of a `#rrggbb` or `hsl(...)` color.
///
/// Achromatic and unparseable colors yield 0.
pub fn hue_from_color(color: &str) -> u16 {
    if color.starts_with('#') {
        return hex_hue(color).unwrap_or(0);
    }
    if color.starts_with("hsl") {
        return hsl_hue(color).unwrap_or(0);
    }
    0
}

fn hex_hue(color: &str) -> Option<u16> {
    let digits = color.get(1..7)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| -> Option<f64> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| f64::from(v) / 255.0)
    };
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return Some(0);
    }

    let d = max - min;
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Some(((h * 60.0).round() as u16) % 360)
}

fn hsl_hue(color: &str) -> Option<u16> {
    let rest = color.strip_prefix("hsl(")?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let degrees: u64 = rest[..end].parse().ok()?;
    Some((degrees % 360) as u16)
}

/// Shortest distance between two hues around the color wheel.
pub fn circular_distance(a: u16, b: u16) -> u16 {
    let d = a.abs_diff(b) % 360;
    d.min(360 - d)
}

/// Index into [`BASE_HUES`] of the base hue closest to `hue`.
pub fn nearest_base_hue_index(hue: u16) -> usize {
    BASE_HUES
        .iter()
        .enumerate()
        .fold(0, |best, (index, &base)| {
            if circular_distance(base, hue) < circular_distance(BASE_HUES[best], hue) {
                index
            } else {
                best
            }
        })
}
