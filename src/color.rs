use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in RGB space; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| a as f64 + (b as f64 - a as f64) * t;
        Rgb::from_channels(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported color {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts `#rgb`, `#rrggbb` and the few named colors the views use.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "black" => Some(Rgb::new(0, 0, 0)),
            "white" => Some(Rgb::new(255, 255, 255)),
            "green" => Some(Rgb::new(0, 128, 0)),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }
        let err = || ParseColorError(input.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            3 => {
                let digit = |idx: usize| {
                    u8::from_str_radix(&hex[idx..idx + 1], 16).map(|v| v * 17)
                };
                Ok(Rgb::new(
                    digit(0).map_err(|_| err())?,
                    digit(1).map_err(|_| err())?,
                    digit(2).map_err(|_| err())?,
                ))
            }
            6 => {
                let pair = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16);
                Ok(Rgb::new(
                    pair(0).map_err(|_| err())?,
                    pair(2).map_err(|_| err())?,
                    pair(4).map_err(|_| err())?,
                ))
            }
            _ => Err(err()),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Cubehelix rainbow: `t` in `[0, 1]` walks the full hue circle.
pub fn rainbow(t: f64) -> Rgb {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

fn cubehelix(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    const A: f64 = -0.14861;
    const B: f64 = 1.78277;
    const C: f64 = -0.29227;
    const D: f64 = -0.90649;
    const E: f64 = 1.97294;

    let h = (hue + 120.0).to_radians();
    let l = lightness;
    let a = saturation * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();
    Rgb::from_channels(
        255.0 * (l + a * (A * cos_h + B * sin_h)),
        255.0 * (l + a * (C * cos_h + D * sin_h)),
        255.0 * (l + a * (E * cos_h)),
    )
}

const BLUES: [Rgb; 9] = [
    Rgb::new(0xf7, 0xfb, 0xff),
    Rgb::new(0xde, 0xeb, 0xf7),
    Rgb::new(0xc6, 0xdb, 0xef),
    Rgb::new(0x9e, 0xca, 0xe1),
    Rgb::new(0x6b, 0xae, 0xd6),
    Rgb::new(0x42, 0x92, 0xc6),
    Rgb::new(0x21, 0x71, 0xb5),
    Rgb::new(0x08, 0x51, 0x9c),
    Rgb::new(0x08, 0x30, 0x6b),
];

/// Sequential white-to-navy ramp; `t` is clamped to `[0, 1]`. A uniform
/// cubic B-spline through the nine stops, so the ramp passes exactly through
/// the first and last stop and smooths the ones between.
pub fn blues(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let n = BLUES.len() - 1;
    let i = ((t * n as f64).floor() as usize).min(n - 1);
    let local = t * n as f64 - i as f64;
    let channel = |pick: fn(Rgb) -> u8| {
        let v1 = pick(BLUES[i]) as f64;
        let v2 = pick(BLUES[i + 1]) as f64;
        let v0 = if i > 0 { pick(BLUES[i - 1]) as f64 } else { 2.0 * v1 - v2 };
        let v3 = if i < n - 1 { pick(BLUES[i + 2]) as f64 } else { 2.0 * v2 - v1 };
        basis(local, v0, v1, v2, v3)
    };
    Rgb::from_channels(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b))
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        assert_eq!("#eee".parse::<Rgb>(), Ok(Rgb::new(0xee, 0xee, 0xee)));
        assert_eq!("#08306B".parse::<Rgb>(), Ok(Rgb::new(0x08, 0x30, 0x6b)));
        assert_eq!("green".parse::<Rgb>(), Ok(Rgb::new(0, 128, 0)));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("teal".parse::<Rgb>().is_err());
        assert_eq!(Rgb::new(8, 48, 107).to_string(), "#08306b");
    }

    #[test]
    fn blues_ramp_endpoints() {
        assert_eq!(blues(0.0), BLUES[0]);
        assert_eq!(blues(1.0), BLUES[8]);
        assert_eq!(blues(7.0), BLUES[8]);
        assert_eq!(blues(-1.0), BLUES[0]);
    }

    #[test]
    fn blues_is_smoothed_between_stops() {
        assert_eq!(blues(0.5), Rgb::new(109, 174, 213));
        assert_eq!(blues(0.3), Rgb::new(181, 212, 233));
    }

    #[test]
    fn blues_gets_darker() {
        let luma = |c: Rgb| c.r as u32 + c.g as u32 + c.b as u32;
        let mut previous = luma(blues(0.0));
        for step in 1..=100 {
            let current = luma(blues(step as f64 / 100.0));
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn rainbow_wraps_around() {
        assert_eq!(rainbow(0.0), rainbow(1.0));
        assert_eq!(rainbow(1.25), rainbow(0.25));
        assert_ne!(rainbow(0.1), rainbow(0.6));
    }

    #[test]
    fn lerp_clamps() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.lerp(white, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(black.lerp(white, 2.0), white);
        assert_eq!(black.lerp(white, -1.0), black);
    }
}
