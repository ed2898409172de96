use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{Rgb, blues};

/// Which slice of the blues ramp the scale spans, and what regions
/// without records are painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RampConfig {
    pub start: f64,
    pub end: f64,
    pub fallback: Rgb,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            start: 0.3,
            end: 1.0,
            fallback: Rgb::new(0xee, 0xee, 0xee),
        }
    }
}

/// Count -> color. The domain is captured once from the unfiltered data
/// and is not touched afterwards, so shades stay comparable across filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryColorScale {
    domain: Option<(u64, u64)>,
    low: Rgb,
    high: Rgb,
    fallback: Rgb,
}

impl CountryColorScale {
    pub fn from_counts(counts: &BTreeMap<String, u64>, ramp: &RampConfig) -> Self {
        let domain = counts.values().fold(None, |acc: Option<(u64, u64)>, &count| {
            Some(match acc {
                Some((min, max)) => (min.min(count), max.max(count)),
                None => (count, count),
            })
        });
        Self {
            domain,
            low: blues(ramp.start),
            high: blues(ramp.end),
            fallback: ramp.fallback,
        }
    }

    pub fn domain(&self) -> Option<(u64, u64)> {
        self.domain
    }

    pub fn fallback(&self) -> Rgb {
        self.fallback
    }

    pub fn color(&self, count: u64) -> Rgb {
        let Some((min, max)) = self.domain else {
            return self.fallback;
        };
        let t = if max == min {
            0.0
        } else {
            (count as f64 - min as f64) / (max as f64 - min as f64)
        };
        self.low.lerp(self.high, t)
    }

    /// Zero or missing counts mean "no data" and never take a ramp color.
    pub fn region_color(&self, region: &str, counts: &BTreeMap<String, u64>) -> Rgb {
        match counts.get(region) {
            Some(&count) if count > 0 => self.color(count),
            _ => self.fallback,
        }
    }
}
