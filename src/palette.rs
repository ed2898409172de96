use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::color::{Rgb, rainbow};

/// Append-only key -> color table. A key keeps the first color it was given
/// for the lifetime of the palette, whatever happens to the data.
pub struct ColorAssignment<R = StdRng> {
    rng: R,
    colors: HashMap<String, Rgb>,
}

impl ColorAssignment<StdRng> {
    /// Different hues every session.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for ColorAssignment<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> ColorAssignment<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            colors: HashMap::new(),
        }
    }

    pub fn color_for(&mut self, key: &str) -> Rgb {
        if let Some(color) = self.colors.get(key) {
            return *color;
        }
        let color = rainbow(self.rng.gen_range(0.0..1.0));
        self.colors.insert(key.to_string(), color);
        color
    }

    pub fn assign_all<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            self.color_for(key);
        }
    }

    pub fn get(&self, key: &str) -> Option<Rgb> {
        self.colors.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<R> std::fmt::Debug for ColorAssignment<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorAssignment")
            .field("assigned", &self.colors.len())
            .finish()
    }
}
