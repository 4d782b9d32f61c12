//! Random Draws
//!
//! Rules only ever need one uniform value in `[0, 1)` at a time. Any
//! `rand::Rng` provides that; `ScriptedDraws` replays a fixed sequence so
//! rule behaviour can be pinned down exactly.

use rand::Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait DrawSource {
    fn draw(&mut self) -> f64;
}

impl<R: Rng> DrawSource for R {
    fn draw(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
///
/// An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    draws: Vec<f64>,
    consumed: usize,
}

impl ScriptedDraws {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            consumed: 0,
        }
    }

    /// A script that repeats `value` forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// How many draws have been taken so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl DrawSource for ScriptedDraws {
    fn draw(&mut self) -> f64 {
        let value = if self.draws.is_empty() {
            0.0
        } else {
            self.draws[self.consumed % self.draws.len()]
        };
        self.consumed += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_scripted_draws_wrap() {
        let mut draws = ScriptedDraws::new(vec![0.1, 0.9]);
        assert_eq!(draws.draw(), 0.1);
        assert_eq!(draws.draw(), 0.9);
        assert_eq!(draws.draw(), 0.1);
        assert_eq!(draws.consumed(), 3);
    }

    #[test]
    fn test_rng_draws_in_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = rng.draw();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
