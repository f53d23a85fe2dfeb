//! Fitness formulas: final score and true lifespan to a scalar.
//!
//! | Formula | Value |
//! | --- | --- |
//! | [`Ratio`] | `score * k / lifespan` |
//! | [`PowerRatio`] | `(score / 10) ^ exponent / lifespan` |
//! | [`RawScore`] | `score` |
//! | [`Product`] | `(score / 10) ^ 2 * (lifespan / divisor)` |
//! | [`Lifespan`] | `lifespan` |
//!
//! `score / 10` and `lifespan / divisor` are integer divisions. Formulas that divide
//! by the lifespan return their configured floor when it is zero.
//!
//! Ratio forms reward scoring quickly; product and lifespan forms reward staying
//! alive. Which one a phase uses is part of its configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

pub trait FitnessFunction: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn clone_boxed(&self) -> BoxedFitnessFunction;
    #[must_use]
    fn fitness(&self, score: u32, lifespan: u32) -> f64;
}

pub type BoxedFitnessFunction = Box<dyn FitnessFunction>;

impl Clone for BoxedFitnessFunction {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

#[derive(Debug, Clone)]
pub struct Ratio {
    pub k: f64,
    pub floor: f64,
}

impl FitnessFunction for Ratio {
    fn id(&self) -> &'static str {
        "ratio"
    }

    fn clone_boxed(&self) -> BoxedFitnessFunction {
        Box::new(self.clone())
    }

    fn fitness(&self, score: u32, lifespan: u32) -> f64 {
        if lifespan == 0 {
            return self.floor;
        }
        f64::from(score) * self.k / f64::from(lifespan)
    }
}

#[derive(Debug, Clone)]
pub struct PowerRatio {
    pub exponent: f64,
    pub floor: f64,
}

impl FitnessFunction for PowerRatio {
    fn id(&self) -> &'static str {
        "power_ratio"
    }

    fn clone_boxed(&self) -> BoxedFitnessFunction {
        Box::new(self.clone())
    }

    fn fitness(&self, score: u32, lifespan: u32) -> f64 {
        if lifespan == 0 {
            return self.floor;
        }
        f64::from(score / 10).powf(self.exponent) / f64::from(lifespan)
    }
}

#[derive(Debug, Clone)]
pub struct RawScore;

impl FitnessFunction for RawScore {
    fn id(&self) -> &'static str {
        "raw_score"
    }

    fn clone_boxed(&self) -> BoxedFitnessFunction {
        Box::new(self.clone())
    }

    fn fitness(&self, score: u32, _lifespan: u32) -> f64 {
        f64::from(score)
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub divisor: u32,
}

impl FitnessFunction for Product {
    fn id(&self) -> &'static str {
        "product"
    }

    fn clone_boxed(&self) -> BoxedFitnessFunction {
        Box::new(self.clone())
    }

    fn fitness(&self, score: u32, lifespan: u32) -> f64 {
        let dots = f64::from(score / 10);
        dots * dots * f64::from(lifespan.checked_div(self.divisor).unwrap_or(0))
    }
}

#[derive(Debug, Clone)]
pub struct Lifespan;

impl FitnessFunction for Lifespan {
    fn id(&self) -> &'static str {
        "lifespan"
    }

    fn clone_boxed(&self) -> BoxedFitnessFunction {
        Box::new(self.clone())
    }

    fn fitness(&self, _score: u32, lifespan: u32) -> f64 {
        f64::from(lifespan)
    }
}

/// Serializable fitness selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitnessConfig {
    Ratio {
        k: f64,
        #[serde(default)]
        floor: f64,
    },
    PowerRatio {
        exponent: f64,
        #[serde(default)]
        floor: f64,
    },
    RawScore,
    Product {
        divisor: u32,
    },
    Lifespan,
}

impl FitnessConfig {
    #[must_use]
    pub fn build(&self) -> BoxedFitnessFunction {
        match *self {
            Self::Ratio { k, floor } => Box::new(Ratio { k, floor }),
            Self::PowerRatio { exponent, floor } => Box::new(PowerRatio { exponent, floor }),
            Self::RawScore => Box::new(RawScore),
            Self::Product { divisor } => Box::new(Product { divisor }),
            Self::Lifespan => Box::new(Lifespan),
        }
    }
}
