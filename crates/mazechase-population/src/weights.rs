//! Weight vector initialization for candidate networks.

use rand::Rng;
use rand_distr::{Normal, NormalError};

/// Builds a weight vector by applying `f` to each index.
///
/// ```
/// use mazechase_population::weights;
///
/// let weights = weights::from_fn(|i| i as f32 * 0.5, 3);
/// assert_eq!(weights, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    (0..len).map(f).collect()
}

/// Samples `len` weights from `N(0, sigma)`.
///
/// Fails if `sigma` is negative or not finite.
pub fn random_normal<R>(rng: &mut R, sigma: f32, len: usize) -> Result<Vec<f32>, NormalError>
where
    R: Rng + ?Sized,
{
    if sigma < 0.0 {
        return Err(NormalError::BadVariance);
    }
    let normal = Normal::new(0.0, sigma)?;
    Ok(from_fn(|_| rng.sample(normal), len))
}
