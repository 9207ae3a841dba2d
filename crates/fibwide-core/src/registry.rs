//! Calculator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
use crate::engine::Algorithm;
use crate::fastdoubling::FastDoubling;
use crate::linear::Linear;
use crate::matrix::MatrixExponentiation;

/// Factory trait for creating calculators.
pub trait CalculatorFactory<const N: usize>: Send + Sync {
    /// Get or create a calculator by name.
    ///
    /// # Errors
    ///
    /// `FibError::Config` for an unknown name.
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator<N>>, FibError>;

    /// List all available calculator names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory<const N: usize> {
    cache: RwLock<HashMap<String, Arc<dyn Calculator<N>>>>,
}

impl<const N: usize> DefaultFactory<N> {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_calculator(name: &str) -> Result<Arc<dyn Calculator<N>>, FibError> {
        let core: Arc<dyn CoreCalculator<N>> = match name.parse::<Algorithm>()? {
            Algorithm::Linear => Arc::new(Linear::new()),
            Algorithm::Matrix => Arc::new(MatrixExponentiation::new()),
            Algorithm::FastDoubling => Arc::new(FastDoubling::new()),
        };
        Ok(Arc::new(FibCalculator::new(core)))
    }
}

impl<const N: usize> Default for DefaultFactory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CalculatorFactory<N> for DefaultFactory<N> {
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator<N>>, FibError> {
        if let Some(calc) = self.cache.read().get(name) {
            return Ok(Arc::clone(calc));
        }

        let calc = Self::create_calculator(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&calc));
        Ok(calc)
    }

    fn available(&self) -> Vec<&str> {
        Algorithm::ALL.iter().map(|a| a.key()).collect()
    }
}
