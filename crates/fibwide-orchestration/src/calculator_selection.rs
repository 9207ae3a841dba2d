//! Calculator selection logic.

use std::sync::Arc;

use fibwide_core::calculator::{Calculator, FibError};
use fibwide_core::registry::CalculatorFactory;

/// Get calculators to run based on algorithm selection.
///
/// `"all"` selects every registered calculator, slowest first.
///
/// # Errors
///
/// `FibError::Config` when the name is not registered.
pub fn get_calculators_to_run<const N: usize>(
    algo: &str,
    factory: &dyn CalculatorFactory<N>,
) -> Result<Vec<Arc<dyn Calculator<N>>>, FibError> {
    match algo {
        "all" => factory
            .available()
            .into_iter()
            .map(|name| factory.get(name))
            .collect(),
        name => Ok(vec![factory.get(name)?]),
    }
}
