//! Traits that encapsulate the actions a model container offers to the helpers
//! in this crate.
//!
//! Both [`Model`] and [`IterableModel`] implement [`ModelActions`], so arrays
//! of variables can be created in either.

use crate::{ModelError, ModelItem, Var, VarOptions};
#[cfg(doc)]
use crate::{IterableModel, Model};

/// Actions to create decision variables in, and add single items to, a model
/// container.
pub trait ModelActions {
	/// Create a new decision variable with the given name and options.
	///
	/// Every call creates a fresh variable, even if another variable with the
	/// same name already exists.
	fn new_var(&mut self, name: String, options: &VarOptions) -> Var;

	/// Add a single native item to the model, optionally under the given name.
	///
	/// Constraints are added to the list of constraints, expressions replace the
	/// objective of the model.
	fn add_item(&mut self, item: ModelItem, name: Option<&str>) -> Result<(), ModelError>;
}
