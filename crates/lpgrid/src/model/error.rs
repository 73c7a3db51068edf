//! Error type used when building a [`crate::Model`] or the arrays of variables
//! and constraints that are added to it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type used when formulating a linear program.
pub enum ModelError {
	#[error("operands could not be broadcast together with shapes {lhs:?} and {rhs:?}")]
	/// Error used when two arrays are related elementwise, but their shapes are
	/// not compatible.
	Broadcast {
		/// Shape of the left-hand side array.
		lhs: Vec<usize>,
		/// Shape of the right-hand side array.
		rhs: Vec<usize>,
	},
	#[error("duplicate variable names: {}", .0.join(", "))]
	/// Error used when multiple variables in a model share the same name.
	DuplicateVariableNames(Vec<String>),
	#[error("an array of variables requires at least one dimension")]
	/// Error used when an array of variables is requested without any
	/// dimensions.
	NoDimensions,
	#[error("overlapping constraint names: {0}")]
	/// Error used when a constraint is added under a name that is already used
	/// by another constraint in the model.
	OverlappingConstraintName(String),
}
