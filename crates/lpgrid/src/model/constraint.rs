//! Definitions of the linear constraints, and the other native items, that can
//! be added to a [`Model`].

use std::fmt::{self, Display};

use crate::{LinExpr, Var};
#[cfg(doc)]
use crate::{Model, ModelActions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Possible relations between the two sides of a linear constraint.
pub enum Relation {
	/// Left-hand side is equal to the right-hand side.
	Eq,
	/// Left-hand side is less than or equal to the right-hand side.
	Le,
	/// Left-hand side is greater than or equal to the right-hand side.
	Ge,
}

#[derive(Debug, Clone, PartialEq)]
/// Representation of a linear constraint within a model.
///
/// The constraint is stored in a normalised form: all variable terms are moved
/// to the left-hand side and all constant values to the right-hand side.
pub struct LinConstraint {
	/// The variable terms on the left-hand side of the relation.
	pub(crate) terms: LinExpr,
	/// The relation between the two sides.
	pub(crate) relation: Relation,
	/// The constant right-hand side value.
	pub(crate) rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// The single items that a [`Model`] natively knows how to add.
///
/// See [`ModelActions::add_item`].
pub enum ModelItem {
	/// A constraint that is added to the list of constraints.
	Constraint(LinConstraint),
	/// An expression that becomes the objective of the model.
	Objective(LinExpr),
}

impl Relation {
	/// Symbol used when printing the relation.
	pub(crate) fn symbol(&self) -> &'static str {
		match self {
			Relation::Eq => "=",
			Relation::Le => "<=",
			Relation::Ge => ">=",
		}
	}
}

impl Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

impl LinConstraint {
	/// Create the constraint `lhs relation rhs`.
	pub fn new(lhs: impl Into<LinExpr>, relation: Relation, rhs: impl Into<LinExpr>) -> Self {
		let lhs: LinExpr = lhs.into();
		let rhs: LinExpr = rhs.into();
		let mut terms = lhs - rhs;
		// Avoid a negative zero bound.
		let rhs = if terms.constant == 0.0 {
			0.0
		} else {
			-terms.constant
		};
		terms.constant = 0.0;
		Self {
			terms,
			relation,
			rhs,
		}
	}

	/// The coefficient of the given variable, `0` if it does not occur.
	pub fn coefficient(&self, var: Var) -> f64 {
		self.terms.coefficient(var)
	}

	/// The relation between the variable terms and the right-hand side.
	pub fn relation(&self) -> Relation {
		self.relation
	}

	/// The constant right-hand side value.
	pub fn rhs(&self) -> f64 {
		self.rhs
	}

	/// The variable terms of the constraint, with their coefficients.
	pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
		self.terms.terms()
	}
}

impl From<LinConstraint> for ModelItem {
	fn from(value: LinConstraint) -> Self {
		Self::Constraint(value)
	}
}

impl From<LinExpr> for ModelItem {
	fn from(value: LinExpr) -> Self {
		Self::Objective(value)
	}
}

impl From<Var> for ModelItem {
	fn from(value: Var) -> Self {
		Self::Objective(value.into())
	}
}
