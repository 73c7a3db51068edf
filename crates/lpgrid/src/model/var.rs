//! Representation of (continuous, integer, or binary) decision variables in a
//! [`Model`].

use std::fmt::{self, Display};

use index_vec::define_index_type;

#[cfg(doc)]
use crate::Model;

define_index_type! {
	/// Position of a decision variable in the variable arena of a [`Model`].
	pub(crate) struct VarRef = u32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Reference to a decision variable in a [`Model`].
///
/// A `Var` is only meaningful for the model that created it. Unlike its
/// position in the arena, it can be combined into linear expressions using
/// arithmetic operators.
pub struct Var(
	/// Position of the variable in the arena of its model.
	pub(crate) VarRef,
);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// The kind of values a decision variable can take.
pub enum Category {
	#[default]
	/// Any real value within the bounds.
	Continuous,
	/// Any integer value within the bounds.
	Integer,
	/// The values `0` or `1`.
	Binary,
}

#[derive(Clone, Debug, PartialEq)]
/// Definition of a decision variable in a [`Model`].
pub struct VarDef {
	/// The name of the variable, used when the model is printed.
	pub(crate) name: String,
	/// The lower bound of the variable, if any.
	pub(crate) lower: Option<f64>,
	/// The upper bound of the variable, if any.
	pub(crate) upper: Option<f64>,
	/// The kind of values the variable can take.
	pub(crate) category: Category,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Options used when creating decision variables.
///
/// The same options are applied to every variable created by
/// [`crate::build_variables`].
pub struct VarOptions {
	/// The lower bound of the variable, if any.
	lower: Option<f64>,
	/// The upper bound of the variable, if any.
	upper: Option<f64>,
	/// The kind of values the variable can take.
	category: Category,
}

impl Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Category::Continuous => write!(f, "Continuous"),
			Category::Integer => write!(f, "Integer"),
			Category::Binary => write!(f, "Binary"),
		}
	}
}

impl VarDef {
	/// Create a new variable definition with the given name and options.
	pub(crate) fn new(name: String, options: &VarOptions) -> Self {
		Self {
			name,
			lower: options.lower_bound(),
			upper: options.upper_bound(),
			category: options.category(),
		}
	}

	/// The name of the variable.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The lower bound of the variable, or `None` if it is unbounded below.
	pub fn lower_bound(&self) -> Option<f64> {
		self.lower
	}

	/// The upper bound of the variable, or `None` if it is unbounded above.
	pub fn upper_bound(&self) -> Option<f64> {
		self.upper
	}

	/// The kind of values the variable can take.
	pub fn category(&self) -> Category {
		self.category
	}
}

impl Display for VarDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (self.lower, self.upper) {
			(Some(lb), Some(ub)) => write!(f, "{lb} <= {} <= {ub}", self.name)?,
			(Some(lb), None) => write!(f, "{} >= {lb}", self.name)?,
			(None, Some(ub)) => write!(f, "{} <= {ub}", self.name)?,
			(None, None) => write!(f, "{} free", self.name)?,
		}
		write!(f, " {}", self.category)
	}
}

impl VarOptions {
	/// Get the lower bound given to created variables.
	///
	/// Binary variables always have a lower bound of `0`.
	pub fn lower_bound(&self) -> Option<f64> {
		match self.category {
			Category::Binary => Some(0.0),
			_ => self.lower,
		}
	}

	/// Get the upper bound given to created variables.
	///
	/// Binary variables always have an upper bound of `1`.
	pub fn upper_bound(&self) -> Option<f64> {
		match self.category {
			Category::Binary => Some(1.0),
			_ => self.upper,
		}
	}

	/// Get the category given to created variables.
	pub fn category(&self) -> Category {
		self.category
	}

	/// Change the lower and upper bound given to created variables.
	pub fn with_bounds(self, lower: f64, upper: f64) -> Self {
		self.with_lower_bound(lower).with_upper_bound(upper)
	}

	/// Change the category given to created variables.
	pub fn with_category(mut self, category: Category) -> Self {
		self.category = category;
		self
	}

	/// Change the lower bound given to created variables.
	pub fn with_lower_bound(mut self, lower: f64) -> Self {
		self.lower = Some(lower);
		self
	}

	/// Change the upper bound given to created variables.
	pub fn with_upper_bound(mut self, upper: f64) -> Self {
		self.upper = Some(upper);
		self
	}
}
