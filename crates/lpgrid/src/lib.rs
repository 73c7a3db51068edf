//! # LpGrid - Arrays of Decisions for Linear Programming Models
//!
//! LpGrid provides the modelling conveniences that make formulating larger
//! linear programs bearable. Instead of creating decision variables and
//! constraints one at a time, whole (n-dimensional) arrays of them can be
//! created and added to a model at once:
//!
//! - [`build_variables`] creates an array of named decision variables from a
//!   base name and a list of dimensions, where each dimension is either a
//!   number of positions or a list of labels.
//! - [`relate`] relates two arrays elementwise, creating an array of linear
//!   constraints.
//! - [`IterableModel`] accepts (nested) sequences and arrays of constraints, and
//!   adds them to the model one by one, naming each of them after its position.
//!
//! ```
//! use lpgrid::{build_variables, relate, IterableModel, Relation, Sense, VarOptions};
//!
//! let mut prb = IterableModel::new("transport", Sense::Minimize);
//! let ship = build_variables(&mut prb, "ship", [2, 3], &VarOptions::default())?;
//! let cap = build_variables(&mut prb, "cap", [2, 3], &VarOptions::default())?;
//! prb.add_named(relate(Relation::Le, &ship, &cap)?, "capacity")?;
//! assert_eq!(prb.num_constraints(), 6);
//! assert!(prb.constraint("capacity_1_2").is_some());
//! # Ok::<_, lpgrid::ModelError>(())
//! ```

pub mod actions;
pub(crate) mod array;
pub(crate) mod iterable;
pub(crate) mod model;
#[cfg(test)]
pub(crate) mod tests;

use std::{
	collections::HashMap,
	fmt::{self, Display},
	iter::Sum,
	ops::{Add, AddAssign, Mul, Neg, Sub},
};

use index_vec::IndexVec;
use itertools::Itertools;
use tracing::warn;

use crate::model::var::VarRef;
pub use crate::{
	actions::ModelActions,
	array::{build_variables, relate, relate_scalar, ConstraintArray, DimSpec, VarArray},
	iterable::{Addable, IterableModel},
	model::{
		constraint::{LinConstraint, ModelItem, Relation},
		error::ModelError,
		var::{Category, Var, VarDef, VarOptions},
	},
};

#[derive(Debug, Clone, Default, PartialEq)]
/// A linear expression: a weighted sum of decision variables and a constant.
///
/// Expressions are generally created by adding, subtracting, and scaling
/// [`Var`] objects. Calling methods like [`Self::leq`] or [`Self::equal_to`]
/// will create a [`LinConstraint`] object that can be added to a [`Model`].
pub struct LinExpr {
	/// The variables in the sum with their (non-zero) coefficients, in order of
	/// first occurrence.
	terms: Vec<(Var, f64)>,
	/// The constant part of the expression.
	pub(crate) constant: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Direction of optimization of the objective of a [`Model`].
pub enum Sense {
	#[default]
	/// Find the smallest value of the objective.
	Minimize,
	/// Find the largest value of the objective.
	Maximize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Configuration object for the behaviour of a [`Model`].
pub struct ModelConfig {
	/// Whether a constraint added under an existing name replaces the existing
	/// constraint, instead of being rejected.
	allow_overlap: bool,
}

#[derive(Debug, Clone)]
/// A formulation of a linear program in terms of decisions, constraints, and
/// an objective.
pub struct Model {
	/// The name of the problem.
	name: String,
	/// Whether the objective is minimized or maximized.
	sense: Sense,
	/// Configuration of the behaviour of the model.
	config: ModelConfig,
	/// The objective of the model, if it has been set.
	objective: Option<LinExpr>,
	/// The name given to the objective, if any.
	objective_name: Option<String>,
	/// The definitions of the decision variables that have been created.
	vars: IndexVec<VarRef, VarDef>,
	/// The constraints that have been added to the model, with their names, in
	/// insertion order.
	constraints: Vec<(String, LinConstraint)>,
	/// Position of each constraint name in `constraints`.
	constraint_index: HashMap<String, usize>,
	/// Counter used to generate names for anonymous constraints.
	last_unused: usize,
}

impl LinExpr {
	/// The coefficient of the given variable, `0` if it does not occur.
	pub fn coefficient(&self, var: Var) -> f64 {
		self.terms
			.iter()
			.find(|(v, _)| *v == var)
			.map_or(0.0, |&(_, c)| c)
	}

	/// The constant part of the expression.
	pub fn constant(&self) -> f64 {
		self.constant
	}

	/// Create a new linear constraint that enforces that the expression is equal
	/// to the given value.
	pub fn equal_to(self, rhs: impl Into<LinExpr>) -> LinConstraint {
		LinConstraint::new(self, Relation::Eq, rhs)
	}

	/// Create a new linear constraint that enforces that the expression is
	/// greater than or equal to the given value.
	pub fn geq(self, rhs: impl Into<LinExpr>) -> LinConstraint {
		LinConstraint::new(self, Relation::Ge, rhs)
	}

	/// Create a new linear constraint that enforces that the expression is less
	/// than or equal to the given value.
	pub fn leq(self, rhs: impl Into<LinExpr>) -> LinConstraint {
		LinConstraint::new(self, Relation::Le, rhs)
	}

	/// Add `coef * var` to the expression, merging it with an existing term for
	/// the same variable.
	fn push_term(&mut self, var: Var, coef: f64) {
		if let Some(pos) = self.terms.iter().position(|(v, _)| *v == var) {
			self.terms[pos].1 += coef;
			if self.terms[pos].1 == 0.0 {
				let _ = self.terms.remove(pos);
			}
		} else if coef != 0.0 {
			self.terms.push((var, coef));
		}
	}

	/// The variables in the expression with their coefficients.
	pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
		self.terms.iter().copied()
	}
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
	type Output = LinExpr;

	fn add(mut self, rhs: T) -> Self::Output {
		let rhs: LinExpr = rhs.into();
		for (var, coef) in rhs.terms {
			self.push_term(var, coef);
		}
		self.constant += rhs.constant;
		self
	}
}

impl From<f64> for LinExpr {
	fn from(value: f64) -> Self {
		LinExpr {
			terms: Vec::new(),
			constant: value,
		}
	}
}

impl From<Var> for LinExpr {
	fn from(value: Var) -> Self {
		LinExpr {
			terms: vec![(value, 1.0)],
			constant: 0.0,
		}
	}
}

impl Mul<f64> for LinExpr {
	type Output = LinExpr;

	fn mul(self, rhs: f64) -> Self::Output {
		if rhs == 0.0 {
			return LinExpr::default();
		}
		LinExpr {
			terms: self.terms.into_iter().map(|(v, c)| (v, c * rhs)).collect(),
			constant: self.constant * rhs,
		}
	}
}

impl Mul<LinExpr> for f64 {
	type Output = LinExpr;

	fn mul(self, rhs: LinExpr) -> Self::Output {
		rhs * self
	}
}

impl Neg for LinExpr {
	type Output = LinExpr;

	fn neg(self) -> Self::Output {
		self * -1.0
	}
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
	type Output = LinExpr;

	fn sub(self, rhs: T) -> Self::Output {
		let rhs: LinExpr = rhs.into();
		self + -rhs
	}
}

impl Sum<LinExpr> for LinExpr {
	fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
		iter.fold(LinExpr::default(), |acc, e| acc + e)
	}
}

impl Sum<Var> for LinExpr {
	fn sum<I: Iterator<Item = Var>>(iter: I) -> Self {
		iter.fold(LinExpr::default(), |acc, v| acc + v)
	}
}

impl<T: Into<LinExpr>> Add<T> for Var {
	type Output = LinExpr;

	fn add(self, rhs: T) -> Self::Output {
		LinExpr::from(self) + rhs
	}
}

impl Mul<f64> for Var {
	type Output = LinExpr;

	fn mul(self, rhs: f64) -> Self::Output {
		LinExpr::from(self) * rhs
	}
}

impl Mul<Var> for f64 {
	type Output = LinExpr;

	fn mul(self, rhs: Var) -> Self::Output {
		LinExpr::from(rhs) * self
	}
}

impl Neg for Var {
	type Output = LinExpr;

	fn neg(self) -> Self::Output {
		-LinExpr::from(self)
	}
}

impl<T: Into<LinExpr>> Sub<T> for Var {
	type Output = LinExpr;

	fn sub(self, rhs: T) -> Self::Output {
		LinExpr::from(self) - rhs
	}
}

impl Display for Sense {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Sense::Minimize => write!(f, "MINIMIZE"),
			Sense::Maximize => write!(f, "MAXIMIZE"),
		}
	}
}

impl ModelConfig {
	/// Get whether a constraint added under an existing name replaces the
	/// existing constraint.
	///
	/// When this is `false` (the default), adding such a constraint results in
	/// [`ModelError::OverlappingConstraintName`].
	pub fn allow_overlap(&self) -> bool {
		self.allow_overlap
	}

	/// Change whether a constraint added under an existing name replaces the
	/// existing constraint.
	pub fn with_allow_overlap(mut self, allow_overlap: bool) -> Self {
		self.allow_overlap = allow_overlap;
		self
	}
}

impl Model {
	/// Create a new empty model with the default configuration.
	pub fn new(name: impl Into<String>, sense: Sense) -> Self {
		Self::with_config(name, sense, ModelConfig::default())
	}

	/// Create a new empty model with the given configuration.
	pub fn with_config(name: impl Into<String>, sense: Sense, config: ModelConfig) -> Self {
		Self {
			name: name.into(),
			sense,
			config,
			objective: None,
			objective_name: None,
			vars: IndexVec::new(),
			constraints: Vec::new(),
			constraint_index: HashMap::new(),
			last_unused: 0,
		}
	}

	/// Add a constraint to the model.
	///
	/// If no name (or an empty name) is given, then the constraint is named
	/// `_C{n}` using the first such name that is not yet in use.
	pub fn add_constraint(
		&mut self,
		constraint: LinConstraint,
		name: Option<&str>,
	) -> Result<(), ModelError> {
		let name = match name {
			Some(name) if !name.is_empty() => name.to_owned(),
			_ => self.unused_constraint_name(),
		};
		if let Some(&pos) = self.constraint_index.get(&name) {
			if !self.config.allow_overlap() {
				return Err(ModelError::OverlappingConstraintName(name));
			}
			warn!(%name, "overlapping constraint names, replacing existing constraint");
			self.constraints[pos].1 = constraint;
			return Ok(());
		}
		self.insert_constraint(name, constraint);
		Ok(())
	}

	/// Check that no two decision variables in the model share a name.
	///
	/// Names are not checked when variables are created, so this method can be
	/// used to detect collisions, e.g. between the labels of different
	/// dimensions of an array of variables.
	pub fn check_duplicate_vars(&self) -> Result<(), ModelError> {
		let dups = self
			.vars
			.iter()
			.map(|v| v.name.as_str())
			.duplicates()
			.map(str::to_owned)
			.collect_vec();
		if dups.is_empty() {
			Ok(())
		} else {
			Err(ModelError::DuplicateVariableNames(dups))
		}
	}

	/// Get the configuration of the model.
	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	/// Get the constraint with the given name, if it exists.
	pub fn constraint(&self, name: &str) -> Option<&LinConstraint> {
		self.constraint_index
			.get(name)
			.map(|&pos| &self.constraints[pos].1)
	}

	/// Iterate over the constraints in the model, with their names, in the order
	/// in which they were added.
	pub fn constraints(&self) -> impl Iterator<Item = (&str, &LinConstraint)> + '_ {
		self.constraints.iter().map(|(n, c)| (n.as_str(), c))
	}

	/// Internal method to store a constraint under a name that is known to be
	/// unused.
	fn insert_constraint(&mut self, name: String, constraint: LinConstraint) {
		debug_assert!(!self.constraint_index.contains_key(&name));
		let _ = self
			.constraint_index
			.insert(name.clone(), self.constraints.len());
		self.constraints.push((name, constraint));
	}

	/// Get the name of the model.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Create a new decision variable with the given name and options.
	pub fn new_var(&mut self, name: impl Into<String>, options: &VarOptions) -> Var {
		Var(self.vars.push(VarDef::new(name.into(), options)))
	}

	/// Get the number of constraints in the model.
	pub fn num_constraints(&self) -> usize {
		self.constraints.len()
	}

	/// Get the number of decision variables in the model.
	pub fn num_vars(&self) -> usize {
		self.vars.len()
	}

	/// Get the objective of the model, if it has been set.
	pub fn objective(&self) -> Option<&LinExpr> {
		self.objective.as_ref()
	}

	/// Get the name of the objective, if it has been given one.
	pub fn objective_name(&self) -> Option<&str> {
		self.objective_name.as_deref()
	}

	/// Get whether the objective is minimized or maximized.
	pub fn sense(&self) -> Sense {
		self.sense
	}

	/// Set the objective of the model, replacing any existing objective.
	pub fn set_objective(&mut self, objective: LinExpr, name: Option<&str>) {
		if self.objective.is_some() {
			warn!("overwriting previously set objective");
		}
		self.objective = Some(objective);
		self.objective_name = name.filter(|n| !n.is_empty()).map(str::to_owned);
	}

	/// Generate the next `_C{n}` constraint name that is not yet in use.
	fn unused_constraint_name(&mut self) -> String {
		loop {
			self.last_unused += 1;
			let name = format!("_C{}", self.last_unused);
			if !self.constraint_index.contains_key(&name) {
				return name;
			}
		}
	}

	/// Get the definition of a decision variable.
	pub fn var(&self, var: Var) -> &VarDef {
		&self.vars[var.0]
	}

	/// Get the name of a decision variable.
	pub fn var_name(&self, var: Var) -> &str {
		&self.vars[var.0].name
	}

	/// Iterate over the decision variables in the model, in order of creation.
	pub fn vars(&self) -> impl Iterator<Item = (Var, &VarDef)> + '_ {
		self.vars.iter_enumerated().map(|(i, def)| (Var(i), def))
	}

	/// Internal method to write a linear expression using the names of the
	/// variables in the model.
	fn write_expr(&self, f: &mut fmt::Formatter<'_>, expr: &LinExpr) -> fmt::Result {
		let mut first = true;
		for (var, coef) in expr.terms() {
			match (first, coef < 0.0) {
				(true, false) => {}
				(true, true) => write!(f, "-")?,
				(false, false) => write!(f, " + ")?,
				(false, true) => write!(f, " - ")?,
			}
			if coef.abs() != 1.0 {
				write!(f, "{} ", coef.abs())?;
			}
			write!(f, "{}", self.var_name(var))?;
			first = false;
		}
		if first {
			write!(f, "{}", expr.constant)
		} else if expr.constant < 0.0 {
			write!(f, " - {}", -expr.constant)
		} else if expr.constant > 0.0 {
			write!(f, " + {}", expr.constant)
		} else {
			Ok(())
		}
	}
}

impl AddAssign<LinConstraint> for Model {
	fn add_assign(&mut self, constraint: LinConstraint) {
		let name = self.unused_constraint_name();
		self.insert_constraint(name, constraint);
	}
}

impl AddAssign<LinExpr> for Model {
	fn add_assign(&mut self, objective: LinExpr) {
		self.set_objective(objective, None);
	}
}

impl Display for Model {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}:", self.name)?;
		writeln!(f, "{}", self.sense)?;
		if let Some(name) = &self.objective_name {
			write!(f, "{name}: ")?;
		}
		self.write_expr(f, self.objective.as_ref().unwrap_or(&LinExpr::default()))?;
		writeln!(f)?;
		writeln!(f, "SUBJECT TO")?;
		for (name, con) in &self.constraints {
			write!(f, "{name}: ")?;
			self.write_expr(f, &con.terms)?;
			writeln!(f, " {} {}", con.relation, con.rhs)?;
		}
		writeln!(f, "VARIABLES")?;
		for def in self.vars.iter() {
			writeln!(f, "{def}")?;
		}
		Ok(())
	}
}

impl ModelActions for Model {
	fn new_var(&mut self, name: String, options: &VarOptions) -> Var {
		Model::new_var(self, name, options)
	}

	fn add_item(&mut self, item: ModelItem, name: Option<&str>) -> Result<(), ModelError> {
		match item {
			ModelItem::Constraint(con) => self.add_constraint(con, name),
			ModelItem::Objective(expr) => {
				self.set_objective(expr, name);
				Ok(())
			}
		}
	}
}
