//! A model container that accepts (nested) sequences and arrays of items, and
//! adds them to the underlying [`Model`] one at a time.

use std::{
	fmt::{self, Display},
	ops::AddAssign,
};

use delegate::delegate;
use ndarray::{ArrayBase, ArrayViewD, Data, Dimension};
use tracing::trace;

use crate::{
	LinConstraint, LinExpr, Model, ModelActions, ModelConfig, ModelError, ModelItem, Sense, Var,
	VarDef, VarOptions,
};

#[derive(Debug, Clone, PartialEq)]
/// A value that can be added to an [`IterableModel`].
///
/// Arrays are converted into nested sequences along their first axis, where a
/// zero-dimensional array becomes the single item it contains.
pub enum Addable {
	/// A single native item.
	Item(ModelItem),
	/// A value with an explicit name, which replaces any name it would otherwise
	/// receive.
	Named(Box<Addable>, String),
	/// A sequence of values, where the `i`-th value is named after its position
	/// by appending `_{i}` to the name of the sequence.
	Seq(Vec<Addable>),
}

#[derive(Debug, Clone)]
/// A [`Model`] to which sequences and arrays of constraints can be added as a
/// whole.
///
/// Every native item found in the added value is added to the model
/// separately. When the value is given a name, each item is named by
/// appending its position within every enclosing sequence, e.g. adding a 2 by
/// 2 array of constraints under the name `c` adds the constraints `c_0_0`,
/// `c_0_1`, `c_1_0`, and `c_1_1`, in that order.
pub struct IterableModel {
	/// The model to which items are added.
	model: Model,
}

impl Addable {
	/// Convert an array view into (nested) sequences along its first axis.
	fn from_view<T: Clone + Into<ModelItem>>(view: ArrayViewD<'_, T>) -> Self {
		match view.first() {
			Some(item) if view.ndim() == 0 => Addable::Item(item.clone().into()),
			_ => Addable::Seq(view.outer_iter().map(Self::from_view).collect()),
		}
	}

	/// The number of native items contained in the value.
	pub fn num_items(&self) -> usize {
		match self {
			Addable::Item(_) => 1,
			Addable::Named(inner, _) => inner.num_items(),
			Addable::Seq(items) => items.iter().map(Addable::num_items).sum(),
		}
	}
}

impl<A, S, D> From<ArrayBase<S, D>> for Addable
where
	A: Clone + Into<ModelItem>,
	S: Data<Elem = A>,
	D: Dimension,
{
	fn from(value: ArrayBase<S, D>) -> Self {
		Self::from_view(value.view().into_dyn())
	}
}

impl<A, S, D> From<&ArrayBase<S, D>> for Addable
where
	A: Clone + Into<ModelItem>,
	S: Data<Elem = A>,
	D: Dimension,
{
	fn from(value: &ArrayBase<S, D>) -> Self {
		Self::from_view(value.view().into_dyn())
	}
}

impl From<LinConstraint> for Addable {
	fn from(value: LinConstraint) -> Self {
		Self::Item(value.into())
	}
}

impl From<LinExpr> for Addable {
	fn from(value: LinExpr) -> Self {
		Self::Item(value.into())
	}
}

impl From<ModelItem> for Addable {
	fn from(value: ModelItem) -> Self {
		Self::Item(value)
	}
}

impl<T: Into<Addable>> From<(T, &str)> for Addable {
	fn from((value, name): (T, &str)) -> Self {
		Self::Named(Box::new(value.into()), name.to_owned())
	}
}

impl<T: Into<Addable>> From<(T, String)> for Addable {
	fn from((value, name): (T, String)) -> Self {
		Self::Named(Box::new(value.into()), name)
	}
}

impl From<Var> for Addable {
	fn from(value: Var) -> Self {
		Self::Item(value.into())
	}
}

impl<T: Into<Addable>> From<Vec<T>> for Addable {
	fn from(value: Vec<T>) -> Self {
		Self::Seq(value.into_iter().map(Into::into).collect())
	}
}

impl IterableModel {
	delegate! {
		to self.model {
			/// See [`Model::add_constraint`].
			pub fn add_constraint(&mut self, constraint: LinConstraint, name: Option<&str>) -> Result<(), ModelError>;
			/// See [`Model::check_duplicate_vars`].
			pub fn check_duplicate_vars(&self) -> Result<(), ModelError>;
			/// See [`Model::config`].
			pub fn config(&self) -> &ModelConfig;
			/// See [`Model::constraint`].
			pub fn constraint(&self, name: &str) -> Option<&LinConstraint>;
			/// See [`Model::constraints`].
			pub fn constraints(&self) -> impl Iterator<Item = (&str, &LinConstraint)> + '_;
			/// See [`Model::name`].
			pub fn name(&self) -> &str;
			/// See [`Model::new_var`].
			pub fn new_var(&mut self, name: impl Into<String>, options: &VarOptions) -> Var;
			/// See [`Model::num_constraints`].
			pub fn num_constraints(&self) -> usize;
			/// See [`Model::num_vars`].
			pub fn num_vars(&self) -> usize;
			/// See [`Model::objective`].
			pub fn objective(&self) -> Option<&LinExpr>;
			/// See [`Model::objective_name`].
			pub fn objective_name(&self) -> Option<&str>;
			/// See [`Model::sense`].
			pub fn sense(&self) -> Sense;
			/// See [`Model::set_objective`].
			pub fn set_objective(&mut self, objective: LinExpr, name: Option<&str>);
			/// See [`Model::var`].
			pub fn var(&self, var: Var) -> &VarDef;
			/// See [`Model::var_name`].
			pub fn var_name(&self, var: Var) -> &str;
			/// See [`Model::vars`].
			pub fn vars(&self) -> impl Iterator<Item = (Var, &VarDef)> + '_;
		}
	}

	/// Create a new empty model with the default configuration.
	pub fn new(name: impl Into<String>, sense: Sense) -> Self {
		Model::new(name, sense).into()
	}

	/// Create a new empty model with the given configuration.
	pub fn with_config(name: impl Into<String>, sense: Sense, config: ModelConfig) -> Self {
		Model::with_config(name, sense, config).into()
	}

	/// Add every native item in `item` to the model.
	///
	/// Items are added depth first, in the order of their positions. Items that
	/// are not given an explicit name are named by the model.
	pub fn add(&mut self, item: impl Into<Addable>) -> Result<&mut Self, ModelError> {
		self.flatten(item.into(), None)?;
		Ok(self)
	}

	/// Add every native item in `item` to the model, naming them after `name`
	/// and their position.
	///
	/// An empty name is treated as if no name was given.
	pub fn add_named(
		&mut self,
		item: impl Into<Addable>,
		name: &str,
	) -> Result<&mut Self, ModelError> {
		self.flatten(item.into(), Some(name))?;
		Ok(self)
	}

	/// Add a single native item under a generated name.
	///
	/// Generated names never collide, so unlike [`Self::add`] this cannot fail.
	fn add_anonymous(&mut self, item: ModelItem) {
		trace!("adding single anonymous item");
		match item {
			ModelItem::Constraint(con) => self.model += con,
			ModelItem::Objective(obj) => self.model += obj,
		}
	}

	/// Borrow the underlying [`Model`].
	pub fn as_model(&self) -> &Model {
		&self.model
	}

	/// Recursively add the native items in `item`, where `name` is the name
	/// inherited from the enclosing values.
	///
	/// The first error returned by the model stops the process; items added
	/// before the error remain in the model.
	fn flatten(&mut self, item: Addable, name: Option<&str>) -> Result<(), ModelError> {
		let name = name.filter(|n| !n.is_empty());
		match item {
			Addable::Item(item) => {
				trace!(name, "adding single item");
				self.model.add_item(item, name)
			}
			Addable::Named(inner, name) => self.flatten(*inner, Some(&name)),
			Addable::Seq(items) => {
				for (i, item) in items.into_iter().enumerate() {
					match name {
						Some(name) => self.flatten(item, Some(&format!("{name}_{i}")))?,
						None => self.flatten(item, None)?,
					}
				}
				Ok(())
			}
		}
	}

	/// Unwrap the underlying [`Model`].
	pub fn into_inner(self) -> Model {
		self.model
	}
}

impl<A, S, D> AddAssign<ArrayBase<S, D>> for IterableModel
where
	A: Clone + Into<ModelItem>,
	S: Data<Elem = A>,
	D: Dimension,
{
	fn add_assign(&mut self, rhs: ArrayBase<S, D>) {
		*self += &rhs;
	}
}

impl<A, S, D> AddAssign<&ArrayBase<S, D>> for IterableModel
where
	A: Clone + Into<ModelItem>,
	S: Data<Elem = A>,
	D: Dimension,
{
	fn add_assign(&mut self, rhs: &ArrayBase<S, D>) {
		// Logical order is the same depth first order used by `add`.
		for item in rhs.iter() {
			self.add_anonymous(item.clone().into());
		}
	}
}

impl AddAssign<LinConstraint> for IterableModel {
	fn add_assign(&mut self, rhs: LinConstraint) {
		self.add_anonymous(rhs.into());
	}
}

impl AddAssign<LinExpr> for IterableModel {
	fn add_assign(&mut self, rhs: LinExpr) {
		self.add_anonymous(rhs.into());
	}
}

impl AddAssign<Var> for IterableModel {
	fn add_assign(&mut self, rhs: Var) {
		self.add_anonymous(rhs.into());
	}
}

impl Display for IterableModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.model, f)
	}
}

impl From<IterableModel> for Model {
	fn from(value: IterableModel) -> Self {
		value.into_inner()
	}
}

impl From<Model> for IterableModel {
	fn from(value: Model) -> Self {
		Self { model: value }
	}
}

impl ModelActions for IterableModel {
	fn new_var(&mut self, name: String, options: &VarOptions) -> Var {
		self.model.new_var(name, options)
	}

	fn add_item(&mut self, item: ModelItem, name: Option<&str>) -> Result<(), ModelError> {
		self.model.add_item(item, name)
	}
}
