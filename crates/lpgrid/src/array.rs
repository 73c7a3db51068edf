//! Creation of n-dimensional arrays of decision variables, and the elementwise
//! relation of such arrays into arrays of linear constraints.

use std::fmt::Display;

use itertools::{EitherOrBoth, Itertools};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Zip};
use tracing::debug;

use crate::{LinConstraint, LinExpr, ModelActions, ModelError, Relation, Var, VarOptions};

/// An n-dimensional array of decision variables.
pub type VarArray = ArrayD<Var>;

/// An n-dimensional array of linear constraints.
pub type ConstraintArray = ArrayD<LinConstraint>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Specification of a single dimension of an array of decision variables.
pub enum DimSpec {
	/// The positions `0..n`, which are also used as labels.
	Range(usize),
	/// A list of labels, one for each position in the dimension.
	Labels(Vec<String>),
}

impl DimSpec {
	/// Create a dimension from a list of labels.
	///
	/// The labels are only used to name the variables, and do not have to be
	/// unique or numeric.
	pub fn labels<I>(labels: I) -> Self
	where
		I: IntoIterator,
		I::Item: Display,
	{
		Self::Labels(labels.into_iter().map(|l| l.to_string()).collect())
	}

	/// Whether the dimension has no positions.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The number of positions in the dimension.
	pub fn len(&self) -> usize {
		match self {
			DimSpec::Range(n) => *n,
			DimSpec::Labels(l) => l.len(),
		}
	}

	/// The labels of the positions in the dimension.
	fn into_labels(self) -> Vec<String> {
		match self {
			DimSpec::Range(n) => (0..n).map(|i| i.to_string()).collect(),
			DimSpec::Labels(l) => l,
		}
	}
}

impl<T: Display> From<&[T]> for DimSpec {
	fn from(value: &[T]) -> Self {
		Self::labels(value)
	}
}

impl<T: Display, const N: usize> From<[T; N]> for DimSpec {
	fn from(value: [T; N]) -> Self {
		Self::labels(value)
	}
}

impl From<i32> for DimSpec {
	/// Negative numbers result in an empty dimension.
	fn from(value: i32) -> Self {
		Self::Range(usize::try_from(value).unwrap_or(0))
	}
}

impl From<usize> for DimSpec {
	fn from(value: usize) -> Self {
		Self::Range(value)
	}
}

impl<T: Display> From<Vec<T>> for DimSpec {
	fn from(value: Vec<T>) -> Self {
		Self::labels(value)
	}
}

/// Create an n-dimensional array of new decision variables.
///
/// The shape of the array is given by the lengths of `dims`, in the order in
/// which they are given. The variable at position `[i, j, ..]` is named
/// `{name}_{a}_{b}..`, where `a` is the `i`-th label of the first dimension, `b`
/// is the `j`-th label of the second dimension, etc. All variables are created
/// with the same `options`.
///
/// Variable names are not checked for uniqueness, see
/// [`crate::Model::check_duplicate_vars`].
pub fn build_variables<M, I>(
	model: &mut M,
	name: &str,
	dims: I,
	options: &VarOptions,
) -> Result<VarArray, ModelError>
where
	M: ModelActions + ?Sized,
	I: IntoIterator,
	I::Item: Into<DimSpec>,
{
	let mut stack = dims
		.into_iter()
		.map(|d| Into::<DimSpec>::into(d).into_labels())
		.collect_vec();
	if stack.is_empty() {
		return Err(ModelError::NoDimensions);
	}
	let shape = stack.iter().map(Vec::len).collect_vec();

	// Dimensions are consumed from the end of the stack, so reversing it makes
	// the first dimension the outermost axis and the first name suffix.
	stack.reverse();
	let mut vars = Vec::with_capacity(shape.iter().product());
	build_level(model, name, &stack, options, &mut vars);

	let Ok(array) = ArrayD::from_shape_vec(IxDyn(&shape), vars) else {
		unreachable!("one variable is created for every position in the array")
	};
	debug!(name, ?shape, "created array of decision variables");
	Ok(array)
}

/// Create the variables for the dimension at the top of `stack`, and
/// (recursively) for all dimensions below it, in row-major order.
fn build_level<M: ModelActions + ?Sized>(
	model: &mut M,
	prefix: &str,
	stack: &[Vec<String>],
	options: &VarOptions,
	out: &mut Vec<Var>,
) {
	let Some((dim, rest)) = stack.split_last() else {
		return;
	};
	for label in dim {
		let name = format!("{prefix}_{label}");
		if rest.is_empty() {
			out.push(model.new_var(name, options));
		} else {
			build_level(model, &name, rest, options, out);
		}
	}
}

/// Compute the shape two arrays are broadcast to when they are combined
/// elementwise, or `None` if they cannot be combined.
///
/// Shapes are aligned on their last axis; an axis of length 1, or a missing
/// axis, is stretched to the length of the other.
fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Option<Vec<usize>> {
	let mut shape = lhs
		.iter()
		.rev()
		.zip_longest(rhs.iter().rev())
		.map(|pair| match pair {
			EitherOrBoth::Both(&l, &r) if l == r || r == 1 => Some(l),
			EitherOrBoth::Both(&1, &r) => Some(r),
			EitherOrBoth::Both(_, _) => None,
			EitherOrBoth::Left(&n) | EitherOrBoth::Right(&n) => Some(n),
		})
		.collect::<Option<Vec<_>>>()?;
	shape.reverse();
	Some(shape)
}

/// Relate two arrays elementwise, creating an array of linear constraints.
///
/// The element at every position of the result is the constraint `l relation
/// r`, where `l` and `r` are the elements at the same position in `lhs` and
/// `rhs`. Arrays of different shapes are broadcast to a common shape first, so
/// an array can, for example, be related to a single row.
pub fn relate<L, R, S1, S2, D1, D2>(
	relation: Relation,
	lhs: &ArrayBase<S1, D1>,
	rhs: &ArrayBase<S2, D2>,
) -> Result<ConstraintArray, ModelError>
where
	L: Clone + Into<LinExpr>,
	R: Clone + Into<LinExpr>,
	S1: Data<Elem = L>,
	S2: Data<Elem = R>,
	D1: Dimension,
	D2: Dimension,
{
	let err = || ModelError::Broadcast {
		lhs: lhs.shape().to_vec(),
		rhs: rhs.shape().to_vec(),
	};
	let shape = broadcast_shape(lhs.shape(), rhs.shape()).ok_or_else(err)?;
	let lhs = lhs.broadcast(IxDyn(&shape)).ok_or_else(err)?;
	let rhs = rhs.broadcast(IxDyn(&shape)).ok_or_else(err)?;
	Ok(Zip::from(&lhs)
		.and(&rhs)
		.map_collect(|l, r| LinConstraint::new(l.clone(), relation, r.clone())))
}

/// Relate every element of an array to the same right-hand side, creating an
/// array of linear constraints of the same shape.
pub fn relate_scalar<L, S, D>(
	relation: Relation,
	lhs: &ArrayBase<S, D>,
	rhs: impl Into<LinExpr>,
) -> ConstraintArray
where
	L: Clone + Into<LinExpr>,
	S: Data<Elem = L>,
	D: Dimension,
{
	let rhs: LinExpr = rhs.into();
	lhs.map(|l| LinConstraint::new(l.clone(), relation, rhs.clone()))
		.into_dyn()
}

#[cfg(test)]
mod tests {
	use expect_test::expect;
	use itertools::Itertools;
	use ndarray::{arr0, arr1, arr2, Array1};
	use tracing_test::traced_test;

	use crate::{
		array::broadcast_shape, build_variables, relate, relate_scalar, Category, DimSpec,
		Model, ModelError, Relation, Sense, VarOptions,
	};

	#[test]
	fn test_broadcast_shape() {
		assert_eq!(broadcast_shape(&[2, 3], &[2, 3]), Some(vec![2, 3]));
		assert_eq!(broadcast_shape(&[2, 3], &[3]), Some(vec![2, 3]));
		assert_eq!(broadcast_shape(&[2, 1], &[1, 4]), Some(vec![2, 4]));
		assert_eq!(broadcast_shape(&[], &[5]), Some(vec![5]));
		assert_eq!(broadcast_shape(&[2, 3], &[2]), None);
	}

	#[test]
	#[traced_test]
	fn test_integer_dims_shape() {
		let mut prb = Model::new("shape", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [2, 3, 4], &VarOptions::default()).unwrap();
		assert_eq!(x.shape(), &[2, 3, 4]);
		assert_eq!(prb.num_vars(), 24);
		let names = x.iter().map(|&v| prb.var_name(v)).unique().count();
		assert_eq!(names, 24);
		assert!(prb.check_duplicate_vars().is_ok());
		assert!(logs_contain("created array of decision variables"));
	}

	#[test]
	fn test_single_dim_names() {
		let mut prb = Model::new("single", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [5], &VarOptions::default()).unwrap();
		for (i, &v) in x.iter().enumerate() {
			assert_eq!(prb.var_name(v), format!("x_{i}"));
		}
	}

	#[test]
	fn test_two_dim_names() {
		let mut prb = Model::new("double", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [2, 3], &VarOptions::default()).unwrap();
		assert_eq!(x.shape(), &[2, 3]);
		// The first dimension is both the outer axis and the first suffix.
		assert_eq!(prb.var_name(x[[0, 1]]), "x_0_1");
		assert_eq!(prb.var_name(x[[1, 2]]), "x_1_2");
		expect![[r#"x_0_0, x_0_1, x_0_2, x_1_0, x_1_1, x_1_2"#]]
			.assert_eq(&x.iter().map(|&v| prb.var_name(v)).join(", "));
	}

	#[test]
	fn test_labelled_dims() {
		let mut prb = Model::new("labels", Sense::Minimize);
		let x = build_variables(
			&mut prb,
			"flow",
			[DimSpec::labels(["ams", "rtm"]), DimSpec::from(2)],
			&VarOptions::default(),
		)
		.unwrap();
		assert_eq!(x.shape(), &[2, 2]);
		expect![[r#"flow_ams_0, flow_ams_1, flow_rtm_0, flow_rtm_1"#]]
			.assert_eq(&x.iter().map(|&v| prb.var_name(v)).join(", "));
	}

	#[test]
	fn test_options_forwarded() {
		let mut prb = Model::new("opts", Sense::Minimize);
		let opts = VarOptions::default()
			.with_bounds(0.0, 10.0)
			.with_category(Category::Integer);
		let x = build_variables(&mut prb, "x", [2, 2], &opts).unwrap();
		for &v in x.iter() {
			let def = prb.var(v);
			assert_eq!(def.lower_bound(), Some(0.0));
			assert_eq!(def.upper_bound(), Some(10.0));
			assert_eq!(def.category(), Category::Integer);
		}
	}

	#[test]
	fn test_empty_dim() {
		let mut prb = Model::new("empty", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [3, 0], &VarOptions::default()).unwrap();
		assert_eq!(x.shape(), &[3, 0]);
		assert_eq!(prb.num_vars(), 0);
	}

	#[test]
	fn test_no_dims() {
		let mut prb = Model::new("none", Sense::Minimize);
		let res = build_variables(&mut prb, "x", Vec::<usize>::new(), &VarOptions::default());
		assert_eq!(res, Err(ModelError::NoDimensions));
	}

	#[test]
	fn test_colliding_labels() {
		let mut prb = Model::new("collide", Sense::Minimize);
		let x = build_variables(
			&mut prb,
			"x",
			[DimSpec::labels(["1", "1_1"]), DimSpec::labels(["1_1", "1"])],
			&VarOptions::default(),
		)
		.unwrap();
		assert_eq!(x.len(), 4);
		assert_eq!(prb.num_vars(), 4);
		assert_eq!(
			prb.check_duplicate_vars(),
			Err(ModelError::DuplicateVariableNames(vec!["x_1_1_1".to_owned()]))
		);
	}

	#[test]
	fn test_relate_same_shape() {
		let mut prb = Model::new("relate", Sense::Minimize);
		let a = build_variables(&mut prb, "a", [2, 2], &VarOptions::default()).unwrap();
		let b = build_variables(&mut prb, "b", [2, 2], &VarOptions::default()).unwrap();
		let cons = relate(Relation::Le, &a, &b).unwrap();
		assert_eq!(cons.shape(), &[2, 2]);
		for (idx, con) in cons.indexed_iter() {
			assert_eq!(con.relation(), Relation::Le);
			assert_eq!(con.coefficient(a[idx.clone()]), 1.0);
			assert_eq!(con.coefficient(b[idx.clone()]), -1.0);
			assert_eq!(con.terms().count(), 2);
			assert_eq!(con.rhs(), 0.0);
		}
	}

	#[test]
	fn test_relate_broadcast_row() {
		let mut prb = Model::new("row", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [2, 3], &VarOptions::default()).unwrap();
		let cap: Array1<f64> = arr1(&[1.0, 2.0, 3.0]);
		let cons = relate(Relation::Ge, &x, &cap).unwrap();
		assert_eq!(cons.shape(), &[2, 3]);
		assert_eq!(cons[[1, 2]].rhs(), 3.0);
		assert_eq!(cons[[1, 2]].coefficient(x[[1, 2]]), 1.0);
		assert_eq!(cons[[0, 0]].rhs(), 1.0);
	}

	#[test]
	fn test_relate_incompatible() {
		let mut prb = Model::new("bad", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [2, 3], &VarOptions::default()).unwrap();
		let y = build_variables(&mut prb, "y", [2], &VarOptions::default()).unwrap();
		assert_eq!(
			relate(Relation::Eq, &x, &y),
			Err(ModelError::Broadcast {
				lhs: vec![2, 3],
				rhs: vec![2],
			})
		);
	}

	#[test]
	fn test_relate_zero_dim() {
		let mut prb = Model::new("scalar", Sense::Minimize);
		let x = prb.new_var("x", &VarOptions::default());
		let cons = relate(Relation::Eq, &arr0(x), &arr0(4.0)).unwrap();
		assert_eq!(cons.ndim(), 0);
		assert_eq!(cons.first().map(|c| c.rhs()), Some(4.0));
	}

	#[test]
	fn test_relate_scalar() {
		let mut prb = Model::new("scalar", Sense::Minimize);
		let x = build_variables(&mut prb, "x", [3], &VarOptions::default()).unwrap();
		let sums = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
		let cons = relate_scalar(Relation::Le, &x, 7.0);
		assert_eq!(cons.shape(), &[3]);
		assert!(cons.iter().all(|c| c.rhs() == 7.0));

		let cons = relate_scalar(Relation::Ge, &sums, x[[0]] * 2.0);
		assert_eq!(cons.shape(), &[2, 2]);
		assert_eq!(cons[[1, 0]].coefficient(x[[0]]), -2.0);
		assert_eq!(cons[[1, 0]].rhs(), -3.0);
	}
}
