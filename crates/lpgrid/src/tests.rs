//! Tests that combine arrays of variables, relations, and models.

use expect_test::expect;
use ndarray::{arr1, arr2, Array1, Axis};
use tracing_test::traced_test;

use crate::{
	build_variables, relate, relate_scalar, Category, DimSpec, IterableModel, LinExpr, Model, ModelActions,
	ModelError, Relation, Sense, VarArray, VarOptions,
};

/// Create a 2 by 2 grid of non-negative variables in any model container.
fn grid<M: ModelActions>(prb: &mut M, name: &str) -> Result<VarArray, ModelError> {
	build_variables(
		prb,
		name,
		[DimSpec::labels(["ams", "rtm"]), DimSpec::labels(["x", "y"])],
		&VarOptions::default().with_lower_bound(0.0),
	)
}

#[test]
#[traced_test]
fn test_transport_model() -> Result<(), ModelError> {
	let mut prb = IterableModel::new("transport", Sense::Minimize);
	let ship = grid(&mut prb, "ship")?;
	let supply = arr1(&[20.0, 30.0]);
	let demand = arr1(&[25.0, 15.0]);
	let cost = arr2(&[[2.0, 3.0], [4.0, 1.0]]);

	let total: LinExpr = ship
		.iter()
		.zip(cost.iter())
		.map(|(&v, &c)| v * c)
		.sum();
	let _ = prb.add((total, "cost"))?;

	let outflow: Array1<LinExpr> = ship
		.outer_iter()
		.map(|row| row.iter().copied().sum())
		.collect();
	let _ = prb.add_named(relate(Relation::Le, &outflow, &supply)?, "supply")?;

	let inflow: Array1<LinExpr> = ship
		.axis_iter(Axis(1))
		.map(|col| col.iter().copied().sum())
		.collect();
	let _ = prb.add_named(relate(Relation::Ge, &inflow, &demand)?, "demand")?;

	expect![[r#"
		transport:
		MINIMIZE
		cost: 2 ship_ams_x + 3 ship_ams_y + 4 ship_rtm_x + ship_rtm_y
		SUBJECT TO
		supply_0: ship_ams_x + ship_ams_y <= 20
		supply_1: ship_rtm_x + ship_rtm_y <= 30
		demand_0: ship_ams_x + ship_rtm_x >= 25
		demand_1: ship_ams_y + ship_rtm_y >= 15
		VARIABLES
		ship_ams_x >= 0 Continuous
		ship_ams_y >= 0 Continuous
		ship_rtm_x >= 0 Continuous
		ship_rtm_y >= 0 Continuous"#]]
	.assert_eq(prb.to_string().trim_end());
	assert!(logs_contain("created array of decision variables"));
	Ok(())
}

#[test]
fn test_model_add_assign() {
	let mut prb = Model::new("knap", Sense::Maximize);
	let x = prb.new_var("x", &VarOptions::default().with_category(Category::Binary));
	let y = prb.new_var(
		"y",
		&VarOptions::default()
			.with_bounds(0.0, 4.5)
			.with_category(Category::Integer),
	);
	let z = prb.new_var("z", &VarOptions::default().with_upper_bound(3.0));
	let w = prb.new_var("w", &VarOptions::default());

	prb += x * 5.0 + y - z * 0.5 + 1.0;
	prb += (x * 2.0 + y * 3.0).leq(7.0);
	prb += (z - w).geq(-2.0);
	prb += (w * -1.0).equal_to(x);

	expect![[r#"
		knap:
		MAXIMIZE
		5 x + y - 0.5 z + 1
		SUBJECT TO
		_C1: 2 x + 3 y <= 7
		_C2: z - w >= -2
		_C3: -w - x = 0
		VARIABLES
		0 <= x <= 1 Binary
		0 <= y <= 4.5 Integer
		z <= 3 Continuous
		w free Continuous"#]]
	.assert_eq(prb.to_string().trim_end());
}

#[test]
fn test_zero_right_hand_side() -> Result<(), ModelError> {
	let mut prb = IterableModel::new("zero", Sense::Minimize);
	let x = prb.new_var("x", &VarOptions::default());
	let y = build_variables(&mut prb, "y", [2], &VarOptions::default())?;
	prb += LinExpr::from(x).geq(0.0);
	prb += (x - y[[0]]).equal_to(-0.0);
	let _ = prb.add_named(relate_scalar(Relation::Ge, &y, 0.0), "nn")?;

	expect![[r#"
		zero:
		MINIMIZE
		0
		SUBJECT TO
		_C1: x >= 0
		_C2: x - y_0 = 0
		nn_0: y_0 >= 0
		nn_1: y_1 >= 0
		VARIABLES
		x free Continuous
		y_0 free Continuous
		y_1 free Continuous"#]]
	.assert_eq(prb.to_string().trim_end());
	assert!(prb.constraints().all(|(_, c)| c.rhs().is_sign_positive()));
	Ok(())
}

#[test]
fn test_unused_name_skips_taken() {
	let mut prb = Model::new("skip", Sense::Minimize);
	let x = prb.new_var("x", &VarOptions::default());
	prb.add_constraint(LinExpr::from(x).geq(0.0), Some("_C2"))
		.unwrap();
	prb += LinExpr::from(x).leq(1.0);
	prb += LinExpr::from(x).leq(2.0);
	let names: Vec<_> = prb.constraints().map(|(n, _)| n).collect();
	assert_eq!(names, vec!["_C2", "_C1", "_C3"]);
}

#[test]
fn test_substitutable_containers() {
	let mut plain = Model::new("plain", Sense::Minimize);
	let mut iterable = IterableModel::new("iterable", Sense::Minimize);
	let a = grid(&mut plain, "a").unwrap();
	let b = grid(&mut iterable, "a").unwrap();
	assert_eq!(a.shape(), b.shape());
	for (&va, &vb) in a.iter().zip(b.iter()) {
		assert_eq!(plain.var_name(va), iterable.var_name(vb));
	}

	// The single item path of both containers behaves the same.
	for con in relate(Relation::Le, &a, &arr1(&[1.0, 2.0])).unwrap().iter() {
		plain.add_item(con.clone().into(), None).unwrap();
	}
	let _ = iterable
		.add(relate(Relation::Le, &b, &arr1(&[1.0, 2.0])).unwrap())
		.unwrap();
	assert_eq!(plain.num_constraints(), 4);
	let plain_names: Vec<_> = plain.constraints().map(|(n, _)| n).collect();
	let iter_names: Vec<_> = iterable.constraints().map(|(n, _)| n).collect();
	assert_eq!(plain_names, iter_names);
}

#[test]
fn test_lin_expr_merges_terms() {
	let mut prb = Model::new("expr", Sense::Minimize);
	let x = prb.new_var("x", &VarOptions::default());
	let y = prb.new_var("y", &VarOptions::default());

	let e = x * 2.0 + y - x * 2.0 + 3.0;
	assert_eq!(e.terms().collect::<Vec<_>>(), vec![(y, 1.0)]);
	assert_eq!(e.constant(), 3.0);

	let s: LinExpr = [x, y, x].into_iter().sum();
	assert_eq!(s.coefficient(x), 2.0);
	assert_eq!((-s.clone()).coefficient(y), -1.0);
	assert_eq!((2.0 * s).coefficient(x), 4.0);
}
