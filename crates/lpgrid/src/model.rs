//! Module that defines the data structures used to formulate, i.e. model, a
//! linear program: decision variables, linear constraints, and the errors that
//! can occur while building a [`crate::Model`].

pub(crate) mod constraint;
pub(crate) mod error;
pub(crate) mod var;
