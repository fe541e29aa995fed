/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Evaluation walks the nodes in order, writing raw text as-is and
//! resolving each interpolation against an [`Environment`]. The first
//! missing variable or failing constraint aborts evaluation; whatever was
//! already written to the sink stays there.

use std::fmt::Write;

use tracing::debug;

use crate::ast::{Constraint, ConstraintKind, Interpolation, Node};
use crate::context::Environment;
use crate::error::{EvalError, TemplateResult};
use crate::parser::Template;

impl Template {
    /// The interpolations in this template, in source order.
    ///
    /// Useful to find out which variables a caller must supply.
    pub fn variables(&self) -> Vec<&Interpolation> {
        self.tree
            .nodes
            .iter()
            .filter_map(Node::as_interpolation)
            .collect()
    }

    /// Execute this template, writing output to `out` as it goes.
    pub fn execute<W: Write + ?Sized>(
        &self,
        out: &mut W,
        env: &Environment,
    ) -> Result<(), EvalError> {
        for node in &self.tree.nodes {
            let text = evaluate_node(node, env).inspect_err(|err| {
                debug!(error = %err, variable = err.variable(), "template evaluation failed");
            })?;
            out.write_str(text)?;
        }
        Ok(())
    }

    /// Render this template to a string.
    ///
    /// # Returns
    /// The rendered output, or the first evaluation error.
    pub fn render(&self, env: &Environment) -> Result<String, EvalError> {
        let mut out = String::with_capacity(self.source.len());
        self.execute(&mut out, env)?;
        Ok(out)
    }
}

/// Compile `source` and render it against `env` in one step.
pub fn render(source: &str, env: &Environment) -> TemplateResult<String> {
    let template = Template::compile(source)?;
    Ok(template.render(env)?)
}

fn evaluate_node<'a>(node: &'a Node, env: &'a Environment) -> Result<&'a str, EvalError> {
    match node {
        Node::Raw(raw) => Ok(&raw.text),
        Node::Interpolation(interp) => evaluate_interpolation(interp, env),
    }
}

fn evaluate_interpolation<'a>(
    interp: &Interpolation,
    env: &'a Environment,
) -> Result<&'a str, EvalError> {
    let name = interp.name();
    let value = env.get(name).ok_or_else(|| EvalError::VariableNotFound {
        name: name.to_string(),
    })?;

    for constraint in &interp.constraints {
        check_constraint(name, constraint, value)?;
    }

    Ok(value)
}

/// Check `value` (bound to `variable`) against a single constraint.
pub fn check_constraint(
    variable: &str,
    constraint: &Constraint,
    value: &str,
) -> Result<(), EvalError> {
    match constraint.kind() {
        ConstraintKind::Int => {
            if value.parse::<i64>().is_err() {
                return Err(EvalError::NotAnInteger {
                    variable: variable.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(())
        }
        ConstraintKind::Len => check_length(variable, &constraint.args, value),
        ConstraintKind::Unknown => Err(EvalError::UnknownConstraint {
            variable: variable.to_string(),
            name: constraint.name.clone(),
            args: constraint.args.clone(),
        }),
    }
}

/// `len(n)` requires exactly `n` characters; `len(min, max)` requires a
/// length in `min..=max`. Length counts characters, not bytes.
fn check_length(variable: &str, args: &[String], value: &str) -> Result<(), EvalError> {
    let actual = value.chars().count();
    let parse_arg = |arg: &String| {
        arg.parse::<i64>().map_err(|_| EvalError::InvalidArgument {
            variable: variable.to_string(),
            argument: arg.clone(),
        })
    };

    match args {
        [] => Err(EvalError::MissingArguments {
            variable: variable.to_string(),
        }),
        [expected] => {
            let expected = parse_arg(expected)?;
            if !length_eq(actual, expected) {
                return Err(EvalError::LengthMismatch {
                    variable: variable.to_string(),
                    expected,
                    actual,
                });
            }
            Ok(())
        }
        [min, max] => {
            let min = parse_arg(min)?;
            let max = parse_arg(max)?;
            if !length_within(actual, min, max) {
                return Err(EvalError::LengthOutOfRange {
                    variable: variable.to_string(),
                    actual,
                    min,
                    max,
                });
            }
            Ok(())
        }
        _ => Err(EvalError::InvalidArguments {
            variable: variable.to_string(),
            args: args.to_vec(),
        }),
    }
}

fn length_eq(actual: usize, expected: i64) -> bool {
    i64::try_from(actual).is_ok_and(|actual| actual == expected)
}

fn length_within(actual: usize, min: i64, max: i64) -> bool {
    i64::try_from(actual).is_ok_and(|actual| (min..=max).contains(&actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceSpan;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> Template {
        Template::compile(source).expect("template should parse")
    }

    fn env(pairs: &[(&str, &str)]) -> Environment {
        pairs.iter().copied().collect()
    }

    fn len(args: &[&str]) -> Constraint {
        Constraint::with_args(
            "len",
            args.iter().map(|a| a.to_string()).collect(),
            SourceSpan::default(),
        )
    }

    #[test]
    fn test_literal_text() {
        let template = compile("Hello, world!");
        assert_eq!(template.render(&Environment::new()).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_empty_template() {
        let template = compile("");
        assert_eq!(template.render(&Environment::new()).unwrap(), "");
        assert!(template.variables().is_empty());
    }

    #[test]
    fn test_simple_variable() {
        let template = compile("Hello, %name%!");
        let out = template.render(&env(&[("name", "Alice")])).unwrap();
        assert_eq!(out, "Hello, Alice!");
    }

    #[test]
    fn test_adjacent_interpolations() {
        let template = compile("%a%%b%");
        let out = template.render(&env(&[("a", "1"), ("b", "2")])).unwrap();
        assert_eq!(out, "12");
    }

    #[test]
    fn test_int_and_len() {
        let template = compile("val: %bar:int:len(2)%");
        assert_eq!(template.render(&env(&[("bar", "52")])).unwrap(), "val: 52");
    }

    #[test]
    fn test_int_accepts_sign() {
        let template = compile("%n:int%");
        assert_eq!(template.render(&env(&[("n", "-17")])).unwrap(), "-17");
        assert_eq!(template.render(&env(&[("n", "+3")])).unwrap(), "+3");
    }

    #[test]
    fn test_int_rejects_non_integers() {
        let template = compile("%bar:int%");
        for value in ["abc", "", "1.5", " 1", "99999999999999999999"] {
            let err = template.render(&env(&[("bar", value)])).unwrap_err();
            assert!(matches!(err, EvalError::NotAnInteger { .. }), "{:?}", value);
        }
        let err = template.render(&env(&[("bar", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "int constraint: value abc must be an integer");
    }

    #[test]
    fn test_missing_variable() {
        let template = compile("hello %name%");
        let err = template.render(&env(&[("foo", "bar")])).unwrap_err();
        assert_eq!(err.to_string(), "variable name not found");
        assert_eq!(err.variable(), Some("name"));
    }

    #[test]
    fn test_partial_output_is_kept() {
        let template = compile("a %x% b %y% c");
        let mut out = String::new();
        let err = template.execute(&mut out, &env(&[("x", "1")])).unwrap_err();
        assert!(matches!(err, EvalError::VariableNotFound { .. }));
        assert_eq!(out, "a 1 b ");
    }

    #[test]
    fn test_constraints_short_circuit_in_order() {
        let template = compile("%v:len(5):int%");
        let err = template.render(&env(&[("v", "abc")])).unwrap_err();
        assert!(matches!(err, EvalError::LengthMismatch { .. }));

        let template = compile("%v:int:len(5)%");
        let err = template.render(&env(&[("v", "abc")])).unwrap_err();
        assert!(matches!(err, EvalError::NotAnInteger { .. }));
    }

    #[test]
    fn test_len_exact() {
        assert!(check_constraint("v", &len(&["3"]), "abc").is_ok());
        let err = check_constraint("v", &len(&["5"]), "123").unwrap_err();
        assert_eq!(err.to_string(), "len constraint: expected length 5, got 3");
    }

    #[test]
    fn test_len_counts_characters() {
        assert!(check_constraint("v", &len(&["4"]), "äöüß").is_ok());
        assert!(check_constraint("v", &len(&["1", "2"]), "日本").is_ok());
    }

    #[test]
    fn test_len_range_is_inclusive() {
        let c = len(&["3", "5"]);
        for ok in ["abc", "abcd", "abcde"] {
            assert!(check_constraint("v", &c, ok).is_ok(), "{}", ok);
        }
        let err = check_constraint("v", &c, "ab").unwrap_err();
        assert_eq!(err.to_string(), "len constraint: length 2 outside range 3-5");
        assert!(check_constraint("v", &c, "abcdef").is_err());
    }

    #[test]
    fn test_len_without_arguments() {
        let template = compile("%v:len%");
        let err = template.render(&env(&[("v", "abc")])).unwrap_err();
        assert!(matches!(err, EvalError::MissingArguments { .. }));
        assert_eq!(err.to_string(), "len constraint: missing argument(s)");
    }

    #[test]
    fn test_len_with_too_many_arguments() {
        let template = compile("%v:len(1,2,3)%");
        let err = template.render(&env(&[("v", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "len constraint: invalid arguments: 1,2,3");
    }

    #[test]
    fn test_len_argument_out_of_range() {
        let err = check_constraint("v", &len(&["99999999999999999999"]), "a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "len constraint: argument 99999999999999999999 must be an integer"
        );
    }

    #[test]
    fn test_unknown_constraint_fails_at_evaluation() {
        let c = Constraint::with_args("upper", vec!["1".into()], SourceSpan::default());
        let err = check_constraint("v", &c, "abc").unwrap_err();
        assert_eq!(err.to_string(), "unknown constraint: upper(1)");
    }

    #[test]
    fn test_variables_in_source_order() {
        let template = compile("%b:int% and %a:len(1,2)% then %b%");
        let vars: Vec<(&str, usize)> = template
            .variables()
            .iter()
            .map(|v| (v.name(), v.constraints.len()))
            .collect();
        assert_eq!(vars, vec![("b", 1), ("a", 1), ("b", 0)]);
    }

    #[test]
    fn test_repeated_evaluation() {
        let template = compile("%code:len(3,5)%");
        assert_eq!(template.render(&env(&[("code", "ABCD")])).unwrap(), "ABCD");
        assert!(template.render(&env(&[("code", "AB")])).is_err());
        assert_eq!(template.render(&env(&[("code", "XYZ")])).unwrap(), "XYZ");
    }

    #[test]
    fn test_one_shot_render() {
        let out = render("Hi %who%", &env(&[("who", "there")])).unwrap();
        assert_eq!(out, "Hi there");
        assert!(matches!(
            render("%%", &Environment::new()),
            Err(crate::TemplateError::Compile(_))
        ));
        assert!(matches!(
            render("%x%", &Environment::new()),
            Err(crate::TemplateError::Eval(_))
        ));
    }
}
