//! JMESPath evaluation over `serde_json` values.
//!
//! This is the only evaluator scripts can reach: no host functions, no I/O,
//! no access to anything but the value handed in as the root.
//!
//! On top of the builtin functions, `x.length` reads the size of an array
//! or string. Objects keep plain field lookup.

use crate::script::ScriptError;
use jmespath::ast::{Ast, KeyValuePair};
use jmespath::functions::{ArgumentType, CustomFunction, Signature};
use jmespath::{Context, Expression, JmespathError, Rcvar, Runtime, Variable};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::LazyLock;

/// Function `x.length` member access is rewritten to
pub const MEMBER_LENGTH: &str = "member_length";

static RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    let mut runtime = Runtime::new();
    runtime.register_builtin_functions();
    runtime.register_function(
        MEMBER_LENGTH,
        Box::new(CustomFunction::new(
            Signature::new(vec![ArgumentType::Any], None),
            Box::new(member_length),
        )),
    );
    runtime
});

fn member_length(args: &[Rcvar], _ctx: &mut Context<'_>) -> Result<Rcvar, JmespathError> {
    let length = match args.first().map(|arg| arg.as_ref()) {
        Some(Variable::Array(items)) => Variable::Number(Number::from(items.len())),
        Some(Variable::String(s)) => Variable::Number(Number::from(s.chars().count())),
        Some(Variable::Object(map)) => {
            return Ok(map
                .get("length")
                .cloned()
                .unwrap_or_else(|| Rcvar::new(Variable::Null)))
        }
        _ => Variable::Null,
    };
    Ok(Rcvar::new(length))
}

/// Convert serde_json::Value to jmespath::Variable.
pub fn to_variable(value: &Value) -> Rc<Variable> {
    let variable = match value {
        Value::Null => Variable::Null,
        Value::Bool(b) => Variable::Bool(*b),
        Value::Number(n) => Variable::Number(n.clone()),
        Value::String(s) => Variable::String(s.clone()),
        Value::Array(items) => Variable::Array(items.iter().map(to_variable).collect()),
        Value::Object(map) => Variable::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_variable(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    };
    Rc::new(variable)
}

/// Convert jmespath::Variable back to serde_json::Value.
///
/// Expression references (`&expr`) have no JSON form and are rejected.
pub fn from_variable(variable: &Rc<Variable>) -> Result<Value, ScriptError> {
    match variable.as_ref() {
        Variable::Null => Ok(Value::Null),
        Variable::Bool(b) => Ok(Value::Bool(*b)),
        Variable::Number(n) => Ok(Value::Number(n.clone())),
        Variable::String(s) => Ok(Value::String(s.clone())),
        Variable::Array(items) => items
            .iter()
            .map(from_variable)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Variable::Object(map) => map
            .iter()
            .map(|(k, v)| from_variable(v).map(|value| (k.clone(), value)))
            .collect::<Result<Map<_, _>, _>>()
            .map(Value::Object),
        Variable::Expref(_) => Err(ScriptError::UnsupportedResult(
            "expression reference".to_string(),
        )),
    }
}

/// Parse an expression into its AST with `x.length` rewritten.
pub fn parse(expression: &str) -> Result<Ast, ScriptError> {
    jmespath::parse(expression)
        .map(rewrite_length)
        .map_err(|e| ScriptError::Syntax(e.to_string()))
}

/// Evaluate an expression with `root` as `@`.
pub fn evaluate(expression: &str, root: &Value) -> Result<Value, ScriptError> {
    evaluate_ast(expression, parse(expression)?, root)
}

/// Evaluate an already parsed expression. `expression` is only used in
/// error messages.
pub fn evaluate_ast(expression: &str, ast: Ast, root: &Value) -> Result<Value, ScriptError> {
    let expr = Expression::new(expression, ast, &*RUNTIME);
    let root_var = to_variable(root);
    let result = expr
        .search(&root_var)
        .map_err(|e| ScriptError::Runtime(e.to_string()))?;
    from_variable(&result)
}

fn rewrite_length(ast: Ast) -> Ast {
    let boxed = |node: Box<Ast>| Box::new(rewrite_length(*node));
    match ast {
        Ast::Subexpr { offset, lhs, rhs } => match *rhs {
            Ast::Field { name, .. } if name == "length" => Ast::Function {
                offset,
                name: MEMBER_LENGTH.to_string(),
                args: vec![rewrite_length(*lhs)],
            },
            rhs => Ast::Subexpr {
                offset,
                lhs: boxed(lhs),
                rhs: Box::new(rewrite_length(rhs)),
            },
        },
        Ast::Comparison {
            offset,
            comparator,
            lhs,
            rhs,
        } => Ast::Comparison {
            offset,
            comparator,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        },
        Ast::Condition {
            offset,
            predicate,
            then,
        } => Ast::Condition {
            offset,
            predicate: boxed(predicate),
            then: boxed(then),
        },
        Ast::Expref { offset, ast } => Ast::Expref {
            offset,
            ast: boxed(ast),
        },
        Ast::Flatten { offset, node } => Ast::Flatten {
            offset,
            node: boxed(node),
        },
        Ast::Not { offset, node } => Ast::Not {
            offset,
            node: boxed(node),
        },
        Ast::ObjectValues { offset, node } => Ast::ObjectValues {
            offset,
            node: boxed(node),
        },
        Ast::Function { offset, name, args } => Ast::Function {
            offset,
            name,
            args: args.into_iter().map(rewrite_length).collect(),
        },
        Ast::MultiList { offset, elements } => Ast::MultiList {
            offset,
            elements: elements.into_iter().map(rewrite_length).collect(),
        },
        Ast::MultiHash { offset, elements } => Ast::MultiHash {
            offset,
            elements: elements
                .into_iter()
                .map(|pair| KeyValuePair {
                    key: pair.key,
                    value: rewrite_length(pair.value),
                })
                .collect(),
        },
        Ast::Projection { offset, lhs, rhs } => Ast::Projection {
            offset,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        },
        Ast::And { offset, lhs, rhs } => Ast::And {
            offset,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        },
        Ast::Or { offset, lhs, rhs } => Ast::Or {
            offset,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        },
        leaf @ (Ast::Identity { .. }
        | Ast::Field { .. }
        | Ast::Index { .. }
        | Ast::Literal { .. }
        | Ast::Slice { .. }) => leaf,
    }
}
