//! Diagnostic scripts attached to a record's `code` section.
//!
//! A script is a JMESPath expression, optionally preceded by an arrow
//! header naming its parameters:
//!
//! ```text
//! script  := arrow | body
//! arrow   := params "=>" body
//! params  := ident | "(" ident ("," ident)? ")"
//! ```
//!
//! With an arrow the body runs against an object binding the first
//! parameter to the response and the second to the whole record, so
//! `e => e.length` and `(res, rec) => rec.general.url` both work. A bare
//! name that is not a parameter is an error. Without an arrow the body runs
//! with the response as `@`.

use crate::expression;
use jmespath::ast::Ast;
use serde_json::{Map, Value};

/// Errors raised while parsing or running a script
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("script is empty")]
    Empty,
    #[error("script body is empty")]
    EmptyBody,
    #[error("arrow functions take one or two parameters, got {0}")]
    Arity(usize),
    #[error("invalid parameter name: {0:?}")]
    InvalidParameter(String),
    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),
    #[error("{0} is not defined")]
    UndefinedName(String),
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("unsupported result: {0}")]
    UnsupportedResult(String),
    #[error("failed to copy script input: {0}")]
    Input(String),
}

/// A parsed, syntax-checked script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    params: Vec<String>,
    body: String,
    ast: Ast,
}

impl Script {
    /// Parse script source.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ScriptError::Empty);
        }

        let (params, body) = match split_arrow(source) {
            Some((header, body)) => (parse_params(header)?, body.trim()),
            None => (Vec::new(), source),
        };

        if body.is_empty() {
            return Err(ScriptError::EmptyBody);
        }
        let ast = expression::parse(body)?;
        if !params.is_empty() {
            check_names(&ast, &params)?;
        }

        Ok(Self {
            params,
            body: body.to_string(),
            ast,
        })
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Run the script. Both inputs are taken by value so the script only
    /// ever sees its own copies.
    pub fn run(&self, response: Value, record: Value) -> Result<Value, ScriptError> {
        let root = match self.params.as_slice() {
            [] => response,
            [first] => bind([(first, response)]),
            [first, second, ..] => bind([(first, response), (second, record)]),
        };
        expression::evaluate_ast(&self.body, self.ast.clone(), &root)
    }
}

/// Reject fields looked up on the parameter scope that no parameter
/// declares. Only nodes evaluated against the scope itself are checked;
/// right-hand sides of subexpressions, projections and expression
/// references see inner values.
fn check_names(ast: &Ast, params: &[String]) -> Result<(), ScriptError> {
    match ast {
        Ast::Field { name, .. } => {
            if params.iter().any(|p| p == name) {
                Ok(())
            } else {
                Err(ScriptError::UndefinedName(name.clone()))
            }
        }
        Ast::Subexpr { lhs, .. } | Ast::Projection { lhs, .. } => check_names(lhs, params),
        Ast::Comparison { lhs, rhs, .. } | Ast::And { lhs, rhs, .. } | Ast::Or { lhs, rhs, .. } => {
            check_names(lhs, params)?;
            check_names(rhs, params)
        }
        Ast::Condition {
            predicate, then, ..
        } => {
            check_names(predicate, params)?;
            check_names(then, params)
        }
        Ast::Flatten { node, .. } | Ast::Not { node, .. } | Ast::ObjectValues { node, .. } => {
            check_names(node, params)
        }
        Ast::Function { args, .. } => args.iter().try_for_each(|arg| check_names(arg, params)),
        Ast::MultiList { elements, .. } => elements
            .iter()
            .try_for_each(|element| check_names(element, params)),
        Ast::MultiHash { elements, .. } => elements
            .iter()
            .try_for_each(|pair| check_names(&pair.value, params)),
        Ast::Identity { .. }
        | Ast::Expref { .. }
        | Ast::Index { .. }
        | Ast::Literal { .. }
        | Ast::Slice { .. } => Ok(()),
    }
}

fn bind<'a, const N: usize>(pairs: [(&'a String, Value); N]) -> Value {
    let mut scope = Map::new();
    for (name, value) in pairs {
        scope.insert(name.clone(), value);
    }
    Value::Object(scope)
}

/// Split `header => body` when the text before the first `=>` looks like a
/// parameter list.
fn split_arrow(source: &str) -> Option<(&str, &str)> {
    let (header, body) = source.split_once("=>")?;
    let header = header.trim();
    let looks_like_params = (header.starts_with('(') && header.ends_with(')'))
        || (!header.is_empty() && header.chars().all(is_ident_char));
    looks_like_params.then_some((header, body))
}

fn parse_params(header: &str) -> Result<Vec<String>, ScriptError> {
    let inner = header
        .strip_prefix('(')
        .and_then(|h| h.strip_suffix(')'))
        .unwrap_or(header)
        .trim();

    let names: Vec<&str> = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };

    if names.is_empty() || names.len() > 2 {
        return Err(ScriptError::Arity(names.len()));
    }

    let mut params: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !is_identifier(name) {
            return Err(ScriptError::InvalidParameter(name.to_string()));
        }
        if params.iter().any(|p| p == name) {
            return Err(ScriptError::DuplicateParameter(name.to_string()));
        }
        params.push(name.to_string());
    }
    Ok(params)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// JMESPath unquoted identifier: `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_ident_char),
        _ => false,
    }
}
