//! Expression evaluation on a Rhai engine.
//!
//! A resolved token stream is checked against the formula grammar and
//! rendered to a Rhai expression in which:
//!
//! - every number and string literal is a scope constant (`v0`, `v1`, ...),
//!   so no user text is ever parsed as Rhai source;
//! - every range placeholder indexes the `ranges` scope array of bound
//!   [`ExpandedRange`]s;
//! - the only callable names are the registered built-ins.
//!
//! Rhai then compiles the expression (statements and assignments are
//! rejected by expression mode) and evaluates it.

use rhai::{Array, Dynamic, Engine, Scope};
use tracing::trace;

use super::grid::CellGrid;
use super::range::ExpandedRange;
use super::resolve::ResolvedExpression;
use super::token::{RANGES_VAR, Token};
use crate::config::EngineConfig;
use crate::error::{FormulaError, Result};

/// Create a Rhai engine with built-ins registered and limits applied.
pub fn create_engine(config: &EngineConfig) -> Engine {
    let mut engine = Engine::new();
    engine.set_fast_operators(false);
    engine.set_max_operations(config.max_operations);
    engine.set_max_expr_depths(config.max_expr_depth, config.max_expr_depth);
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// Rhai source plus the scope holding its literals and ranges.
pub struct Script {
    pub source: String,
    pub scope: Scope<'static>,
}

/// Render resolved tokens to a Rhai expression.
pub fn render_script(tokens: &[Token], ranges: Vec<ExpandedRange>) -> Result<Script> {
    let mut scope = Scope::new();
    let mut source = String::new();
    let mut literals = 0usize;
    let mut bind = |scope: &mut Scope<'static>, value: Dynamic| -> String {
        let name = format!("v{}", literals);
        literals += 1;
        scope.push_constant_dynamic(name.clone(), value);
        name
    };

    for token in tokens {
        match token {
            Token::Number(text) => {
                let n = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::UnsupportedToken(text.clone()))?;
                source.push_str(&bind(&mut scope, Dynamic::from(n)));
            }
            Token::Str(s) => source.push_str(&bind(&mut scope, Dynamic::from(s.clone()))),
            Token::Ident(name) if crate::builtins::is_builtin(name) => source.push_str(name),
            Token::Ident(name) => return Err(FormulaError::UnknownFunction(name.clone())),
            Token::Placeholder(index) if *index < ranges.len() => {
                source.push_str(&format!("{}[{}]", RANGES_VAR, index));
            }
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::LParen
            | Token::RParen
            | Token::Comma
            | Token::ListOpen
            | Token::ListClose => source.push_str(&token.to_string()),
            Token::Space(_) => source.push(' '),
            other => return Err(FormulaError::UnsupportedToken(other.to_string())),
        }
    }

    let ranges: Array = ranges.into_iter().map(Dynamic::from).collect();
    scope.push_constant(RANGES_VAR, ranges);
    Ok(Script { source, scope })
}

/// Evaluates resolved expressions.
pub struct Evaluator {
    engine: Engine,
}

impl Evaluator {
    pub fn new(config: &EngineConfig) -> Self {
        Evaluator {
            engine: create_engine(config),
        }
    }

    /// Bind the expression's ranges against `grid` and evaluate it.
    pub fn evaluate(&self, expr: &ResolvedExpression, grid: &dyn CellGrid) -> Result<Dynamic> {
        let mut script = render_script(&expr.tokens, expr.ranges.bind(grid))?;
        trace!(script = %script.source, "evaluating");
        let value = self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut script.scope, &script.source)?;
        Ok(value)
    }
}
