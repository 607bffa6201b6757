//! Parametric surface programs
//!
//! A program describes a surface point for parameters `u` and `v` in `[0, 1]`. It
//! is a list of assignments separated by `;` or line breaks and must assign `x`,
//! `y` and `z`:
//!
//! ```text
//! let r = 1 + 0.25 * cos(v * 2 * pi)
//! x = r * cos(u * 2 * pi)
//! y = 0.25 * sin(v * 2 * pi)
//! z = r * sin(u * 2 * pi)
//! ```
//!
//! Right-hand sides are Lua expressions, parsed with `full_moon`: numbers, `u`,
//! `v`, earlier assignments, the constants `pi` and `e`, `+ - * / % ^` (`**` is
//! accepted for `^`), unary minus, parentheses and the math functions listed in
//! [`MathFn`]. Function names and constants may carry a `Math.` or `math.` prefix.
//! Assignments may start with `let`, `var`, `const` or `local`. Comments start
//! with `//` or `--`.
//!
//! Programs compile once into a slot-addressed tree and are then evaluated per
//! sample without allocation beyond the scratch slots.

use full_moon::ast::{self, BinOp, Call, FunctionArgs, Index, LastStmt, Prefix, Suffix, UnOp, Var};
use full_moon::tokenizer::TokenReference;
use thiserror::Error;

/// Most operators, brackets and block keywords one statement may contain
///
/// Bounds the nesting depth of every expression tree, so parsing and evaluation
/// cannot exhaust the stack.
pub const MAX_NESTING: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Expected an assignment 'name = expression', got '{0}'")]
    InvalidStatement(String),
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Unsupported {0}")]
    Unsupported(String),
    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Function {name} takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Program never assigns '{0}'")]
    MissingOutput(&'static str),
    #[error("Cannot assign to reserved name '{0}'")]
    ReservedName(String),
}

/// Math functions callable from a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Abs,
    Exp,
    Ln,
    Log10,
    Pow,
    Min,
    Max,
    Floor,
    Ceil,
}

impl MathFn {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => MathFn::Sin,
            "cos" => MathFn::Cos,
            "tan" => MathFn::Tan,
            "asin" => MathFn::Asin,
            "acos" => MathFn::Acos,
            "atan" => MathFn::Atan,
            "atan2" => MathFn::Atan2,
            "sinh" => MathFn::Sinh,
            "cosh" => MathFn::Cosh,
            "tanh" => MathFn::Tanh,
            "sqrt" => MathFn::Sqrt,
            "abs" => MathFn::Abs,
            "exp" => MathFn::Exp,
            "ln" | "log" => MathFn::Ln,
            "log10" => MathFn::Log10,
            "pow" => MathFn::Pow,
            "min" => MathFn::Min,
            "max" => MathFn::Max,
            "floor" => MathFn::Floor,
            "ceil" => MathFn::Ceil,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            MathFn::Sin => "sin",
            MathFn::Cos => "cos",
            MathFn::Tan => "tan",
            MathFn::Asin => "asin",
            MathFn::Acos => "acos",
            MathFn::Atan => "atan",
            MathFn::Atan2 => "atan2",
            MathFn::Sinh => "sinh",
            MathFn::Cosh => "cosh",
            MathFn::Tanh => "tanh",
            MathFn::Sqrt => "sqrt",
            MathFn::Abs => "abs",
            MathFn::Exp => "exp",
            MathFn::Ln => "ln",
            MathFn::Log10 => "log10",
            MathFn::Pow => "pow",
            MathFn::Min => "min",
            MathFn::Max => "max",
            MathFn::Floor => "floor",
            MathFn::Ceil => "ceil",
        }
    }

    fn arity(self) -> usize {
        match self {
            MathFn::Atan2 | MathFn::Pow | MathFn::Min | MathFn::Max => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f32]) -> f32 {
        let a = args[0];
        match self {
            MathFn::Sin => a.sin(),
            MathFn::Cos => a.cos(),
            MathFn::Tan => a.tan(),
            MathFn::Asin => a.asin(),
            MathFn::Acos => a.acos(),
            MathFn::Atan => a.atan(),
            MathFn::Atan2 => a.atan2(args[1]),
            MathFn::Sinh => a.sinh(),
            MathFn::Cosh => a.cosh(),
            MathFn::Tanh => a.tanh(),
            MathFn::Sqrt => a.sqrt(),
            MathFn::Abs => a.abs(),
            MathFn::Exp => a.exp(),
            MathFn::Ln => a.ln(),
            MathFn::Log10 => a.log10(),
            MathFn::Pow => a.powf(args[1]),
            MathFn::Min => a.min(args[1]),
            MathFn::Max => a.max(args[1]),
            MathFn::Floor => a.floor(),
            MathFn::Ceil => a.ceil(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f32),
    Slot(usize),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: MathFn,
        args: Vec<Expr>,
    },
}

impl Expr {
    fn eval(&self, slots: &[f32]) -> f32 {
        match self {
            Expr::Number(value) => *value,
            Expr::Slot(slot) => slots[*slot],
            Expr::Neg(inner) => -inner.eval(slots),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(slots);
                let b = rhs.eval(slots);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call { func, args } => {
                let mut values = [0.0f32; 2];
                for (value, arg) in values.iter_mut().zip(args) {
                    *value = arg.eval(slots);
                }
                func.apply(&values[..args.len()])
            }
        }
    }
}

const SLOT_U: usize = 0;
const SLOT_V: usize = 1;

const DECLARATIONS: [&str; 4] = ["let", "var", "const", "local"];
const RESERVED: [&str; 6] = ["u", "v", "pi", "PI", "e", "E"];

/// Splits program source into statement texts, dropping comments
fn statements(source: &str) -> Vec<String> {
    source
        .lines()
        .map(strip_comment)
        .flat_map(|line| line.split(';'))
        .map(|statement| statement.trim().replace("**", "^"))
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn strip_comment(line: &str) -> &str {
    let end = [line.find("//"), line.find("--")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

/// Upper bound on how deep the expression tree of `source` can nest
fn nesting(source: &str) -> usize {
    let symbols = source
        .chars()
        .filter(|c| "([{+-*/%^#~<>".contains(*c))
        .count();
    let keywords = source
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| {
            matches!(
                *word,
                "not" | "and" | "or" | "function" | "do" | "then" | "else" | "repeat"
            )
        })
        .count();
    symbols + keywords
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_math_table(token: &TokenReference) -> bool {
    matches!(token.token().to_string().as_str(), "Math" | "math")
}

fn constant(name: &str) -> Option<f32> {
    match name {
        "pi" | "PI" => Some(std::f32::consts::PI),
        "e" | "E" => Some(std::f32::consts::E),
        _ => None,
    }
}

struct Compiler {
    names: Vec<String>,
}

impl Compiler {
    fn slot_of(&self, name: &str) -> Option<usize> {
        self.names.iter().rposition(|n| n == name)
    }

    fn statement(&mut self, text: &str) -> Result<(usize, Expr), ExpressionError> {
        let invalid = || ExpressionError::InvalidStatement(text.to_string());

        let (target, source) = text.split_once('=').ok_or_else(invalid)?;
        if source.starts_with('=') {
            return Err(invalid());
        }

        let name = match target.split_whitespace().collect::<Vec<_>>().as_slice() {
            [name] => *name,
            [declaration, name] if DECLARATIONS.contains(declaration) => *name,
            _ => return Err(invalid()),
        };
        if !is_identifier(name) {
            return Err(invalid());
        }
        if RESERVED.contains(&name) {
            return Err(ExpressionError::ReservedName(name.to_string()));
        }

        let value = self.parse(source)?;

        // Reassignment gets a fresh slot so earlier reads keep their value
        self.names.push(name.to_string());
        Ok((self.names.len() - 1, value))
    }

    fn parse(&self, source: &str) -> Result<Expr, ExpressionError> {
        if nesting(source) > MAX_NESTING {
            return Err(ExpressionError::TooDeep { limit: MAX_NESTING });
        }

        let chunk = full_moon::parse(&format!("return {}", source)).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ExpressionError::Syntax(messages.join("; "))
        })?;

        let block = chunk.nodes();
        let expression = match block.last_stmt() {
            Some(LastStmt::Return(ret))
                if block.stmts().next().is_none() && ret.returns().len() == 1 =>
            {
                ret.returns().iter().next()
            }
            _ => None,
        }
        .ok_or_else(|| ExpressionError::InvalidStatement(source.trim().to_string()))?;

        self.expression(expression, 0)
    }

    fn expression(&self, expression: &ast::Expression, depth: usize) -> Result<Expr, ExpressionError> {
        if depth > MAX_NESTING {
            return Err(ExpressionError::TooDeep { limit: MAX_NESTING });
        }

        match expression {
            ast::Expression::Number(token) => {
                let text = token.token().to_string();
                text.parse::<f32>()
                    .map(Expr::Number)
                    .map_err(|_| ExpressionError::InvalidNumber(text))
            }
            ast::Expression::Parentheses { expression, .. } => self.expression(expression, depth + 1),
            ast::Expression::UnaryOperator { unop, expression } => match unop {
                UnOp::Minus(_) => Ok(Expr::Neg(Box::new(self.expression(expression, depth + 1)?))),
                _ => Err(ExpressionError::Unsupported(format!(
                    "operator '{}'",
                    unop.to_string().trim()
                ))),
            },
            ast::Expression::BinaryOperator { lhs, binop, rhs } => {
                let op = match binop {
                    BinOp::Plus(_) => BinaryOp::Add,
                    BinOp::Minus(_) => BinaryOp::Sub,
                    BinOp::Star(_) => BinaryOp::Mul,
                    BinOp::Slash(_) => BinaryOp::Div,
                    BinOp::Percent(_) => BinaryOp::Rem,
                    BinOp::Caret(_) => BinaryOp::Pow,
                    _ => {
                        return Err(ExpressionError::Unsupported(format!(
                            "operator '{}'",
                            binop.to_string().trim()
                        )))
                    }
                };
                Ok(Expr::Binary {
                    op,
                    lhs: Box::new(self.expression(lhs, depth + 1)?),
                    rhs: Box::new(self.expression(rhs, depth + 1)?),
                })
            }
            ast::Expression::Var(Var::Name(token)) => self.identifier(token.token().to_string()),
            ast::Expression::Var(Var::Expression(var)) => {
                let suffixes: Vec<&Suffix> = var.suffixes().collect();
                match (var.prefix(), suffixes.as_slice()) {
                    (Prefix::Name(table), [Suffix::Index(Index::Dot { name, .. })])
                        if is_math_table(table) =>
                    {
                        let name = name.token().to_string();
                        constant(&name)
                            .map(Expr::Number)
                            .ok_or(ExpressionError::UnknownIdentifier(name))
                    }
                    _ => Err(ExpressionError::Unsupported(format!(
                        "variable '{}'",
                        var.to_string().trim()
                    ))),
                }
            }
            ast::Expression::FunctionCall(call) => self.call(call, depth),
            _ => Err(ExpressionError::Unsupported(format!(
                "expression '{}'",
                expression.to_string().trim()
            ))),
        }
    }

    fn identifier(&self, name: String) -> Result<Expr, ExpressionError> {
        match name.as_str() {
            "u" => Ok(Expr::Slot(SLOT_U)),
            "v" => Ok(Expr::Slot(SLOT_V)),
            _ => match constant(&name) {
                Some(value) => Ok(Expr::Number(value)),
                None => self
                    .slot_of(&name)
                    .map(Expr::Slot)
                    .ok_or(ExpressionError::UnknownIdentifier(name)),
            },
        }
    }

    fn call(&self, call: &ast::FunctionCall, depth: usize) -> Result<Expr, ExpressionError> {
        let unsupported = || {
            ExpressionError::Unsupported(format!("call '{}'", call.to_string().trim()))
        };

        let suffixes: Vec<&Suffix> = call.suffixes().collect();
        let (name, arguments) = match (call.prefix(), suffixes.as_slice()) {
            (Prefix::Name(name), [Suffix::Call(arguments)]) => (name, arguments),
            (Prefix::Name(table), [Suffix::Index(Index::Dot { name, .. }), Suffix::Call(arguments)])
                if is_math_table(table) =>
            {
                (name, arguments)
            }
            _ => return Err(unsupported()),
        };
        let arguments = match arguments {
            Call::AnonymousCall(FunctionArgs::Parentheses { arguments, .. }) => arguments,
            _ => return Err(unsupported()),
        };

        let name = name.token().to_string();
        let func = MathFn::from_name(&name).ok_or(ExpressionError::UnknownFunction(name))?;

        let args = arguments
            .iter()
            .map(|arg| self.expression(arg, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if args.len() != func.arity() {
            return Err(ExpressionError::Arity {
                name: func.name(),
                expected: func.arity(),
                got: args.len(),
            });
        }

        Ok(Expr::Call { func, args })
    }
}

/// A compiled surface program
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProgram {
    statements: Vec<(usize, Expr)>,
    slot_count: usize,
    outputs: [usize; 3],
}

impl SurfaceProgram {
    /// Compiles program source
    pub fn compile(source: &str) -> Result<Self, ExpressionError> {
        let mut compiler = Compiler {
            names: vec!["u".to_string(), "v".to_string()],
        };

        let statements = statements(source)
            .iter()
            .map(|statement| compiler.statement(statement))
            .collect::<Result<Vec<_>, _>>()?;

        let output = |name: &'static str| {
            compiler
                .slot_of(name)
                .ok_or(ExpressionError::MissingOutput(name))
        };
        let outputs = [output("x")?, output("y")?, output("z")?];

        Ok(Self {
            statements,
            slot_count: compiler.names.len(),
            outputs,
        })
    }

    /// Evaluates the surface point for one parameter pair
    pub fn eval(&self, u: f32, v: f32) -> [f32; 3] {
        let mut slots = vec![0.0; self.slot_count];
        self.eval_with(&mut slots, u, v)
    }

    /// Evaluates with caller-provided scratch slots, resized as needed
    pub fn eval_with(&self, slots: &mut Vec<f32>, u: f32, v: f32) -> [f32; 3] {
        slots.resize(self.slot_count, 0.0);
        slots[SLOT_U] = u;
        slots[SLOT_V] = v;

        for (slot, expr) in &self.statements {
            let value = expr.eval(slots);
            slots[*slot] = value;
        }

        [
            slots[self.outputs[0]],
            slots[self.outputs[1]],
            slots[self.outputs[2]],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_plane_program() {
        let program = SurfaceProgram::compile("x = u; y = 0; z = v").unwrap();
        assert_eq!(program.eval(0.25, 0.75), [0.25, 0.0, 0.75]);
    }

    #[test]
    fn test_precedence_and_power() {
        let program = SurfaceProgram::compile("x = 1 + 2 * 3; y = -2 ^ 2; z = 2 ** 3 ^ 2").unwrap();
        assert_eq!(program.eval(0.0, 0.0), [7.0, -4.0, 512.0]);
    }

    #[test]
    fn test_locals_functions_and_comments() {
        let source = "
            // torus-like ring
            let r = 2 + cos(v * 2 * pi)
            x = r * Math.cos(u * 2 * Math.PI) -- outer circle
            local y = sin(v * 2 * pi)
            z = max(r, 0) * math.sin(u * 2 * pi)
        ";
        let program = SurfaceProgram::compile(source).unwrap();
        assert!(approx(program.eval(0.0, 0.0), [3.0, 0.0, 0.0]));
        assert!(approx(program.eval(0.25, 0.5), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_reassignment_uses_latest_value() {
        let program = SurfaceProgram::compile("a = 1; a = a + 1; x = a; y = a * 2; z = 0").unwrap();
        assert_eq!(program.eval(0.0, 0.0), [2.0, 4.0, 0.0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            SurfaceProgram::compile("x = u; y = v"),
            Err(ExpressionError::MissingOutput("z"))
        );
        assert_eq!(
            SurfaceProgram::compile("x = w; y = 0; z = 0"),
            Err(ExpressionError::UnknownIdentifier("w".to_string()))
        );
        assert_eq!(
            SurfaceProgram::compile("x = pow(u); y = 0; z = 0"),
            Err(ExpressionError::Arity {
                name: "pow",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            SurfaceProgram::compile("x = noise(u); y = 0; z = 0"),
            Err(ExpressionError::UnknownFunction("noise".to_string()))
        );
        assert!(matches!(
            SurfaceProgram::compile("x = (u + 1; y = 0; z = 0"),
            Err(ExpressionError::Syntax(_))
        ));
        assert!(matches!(
            SurfaceProgram::compile("x = u $ 2; y = 0; z = 0"),
            Err(ExpressionError::Syntax(_))
        ));
        assert!(matches!(
            SurfaceProgram::compile("x == u; y = 0; z = 0"),
            Err(ExpressionError::InvalidStatement(_))
        ));
        assert_eq!(
            SurfaceProgram::compile("u = 1; x = 0; y = 0; z = 0"),
            Err(ExpressionError::ReservedName("u".to_string()))
        );
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let depth = 5000;
        let source = format!("x = {}u{}; y = v; z = 0", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            SurfaceProgram::compile(&source),
            Err(ExpressionError::TooDeep { limit: MAX_NESTING })
        );

        let negations = format!("x = {}u; y = v; z = 0", "- ".repeat(depth));
        assert_eq!(
            SurfaceProgram::compile(&negations),
            Err(ExpressionError::TooDeep { limit: MAX_NESTING })
        );
    }

    #[test]
    fn test_nesting_within_limit_compiles() {
        let depth = 20;
        let source = format!("x = {}u{}; y = v; z = 0", "(".repeat(depth), ")".repeat(depth));
        let program = SurfaceProgram::compile(&source).unwrap();
        assert_eq!(program.eval(0.5, 0.25), [0.5, 0.25, 0.0]);
    }
}
