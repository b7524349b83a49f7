//! Evaluation of field expressions against one input record.
//!
//! An expression is split on single spaces. Tokens of the form `$name` are
//! replaced by the record's cell in column `name`; all other tokens are kept
//! as they are. If the first token is `~function`, the remaining tokens are
//! its arguments:
//!
//! | function | arguments                          | result                                  |
//! |----------|------------------------------------|-----------------------------------------|
//! | `round`  | `x`                                | `x` rounded half away from zero         |
//! | `sum`    | `x1 x2 ...`                        | `x1 + x2 + ...`                         |
//! | `min`    | `x0 x1 x2 ...`                     | `x0 - x1 - x2 - ...`                    |
//! | `if`     | `v1 op v2 then else...`            | `then` if `v1 op v2` holds, else `else` |
//!
//! The `else` part of `~if` is evaluated again once its columns are
//! substituted if it then starts with `~`, which allows chaining
//! (`~if $a > 1 big ~if $a > 0 small none`). The `then` part is always a
//! single token and is never evaluated.
use std::borrow::Cow;
use std::str::FromStr;

use itertools::Itertools;
use strum::{Display, EnumString};

use crate::error::{Error, Result};
use crate::parser::{self, Token, TokenKind};
use crate::record::Columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Function {
    Round,
    Sum,
    Min,
    If,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Operator {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
}

/// Evaluates `expression` for the row `cells` whose column names are `columns`.
///
/// # Examples
///
/// ```
/// use rust_bed2vcf::record::Columns;
/// use rust_bed2vcf::resolve::resolve;
///
/// let columns = Columns::from_iter(vec!["chr", "start", "end", "cn"]);
/// let cells = vec!["chr1".to_string(), "100".into(), "200".into(), "3".into()];
///
/// assert_eq!(resolve("$chr", &cells, &columns).unwrap(), "chr1");
/// assert_eq!(resolve("<CNV>", &cells, &columns).unwrap(), "<CNV>");
/// assert_eq!(resolve("~sum $start 1", &cells, &columns).unwrap(), "101");
/// assert_eq!(
///     resolve("~if $cn > 2 <DUP> ~if $cn < 2 <DEL> <CNV>", &cells, &columns).unwrap(),
///     "<DUP>"
/// );
/// ```
pub fn resolve(expression: &str, cells: &[String], columns: &Columns) -> Result<String> {
    evaluate(&parser::tokens(expression), cells, columns)
}

fn evaluate(tokens: &[Token], cells: &[String], columns: &Columns) -> Result<String> {
    match tokens.split_first() {
        Some((
            Token {
                kind: TokenKind::Function(name),
                ..
            },
            arguments,
        )) => {
            let function = Function::from_str(name)
                .map_err(|_| Error::UnsupportedFunction((*name).to_owned()))?;
            call(function, arguments, cells, columns)
        }
        _ => Ok(substitute(tokens, cells, columns)?.iter().join(" ")),
    }
}

fn substitute<'a>(
    tokens: &[Token<'a>],
    cells: &'a [String],
    columns: &Columns,
) -> Result<Vec<Cow<'a, str>>> {
    tokens
        .iter()
        .map(|token| match token.kind {
            TokenKind::Column(name) => columns
                .position(name)
                .and_then(|i| cells.get(i))
                .map(|cell| Cow::Borrowed(cell.as_str()))
                .ok_or_else(|| Error::UnknownColumn(name.to_owned())),
            _ => Ok(Cow::Borrowed(token.raw)),
        })
        .collect()
}

fn call(
    function: Function,
    arguments: &[Token],
    cells: &[String],
    columns: &Columns,
) -> Result<String> {
    let values = substitute(arguments, cells, columns)?;
    match function {
        Function::Round => {
            let value = match values.as_slice() {
                [value] => number(value)?,
                _ => return Err(arity(function, "exactly 1", values.len())),
            };
            let rounded = value.round();
            // -0 and 0 compare equal, this drops the sign
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            Ok(format_number(rounded))
        }
        Function::Sum => {
            let sum = values
                .iter()
                .try_fold(0.0, |sum, value| number(value).map(|x| sum + x))?;
            Ok(format_number(sum))
        }
        Function::Min => {
            let (first, rest) = values
                .split_first()
                .ok_or_else(|| arity(function, "at least 1", 0))?;
            let difference = rest
                .iter()
                .try_fold(number(first)?, |acc, value| number(value).map(|x| acc - x))?;
            Ok(format_number(difference))
        }
        Function::If => {
            if values.len() < 5 {
                return Err(arity(function, "at least 5", values.len()));
            }
            let operator = Operator::from_str(&values[1]).map_err(|_| {
                Error::Parse(format!(
                    "the operator '{}' is not supported (use one of <, >, <=, >=, ==, !=)",
                    values[1]
                ))
            })?;
            if compare(&values[0], operator, &values[2])? {
                Ok(values[3].to_string())
            } else {
                let otherwise = values[4..].iter().join(" ");
                if otherwise.starts_with('~') {
                    resolve(&otherwise, cells, columns)
                } else {
                    Ok(otherwise)
                }
            }
        }
    }
}

fn compare(left: &str, operator: Operator, right: &str) -> Result<bool> {
    let ordered = |holds: fn(f64, f64) -> bool| -> Result<bool> {
        Ok(holds(number(left)?, number(right)?))
    };
    match operator {
        Operator::Less => ordered(|l, r| l < r),
        Operator::Greater => ordered(|l, r| l > r),
        Operator::LessEqual => ordered(|l, r| l <= r),
        Operator::GreaterEqual => ordered(|l, r| l >= r),
        Operator::Equal => Ok(equals(left, right)),
        Operator::NotEqual => Ok(!equals(left, right)),
    }
}

/// Numbers compare by value (`1.0 == 1`), everything else as text.
fn equals(left: &str, right: &str) -> bool {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(left), Ok(right)) => left == right,
        _ => left == right,
    }
}

fn number(value: &str) -> Result<f64> {
    value.parse().map_err(|_| Error::not_a_number(value))
}

/// Shortest decimal representation, without exponent or trailing `.0`.
fn format_number(value: f64) -> String {
    value.to_string()
}

fn arity(function: Function, expected: &str, found: usize) -> Error {
    Error::Parse(format!(
        "~{} expects {} argument(s), found {}",
        function, expected, found
    ))
}
