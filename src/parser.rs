use nom::branch::alt;
use nom::bytes::complete::is_not;
use nom::character::complete::char;
use nom::combinator::{map, rest};
use nom::sequence::{preceded, separated_pair};
use nom::IResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// `$name`: substituted with the cell of the column called `name`
    Column(&'a str),
    /// `~name`: a function call, only meaningful as the first token
    Function(&'a str),
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) raw: &'a str,
    pub(crate) kind: TokenKind<'a>,
}

fn token_kind(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map(preceded(char('$'), rest), TokenKind::Column),
        map(preceded(char('~'), rest), TokenKind::Function),
        map(rest, |_| TokenKind::Literal),
    ))(input)
}

pub(crate) fn token(raw: &str) -> Token<'_> {
    let kind = match token_kind(raw) {
        Ok((_, kind)) => kind,
        Err(_) => TokenKind::Literal,
    };
    Token { raw, kind }
}

/// Splits an expression on single spaces, so that a plain expression
/// joined back together is identical to its input.
pub(crate) fn tokens(expression: &str) -> Vec<Token<'_>> {
    expression.split(' ').map(token).collect()
}

/// `name<TAB>length[<TAB>...]`, as found in a fasta index or a plain two-column contig table.
pub(crate) fn contig(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(is_not("\t"), char('\t'), is_not("\t"))(input)
}
