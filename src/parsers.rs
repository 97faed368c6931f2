use crate::definition::Definition;
use crate::grammar::Grammar;
use crate::production::Production;
use crate::term::Term;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{self, multispace0, satisfy},
    combinator::{all_consuming, opt, recognize},
    multi::many0,
    sequence::{delimited, preceded, terminated},
};

const DEFINITION_OPEN: char = '{';
const DEFINITION_CLOSE: char = '}';
const PRODUCTION_END: char = ';';

/// Characters that end a word or nonterminal name.
fn is_boundary(c: char) -> bool {
    c.is_whitespace() || c == PRODUCTION_END || c == DEFINITION_OPEN || c == DEFINITION_CLOSE
}

fn nonterminal_name(input: &str) -> IResult<&str, &str> {
    delimited(
        complete::char('<'),
        take_till1(|c: char| is_boundary(c) || c == '>'),
        complete::char('>'),
    )
    .parse(input)
}

pub fn nonterminal(input: &str) -> IResult<&str, Term> {
    let (input, nt) = nonterminal_name(input)?;

    Ok((input, Term::Nonterminal(nt.to_string())))
}

/// A word runs until a boundary or the `<` of a following nonterminal
pub fn terminal(input: &str) -> IResult<&str, Term> {
    let (input, t) = recognize((
        satisfy(|c: char| !is_boundary(c)),
        take_till(|c: char| is_boundary(c) || c == '<'),
    ))
    .parse(input)?;

    Ok((input, Term::Terminal(t.to_string())))
}

pub fn term(input: &str) -> IResult<&str, Term> {
    alt((nonterminal, terminal)).parse(input)
}

/// Whitespace separated terms, stopping before the `;` that ends a production
pub fn production_terms(input: &str) -> IResult<&str, Production> {
    let (input, terms) = many0(preceded(multispace0, term)).parse(input)?;

    Ok((input, Production::from_parts(terms)))
}

pub fn production(input: &str) -> IResult<&str, Production> {
    terminated(
        production_terms,
        preceded(multispace0, complete::char(PRODUCTION_END)),
    )
    .parse(input)
}

/// Like [`production`], but the closing `;` may be left off
pub fn production_complete(input: &str) -> IResult<&str, Production> {
    all_consuming(terminated(
        production_terms,
        (
            multispace0,
            opt(complete::char(PRODUCTION_END)),
            multispace0,
        ),
    ))
    .parse(input)
}

/// `{ <nonterminal> production ; production ; ... }`
///
/// A definition with no productions parses successfully here; callers reject it with a
/// message naming the nonterminal.
pub fn definition(input: &str) -> IResult<&str, Definition> {
    let (input, name) = preceded(
        (complete::char(DEFINITION_OPEN), multispace0),
        nonterminal_name,
    )
    .parse(input)?;
    let (input, productions) = many0(preceded(multispace0, production)).parse(input)?;
    let (input, _) = preceded(multispace0, complete::char(DEFINITION_CLOSE)).parse(input)?;

    Ok((input, Definition::from_parts(name, productions)))
}

/// Free text outside of any definition
pub fn commentary(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == DEFINITION_OPEN).parse(input)
}

/// Exactly one definition, surrounded by optional commentary
pub fn definition_complete(input: &str) -> IResult<&str, Definition> {
    all_consuming(delimited(commentary, definition, commentary)).parse(input)
}

pub fn grammar(input: &str) -> IResult<&str, Grammar> {
    let (input, _) = commentary(input)?;
    let (input, definitions) = many0(terminated(definition, commentary)).parse(input)?;
    Ok((input, Grammar::from_parts(definitions)))
}

pub fn grammar_complete(input: &str) -> IResult<&str, Grammar> {
    all_consuming(grammar).parse(input)
}
