//! A `nom`-based parser for the selector subset.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, a leading `:scope`,
//! and the descendant (whitespace) and child (`>`) combinators.

use crate::ast::{Combinator, Compound, Selector, Step};
use crate::error::SelectorError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::map,
    multi::{many0, many1},
    sequence::{delimited, pair, preceded},
};
use std::str::FromStr;

// --- Main Public Parser ---

pub fn parse_selector(input: &str) -> Result<Selector, SelectorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Empty);
    }
    let selector = match selector(trimmed) {
        Ok(("", selector)) => selector,
        Ok((rem, _)) => {
            return Err(SelectorError::Parse(
                input.to_string(),
                format!("Parser did not consume all input. Remainder: '{}'", rem),
            ));
        }
        Err(e) => return Err(SelectorError::Parse(input.to_string(), e.to_string())),
    };

    if selector.steps.iter().skip(1).any(|s| s.compound.scope) {
        return Err(SelectorError::MisplacedScope(input.to_string()));
    }
    Ok(selector)
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

// --- Grammar ---

enum Simple<'a> {
    Scope,
    Universal,
    Tag(&'a str),
    Id(&'a str),
    Class(&'a str),
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse(input)
}

fn simple(input: &str) -> IResult<&str, Simple<'_>> {
    alt((
        map(tag(":scope"), |_| Simple::Scope),
        map(char('*'), |_| Simple::Universal),
        map(preceded(char('#'), ident), Simple::Id),
        map(preceded(char('.'), ident), Simple::Class),
        map(ident, Simple::Tag),
    ))
    .parse(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (input, parts) = many1(simple).parse(input)?;
    let mut compound = Compound::default();
    for part in parts {
        match part {
            Simple::Scope => compound.scope = true,
            Simple::Universal => {}
            Simple::Tag(name) => compound.tag = Some(name.to_string()),
            Simple::Id(id) => compound.id = Some(id.to_string()),
            Simple::Class(class) => compound.classes.push(class.to_string()),
        }
    }
    Ok((input, compound))
}

fn combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        map(delimited(multispace0, char('>'), multispace0), |_| Combinator::Child),
        map(multispace1, |_| Combinator::Descendant),
    ))
    .parse(input)
}

fn selector(input: &str) -> IResult<&str, Selector> {
    let (input, first) = compound(input)?;
    let (input, rest) = many0(pair(combinator, compound)).parse(input)?;

    let mut steps = Vec::with_capacity(rest.len() + 1);
    steps.push(Step {
        combinator: None,
        compound: first,
    });
    steps.extend(rest.into_iter().map(|(combinator, compound)| Step {
        combinator: Some(combinator),
        compound,
    }));
    Ok((input, Selector { steps }))
}
