//! Style value syntax
//!
//! Two tiny grammars shared by targets and the tween engine:
//!
//! - leading numeric literals (`"100px"` → `100.0`, `"abc"` → `NaN`)
//! - function-call lists (`"translateX(10px) rotate(45deg)"`)

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// A `name(args)` segment of a function-call list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionCall<'a> {
    pub name: &'a str,
    pub args: &'a str,
}

/// Parse the numeric literal at the start of `input`.
///
/// Leading whitespace is skipped and anything after the literal is ignored,
/// so units and trailing garbage do not matter. Returns `NaN` when no
/// literal is present.
pub fn leading_number(input: &str) -> f64 {
    match number_literal(input) {
        Ok((_, literal)) => literal.parse::<f64>().unwrap_or(f64::NAN),
        Err(_) => f64::NAN,
    }
}

fn sign(input: &str) -> IResult<&str, char> {
    one_of("+-")(input)
}

fn number_literal(input: &str) -> IResult<&str, String> {
    let (input, _) = multispace0(input)?;
    let (input, signed) = opt(sign)(input)?;

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("Infinity")(input) {
        let literal = if signed == Some('-') { "-inf" } else { "inf" };
        return Ok((rest, literal.to_string()));
    }

    let (input, body) = recognize(tuple((
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        // no cut here: "1em" must still read as 1
        opt(tuple((one_of("eE"), opt(sign), digit1))),
    )))(input)?;

    let mut literal = String::with_capacity(body.len() + 1);
    if signed == Some('-') {
        literal.push('-');
    }
    literal.push_str(body);
    Ok((input, literal))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn function_call(input: &str) -> IResult<&str, FunctionCall<'_>> {
    let (input, name) = take_while1(is_word_char)(input)?;
    let (input, args) = preceded(char('('), take_while1(|c| c != ')'))(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, FunctionCall { name, args }))
}

/// Scan `input` for every `name(args)` segment.
///
/// Segments that do not match (missing parens, empty argument list) are
/// skipped rather than reported, so a fully malformed string yields an
/// empty list.
pub fn function_calls(input: &str) -> Vec<FunctionCall<'_>> {
    let mut calls = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        match function_call(rest) {
            Ok((next, call)) => {
                calls.push(call);
                rest = next;
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }

    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_with_units() {
        assert_eq!(leading_number("100px"), 100.0);
        assert_eq!(leading_number("45deg"), 45.0);
        assert_eq!(leading_number("  -12.5%"), -12.5);
        assert_eq!(leading_number("1em"), 1.0);
        assert_eq!(leading_number(".5"), 0.5);
        assert_eq!(leading_number("2e3ms"), 2000.0);
    }

    #[test]
    fn test_leading_number_without_literal_is_nan() {
        assert!(leading_number("abc").is_nan());
        assert!(leading_number("").is_nan());
        assert!(leading_number("px100").is_nan());
    }

    #[test]
    fn test_leading_number_infinity() {
        assert_eq!(leading_number("Infinity"), f64::INFINITY);
        assert_eq!(leading_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_function_calls() {
        let calls = function_calls("translateX(100px) rotate(45deg)");
        assert_eq!(
            calls,
            vec![
                FunctionCall {
                    name: "translateX",
                    args: "100px"
                },
                FunctionCall {
                    name: "rotate",
                    args: "45deg"
                },
            ]
        );
    }

    #[test]
    fn test_function_calls_skip_garbage() {
        let calls = function_calls("junk scale(2) ( ) translateY(+=5px");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "scale");
        assert_eq!(calls[0].args, "2");
    }

    #[test]
    fn test_function_calls_malformed() {
        assert!(function_calls("translateX 100px").is_empty());
        assert!(function_calls("scale()").is_empty());
        assert!(function_calls("").is_empty());
    }
}
