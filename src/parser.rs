use heapless::Vec;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::one_of,
    IResult,
};

use crate::{
    token::{Operation, Token},
    Error,
};

fn operation(i: &str) -> IResult<&str, Token<'_>> {
    let (i, t) = one_of("+-*/")(i)?;

    Ok((
        i,
        Token::Op(match t {
            '+' => Operation::Add,
            '-' => Operation::Subtract,
            '/' => Operation::Divide,
            '*' => Operation::Multiply,
            _ => unreachable!(),
        }),
    ))
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || c == 'P' || c == 'I' || c == 'E'
}

fn value(i: &str) -> IResult<&str, Token<'_>> {
    let (i, word) = take_while1(is_value_char)(i)?;

    Ok((i, Token::Value(word)))
}

fn equation_token(i: &str) -> IResult<&str, Token<'_>> {
    alt((operation, value))(i)
}

/// splits an equation line into operator and value tokens
///
/// the allowed alphabet is the digits, the four operator symbols and
/// the letters of `PI` and `E`; the first character outside it stops
/// the scan with [`Error::InvalidCharacter`]
pub fn tokenize<const E: usize>(input: &str) -> Result<Vec<Token<'_>, E>, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(first) = rest.chars().next() {
        let (next, token) = match equation_token(rest) {
            Ok(parsed) => parsed,
            Err(_) => return Err(Error::InvalidCharacter(first)),
        };

        tokens.push(token).map_err(|_| Error::NotEnoughMemory)?;
        rest = next;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use crate::{
        token::{Operation, Token},
        Error,
    };

    use super::tokenize;

    #[test]
    fn test_operators_split_value_runs() {
        let tokens = tokenize::<16>("12*2-4*2").unwrap();

        assert_eq!(
            &tokens[..],
            [
                Token::Value("12"),
                Token::Op(Operation::Multiply),
                Token::Value("2"),
                Token::Op(Operation::Subtract),
                Token::Value("4"),
                Token::Op(Operation::Multiply),
                Token::Value("2"),
            ]
        );
    }

    #[test]
    fn test_adjacent_value_characters_merge() {
        let tokens = tokenize::<4>("23PI").unwrap();

        assert_eq!(&tokens[..], [Token::Value("23PI")]);
    }

    #[test]
    fn test_constants_and_operators() {
        let tokens = tokenize::<4>("PI+11").unwrap();

        assert_eq!(
            &tokens[..],
            [
                Token::Value("PI"),
                Token::Op(Operation::Add),
                Token::Value("11"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize::<4>(""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(tokenize::<4>("1+a"), Err(Error::InvalidCharacter('a')));
        assert_eq!(tokenize::<4>("1 + 2"), Err(Error::InvalidCharacter(' ')));
        assert_eq!(tokenize::<4>("1.5+2"), Err(Error::InvalidCharacter('.')));
    }

    #[test]
    fn test_capacity_overflow() {
        assert_eq!(tokenize::<2>("1+2"), Err(Error::NotEnoughMemory));
    }
}
