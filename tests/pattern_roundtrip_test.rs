//! Signature parsing, rendering and error localisation

use memscope::{Pattern, PatternError, PatternIterator, PatternLexer, Token};

#[test]
fn test_signature_parse() {
    let pattern = Pattern::parse("48 8B 05 ?? ?? ?? ?? E8").unwrap();
    assert_eq!(
        pattern.bytes(),
        &[
            Some(0x48),
            Some(0x8B),
            Some(0x05),
            None,
            None,
            None,
            None,
            Some(0xE8)
        ]
    );
}

#[test]
fn test_render_round_trip() {
    let literal = "48 8B 05 ?? ?? ?? ?? E8";
    let pattern = Pattern::parse(literal).unwrap();
    assert_eq!(pattern.to_string(), literal);
    assert_eq!(literal.parse::<Pattern>().unwrap(), pattern);
}

#[test]
fn test_render_normalises_whitespace_and_case() {
    let pattern = Pattern::parse("  aa\tbb # noise\n ?? cC ").unwrap();
    assert_eq!(pattern.to_string(), "AA BB ?? CC");

    // Rendering then parsing lands on the same pattern.
    let reparsed = pattern.to_string().parse::<Pattern>().unwrap();
    assert_eq!(reparsed, pattern);
}

#[test]
fn test_comment_skip() {
    let pattern = Pattern::parse("AA # trailing\n?? BB").unwrap();
    assert_eq!(pattern.bytes(), &[Some(0xAA), None, Some(0xBB)]);
}

#[test]
fn test_error_localisation() {
    assert_eq!(
        Pattern::parse("AA ZZ").unwrap_err(),
        PatternError::UnexpectedCharacter {
            index: 3,
            value: 'Z'
        }
    );
}

#[test]
fn test_error_localisation_counts_scalars_not_bytes() {
    // Every scalar before the offender is multi-byte in UTF-8.
    let input = "# ßßß\nAA !";
    let expected_index = input.chars().count() - 1;
    assert_eq!(
        Pattern::parse(input).unwrap_err(),
        PatternError::UnexpectedCharacter {
            index: expected_index,
            value: '!'
        }
    );
}

#[test]
fn test_odd_nibble_is_end_of_stream() {
    assert_eq!(Pattern::parse("A").unwrap_err(), PatternError::EndOfStream);
    assert_eq!(
        Pattern::parse("AA ?").unwrap_err(),
        PatternError::EndOfStream
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Pattern::parse("AA ZZ").unwrap_err().to_string(),
        "Unexpected character 'Z' at index 3."
    );
    assert_eq!(
        Pattern::parse("A").unwrap_err().to_string(),
        "Stream of characters ended unexpectedly."
    );
}

#[test]
fn test_lexer_streams_tokens() {
    let mut lexer = PatternLexer::new("00 fF ??");
    assert_eq!(lexer.next_token().unwrap(), Token::Byte(0x00));
    assert_eq!(lexer.next_token().unwrap(), Token::Byte(0xFF));
    assert_eq!(lexer.next_token().unwrap(), Token::Wildcard);
    assert_eq!(lexer.next_token().unwrap(), Token::EndOfLine);
    assert_eq!(lexer.next_token().unwrap(), Token::EndOfLine);
}

#[test]
fn test_empty_pattern_choices() {
    // The empty pattern is legal, renders to the empty string, and
    // matches at every admissible offset.
    let pattern = Pattern::parse("").unwrap();
    assert!(pattern.is_empty());
    assert_eq!(pattern.to_string(), "");

    let hits: Vec<usize> = PatternIterator::new(&pattern, &[9, 9, 9]).collect();
    assert_eq!(hits, [0, 1, 2, 3]);
}

#[test]
fn test_comment_only_signature_is_empty() {
    let pattern = Pattern::parse("# nothing here").unwrap();
    assert!(pattern.is_empty());
}
