// This is actually defined at `crate::parser::tests_for_parser`

use super::*;
use crate::grammar::{Rejected, Symbol};
use crate::luthor::WordLexer;
use crate::reduce;
use crate::rendering::Rendered;
use crate::tests::{build, chars, displayed, parse, re};

use expect_test::expect;

fn any_chars() -> Arc<Grammar> {
    build(Grammar::builder()
        .rule_with("S", vec![], reduce::joiner)
        .rule_with("S", vec![Symbol::nt("S"), re(".")], reduce::joiner))
}

fn history() -> ParserOptions {
    ParserOptions::default().keep_history(true)
}

#[test]
fn unambiguous_input_has_one_result() {
    let g = build(Grammar::builder().rule("S", chars("ab")));
    let results = parse(&g, "ab").unwrap();
    expect![[r#"["a", "b"]"#]].assert_eq(&displayed(&results).join("\n"));
    assert_eq!(results[0].as_list().map(|l| l.len()), Some(2));
}

#[test]
fn no_input_no_results() {
    let g = build(Grammar::builder().rule("S", chars("ab")));
    let parser = Parser::new(g);
    assert_eq!(parser.current(), 0);
    assert!(parser.results().is_empty());
}

#[test]
fn ambiguity_yields_every_derivation() {
    let g = build(Grammar::builder()
        .rule("S", vec![Symbol::nt("S"), Symbol::nt("S")])
        .rule("S", chars("a")));
    assert_eq!(parse(&g, "a").unwrap().len(), 1);
    assert_eq!(parse(&g, "aa").unwrap().len(), 1);
    assert_eq!(parse(&g, "aaa").unwrap().len(), 2);
    assert_eq!(parse(&g, "aaaa").unwrap().len(), 5);
}

#[test]
fn nullable_prefix_and_suffix() {
    let g = build(Grammar::builder()
        .rule("S", vec![Symbol::nt("A"), Symbol::nt("A")])
        .rule("A", vec![])
        .rule("A", chars("a")));
    expect![[r#"
        [[], []]
    "#]].assert_eq(&(displayed(&parse(&g, "").unwrap()).join("\n") + "\n"));
    expect![[r#"
        [[], ["a"]]
        [["a"], []]
    "#]].assert_eq(&(displayed(&parse(&g, "a").unwrap()).join("\n") + "\n"));
    expect![[r#"
        [["a"], ["a"]]
    "#]].assert_eq(&(displayed(&parse(&g, "aa").unwrap()).join("\n") + "\n"));
}

#[test]
fn nullable_left_recursion() {
    let g = build(Grammar::builder()
        .rule("list", vec![])
        .rule("list", vec![Symbol::nt("list"), Symbol::lit("a")]));
    let results = parse(&g, "aaa").unwrap();
    expect![[r#"[[[[], "a"], "a"], "a"]"#]].assert_eq(&displayed(&results).join("\n"));
}

#[test]
fn self_embedding_nullable_terminates() {
    let g = build(Grammar::builder()
        .rule("E", vec![])
        .rule("E", vec![Symbol::nt("E"), Symbol::nt("E")]));
    let parser = Parser::new(g);
    assert_eq!(displayed(parser.results()), vec!["[]"]);
}

#[test]
fn every_finite_empty_derivation_is_a_result() {
    let g = build(Grammar::builder()
        .rule("S", vec![Symbol::nt("X"), Symbol::lit("a")])
        .rule("X", vec![Symbol::nt("A")])
        .rule("A", vec![])
        .rule("A", vec![Symbol::nt("C")])
        .rule("C", vec![]));
    let results = parse(&g, "a").unwrap();
    expect![[r#"
        [[[[]]], "a"]
        [[[]], "a"]"#]].assert_eq(&displayed(&results).join("\n"));
}

#[test]
fn long_input_shares_child_values() {
    let g = build(Grammar::builder()
        .rule("S", vec![])
        .rule("S", vec![Symbol::nt("S"), re(".")]));
    let input = "abcdefghij".repeat(100);
    let mut parser = Parser::new(g);
    parser.feed(&input).unwrap();
    let before = parser.results().to_vec();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].rendered(), input);

    parser.feed("z").unwrap();
    let after = parser.results();
    assert_eq!(after.len(), 1);
    // the new result holds the previous one itself, not a copy
    match (&before[0], after[0].as_list().map(|l| &l[0])) {
        (Value::List(prefix), Some(Value::List(inner))) => assert!(Arc::ptr_eq(prefix, inner)),
        other => panic!("expected nested lists, got {:?}", other.1),
    }
}

#[test]
fn chunking_does_not_change_results() {
    let g = build(Grammar::builder()
        .rule("S", vec![Symbol::nt("S"), Symbol::nt("S")])
        .rule("S", vec![re("[a-z]")]));
    let whole = parse(&g, "abcd").unwrap();

    let mut parser = Parser::new(g.clone());
    for chunk in ["a", "", "bc", "d"] {
        parser.feed(chunk).unwrap();
    }
    assert_eq!(parser.current(), 4);
    assert_eq!(parser.results(), &whole[..]);
}

#[test]
fn parse_results_render_back_to_input() {
    let g = build(Grammar::builder()
        .rule("line", vec![Symbol::nt("words")])
        .rule("words", vec![Symbol::nt("word")])
        .rule("words", vec![Symbol::nt("words"), Symbol::lit(" "), Symbol::nt("word")])
        .rule("word", vec![re("[a-z]")])
        .rule("word", vec![Symbol::nt("word"), re("[a-z]")]));
    let input = "the quick brown fox";
    let results = parse(&g, input).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].rendered(), input);
}

#[test]
fn rewind_replays_from_an_earlier_column() {
    let g = any_chars();
    let mut parser = Parser::with_options(g.clone(), history());
    parser.feed("abc").unwrap();
    assert_eq!(parser.results(), &[Value::from("abc")]);

    parser.rewind(1).unwrap();
    assert_eq!(parser.current(), 1);
    assert_eq!(parser.results(), &[Value::from("a")]);
    parser.feed("xyz").unwrap();
    assert_eq!(parser.results(), &[Value::from("axyz")]);
    assert_eq!(parser.current(), 4);

    let mut fresh = Parser::with_options(g, history());
    fresh.feed("axyz").unwrap();
    assert_eq!(fresh.results(), parser.results());
    let last = fresh.column(4).unwrap();
    assert_eq!(last.index(), 4);
}

#[test]
fn rewind_to_start() {
    let mut parser = Parser::with_options(any_chars(), history());
    parser.feed("ab").unwrap();
    parser.rewind(0).unwrap();
    assert_eq!(parser.results(), &[Value::from("")]);
    parser.feed("c").unwrap();
    assert_eq!(parser.results(), &[Value::from("c")]);
    assert!(parser.column(2).is_none());
}

#[test]
fn rewind_needs_history() {
    let mut parser = Parser::new(any_chars());
    parser.feed("ab").unwrap();
    assert_eq!(parser.rewind(0), Err(ParseError::Config(ConfigError::HistoryDisabled)));

    let mut parser = Parser::with_options(any_chars(), history());
    parser.feed("ab").unwrap();
    let err = parser.rewind(5).unwrap_err();
    assert_eq!(err, ParseError::Config(ConfigError::NoSuchColumn(5)));
    expect![[r#"no column 5 in the chart to rewind to"#]].assert_eq(&err.to_string());
    assert_eq!(err.offset(), None);
}

#[test]
fn old_columns_are_dropped_without_history() {
    let mut parser = Parser::new(any_chars());
    parser.feed("abc").unwrap();
    assert!(parser.column(0).is_none());
    assert!(parser.column(1).is_none());
    assert!(parser.column(2).is_some());
    assert!(parser.column(3).is_some());

    let mut parser = Parser::with_options(any_chars(), history());
    parser.feed("abc").unwrap();
    assert!((0..=3).all(|i| parser.column(i).is_some()));
}

#[test]
fn save_and_restore() {
    let mut parser = Parser::new(any_chars());
    parser.feed("ab").unwrap();
    let bookmark = parser.save();
    assert_eq!(bookmark.index(), 2);

    parser.feed("cd").unwrap();
    assert_eq!(parser.results(), &[Value::from("abcd")]);

    parser.restore(bookmark.clone());
    assert_eq!(parser.current(), 2);
    assert_eq!(parser.results(), &[Value::from("ab")]);
    parser.feed("x").unwrap();
    assert_eq!(parser.results(), &[Value::from("abx")]);

    parser.restore(bookmark);
    parser.feed("y").unwrap();
    assert_eq!(parser.results(), &[Value::from("aby")]);
}

#[test]
fn finish_is_idempotent() {
    let mut parser = Parser::new(any_chars());
    parser.feed("hello").unwrap();
    let first = parser.finish();
    assert_eq!(first, parser.finish());
    assert_eq!(first, parser.results());
}

#[test]
fn reducers_see_their_origin() {
    let g = build(Grammar::builder()
        .rule("S", vec![Symbol::nt("S"), Symbol::nt("T")])
        .rule("S", vec![Symbol::nt("T")])
        .rule_with("T", vec![re(".")], |_, origin| Ok(Value::Int(origin as i64))));
    expect![[r#"[[[0], 1], 2]"#]].assert_eq(&displayed(&parse(&g, "xyz").unwrap()).join("\n"));
}

#[test]
fn rejected_derivations_are_dropped() {
    let g = build(Grammar::builder()
        .rule_with("S", vec![re("[0-9]")], |c, _| match c[0].as_str() {
            Some("0") => Err(Rejected),
            _ => Ok(c[0].clone()),
        }));
    assert!(parse(&g, "0").unwrap().is_empty());
    assert_eq!(parse(&g, "7").unwrap().len(), 1);
}

#[test]
fn rejection_disambiguates() {
    // only accept right-nested pairs
    let g = build(Grammar::builder()
        .rule_with("S", vec![Symbol::nt("S"), Symbol::nt("S")], |c, _| match &c[0] {
            Value::List(_) => Err(Rejected),
            _ => Ok(Value::list(c)),
        })
        .rule_with("S", chars("a"), reduce::id));
    let results = parse(&g, "aaaa").unwrap();
    expect![[r#"["a", ["a", ["a", "a"]]]"#]].assert_eq(&displayed(&results).join("\n"));
}

#[test]
fn syntax_error_keeps_previous_results() {
    let g = build(Grammar::builder().rule("S", chars("ab")));
    let mut parser = Parser::new(g);
    parser.feed("a").unwrap();
    let err = parser.feed("c").unwrap_err();
    assert_eq!(err.offset(), Some(1));
    assert!(parser.results().is_empty());
    assert_eq!(parser.current(), 1);

    // the failed column is discarded by the next feed
    parser.feed("b").unwrap();
    assert_eq!(parser.current(), 2);
    assert_eq!(parser.results().len(), 1);
}

#[test]
fn syntax_error_message() {
    let g = build(Grammar::builder().rule("S", chars("ab")));
    let err = parse(&g, "ac").unwrap_err();
    match &err {
        ParseError::Syntax { token, offset, .. } => {
            assert_eq!(token.value, "c");
            assert_eq!(*offset, 1);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
    expect![[r#"
        Syntax error at line 1 col 2:

        1 ac
           ^

        Unexpected "c". Instead, I was expecting to see one of the following:

        A "b" based on:
            S → "a" ● "b"
    "#]].assert_eq(&err.to_string());
}

#[test]
fn typed_tokens() {
    let g = build(Grammar::builder()
        .rule_with("assign", vec![Symbol::token("ident"), Symbol::lit("="), Symbol::nt("expr")],
                   |c, _| Ok(Value::list(vec![c[0].clone(), c[2].clone()])))
        .rule_with("expr", vec![Symbol::token("number")], reduce::id)
        .rule_with("expr", vec![Symbol::token("quote")], reduce::id));
    let mut parser = Parser::with_lexer(g, WordLexer::new(), ParserOptions::default());
    parser.feed(r#"x = "hi""#).unwrap();
    expect![[r#"["x", "hi"]"#]].assert_eq(&displayed(parser.results()).join("\n"));

    let err = parser.feed(" y").unwrap_err();
    expect![[r#"
        Syntax error at line 1 col 10:

        1  y
           ^

        Unexpected ident token: "y". I did not expect any more input. Here is the state of my parse table:

            expr → %quote ●
            assign → %ident "=" expr ●
    "#]].assert_eq(&err.to_string());
}

#[test]
fn lexer_errors_are_reported() {
    let g = build(Grammar::builder().rule("S", vec![Symbol::token("quote")]));
    let mut parser = Parser::with_lexer(g, WordLexer::new(), ParserOptions::default());
    let err = parser.feed("r(abc").unwrap_err();
    match &err {
        ParseError::Lex { text, offset, .. } => {
            assert_eq!(text, "r(abc");
            assert_eq!(*offset, 0);
        }
        other => panic!("expected a lexer error, got {:?}", other),
    }
    expect![[r#"
        Syntax error at line 1 col 1:

        1 r(abc
          ^

        Unexpected input "r" (lexer error). Instead, I was expecting to see one of the following:

        A quote token based on:
            S → ● %quote
    "#]].assert_eq(&err.to_string());

    // the parser is still usable
    parser.feed(r#""abc""#).unwrap();
    assert_eq!(parser.results().len(), 1);
}

#[test]
fn feed_resumes_after_last_accepted_token() {
    let g = build(Grammar::builder().rule("S", chars("ab")));
    let mut parser = Parser::new(g);
    assert!(parser.feed("ac").is_err());
    assert_eq!(parser.current(), 1);

    parser.feed("b").unwrap();
    let tokens: Vec<usize> = parser.results()[0].as_list().unwrap().iter()
        .filter_map(|v| v.as_token().map(|t| t.offset))
        .collect();
    assert_eq!(tokens, vec![0, 1]);
}
