#![cfg(feature = "serde")]

use rsg::{Grammar, Sentence, Term};

#[test]
fn grammar_through_json() {
    let grammar: Grammar = include_str!("./fixtures/poem.g").parse().unwrap();
    let json = serde_json::to_string(&grammar).unwrap();
    let back: Grammar = serde_json::from_str(&json).unwrap();
    assert_eq!(grammar, back);
}

#[test]
fn term_json_shape() {
    let json = serde_json::to_string(&Term::Nonterminal(String::from("verb"))).unwrap();
    assert_eq!(json, r#"{"Nonterminal":"verb"}"#);
}

#[test]
fn sentence_json_shape() {
    let sentence: Sentence = ["slugs", "sigh"].into_iter().collect();
    let json = serde_json::to_string(&sentence).unwrap();
    assert_eq!(json, r#"{"words":["slugs","sigh"]}"#);
}
