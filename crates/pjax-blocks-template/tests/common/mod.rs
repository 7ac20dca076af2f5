//! Test-only compiler for a tiny template syntax:
//! `{{ var }}`, `{% block name %}...{% endblock %}`, `{% extends "name" %}`
//! and `{% extends variable %}`. Everything after an extends tag becomes the
//! children of the inheritance link.

#![allow(dead_code)]

use pjax_blocks_template::{BlockNode, Document, ExtendsNode, Leaf, Node, NodeList, ParentRef};
use std::sync::Arc;

enum Token<'a> {
    Text(&'a str),
    Var(&'a str),
    Tag(&'a str),
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = src;
    while !rest.is_empty() {
        let next = [rest.find("{{"), rest.find("{%")].into_iter().flatten().min();
        match next {
            None => {
                tokens.push(Token::Text(rest));
                break;
            }
            Some(start) => {
                if start > 0 {
                    tokens.push(Token::Text(&rest[..start]));
                }
                let close = if rest[start..].starts_with("{{") { "}}" } else { "%}" };
                let end = rest[start..].find(close).expect("unclosed tag") + start;
                let inner = rest[start + 2..end].trim();
                tokens.push(if close == "}}" { Token::Var(inner) } else { Token::Tag(inner) });
                rest = &rest[end + 2..];
            }
        }
    }
    tokens
}

fn parse_list<'a>(tokens: &mut std::iter::Peekable<std::vec::IntoIter<Token<'a>>>, until_endblock: bool) -> NodeList {
    let mut nodes = Vec::new();
    while let Some(token) = tokens.next() {
        match token {
            Token::Text(text) => nodes.push(Node::Leaf(Leaf::Text(text.to_string()))),
            Token::Var(var) => nodes.push(Node::Leaf(Leaf::Var(var.to_string()))),
            Token::Tag(tag) => {
                let mut words = tag.split_whitespace();
                match words.next() {
                    Some("block") => {
                        let name = words.next().expect("block name");
                        let children = parse_list(tokens, true);
                        nodes.push(Node::Block(Arc::new(BlockNode::new(name, children))));
                    }
                    Some("endblock") => {
                        assert!(until_endblock, "unexpected endblock");
                        return nodes;
                    }
                    Some("extends") => {
                        let target = words.next().expect("extends target");
                        let parent = if target.starts_with('"') || target.starts_with('\'') {
                            ParentRef::Name(target.trim_matches(|c| c == '"' || c == '\'').to_string())
                        } else {
                            ParentRef::Variable(target.to_string())
                        };
                        let children = parse_list(tokens, until_endblock);
                        nodes.push(Node::Extends(Arc::new(ExtendsNode::new(parent, children))));
                        return nodes;
                    }
                    other => panic!("unknown tag {other:?}"),
                }
            }
        }
    }
    assert!(!until_endblock, "missing endblock");
    nodes
}

pub fn compile(src: &str) -> Arc<Document> {
    let mut tokens = tokenize(src).into_iter().peekable();
    Document::new(None, parse_list(&mut tokens, false))
}

pub fn compile_named(name: &str, src: &str) -> Arc<Document> {
    let mut tokens = tokenize(src).into_iter().peekable();
    Document::new(Some(name.to_string()), parse_list(&mut tokens, false))
}
