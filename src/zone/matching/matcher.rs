//! Matcher combinators and the recognition function
//!
//! Matchers are a closed set of variants held in an index-addressed arena;
//! composites reference their children by `MatcherId`, and cycles are only
//! possible through `TagRef` indirection. A `GrammarBuilder` assembles the
//! arena and tag registry, and `build` freezes them into an immutable
//! `Grammar` after checking that every referenced tag is registered.
//!
//! Recognition is purely functional over the token slice: a failed attempt
//! returns `Ok(None)` and leaves no partial trace visible to the caller.

use crate::zone::lexer::Token;
use crate::zone::matching::registry::TagRegistry;
use crate::zone::matching::trace::MatchTrace;
use crate::zone::matching::GrammarError;

/// Index of a matcher in its grammar's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatcherId(pub(crate) usize);

/// Repetition mode for `GroupLoop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    ZeroOrMore,
    OneOrMore,
}

/// The closed set of grammar-fragment recognizers
#[derive(Debug, Clone, PartialEq)]
pub enum MatcherKind {
    /// Candidate texts tried in declaration order; the first that matches
    /// wins. A candidate may span several consecutive tokens whose
    /// concatenated text equals it, which is how decomposed multi-character
    /// operators are recognized. Callers implement longest-operator-first
    /// preference by pre-sorting candidates by descending length.
    Literal(Vec<String>),
    /// A scoped identifier token (`::`-separated paths included)
    Typename,
    /// An integer literal token
    Number,
    /// All children must match in sequence; fails atomically
    GroupAnd(Vec<MatcherId>),
    /// Alternatives tried in declaration order; first success commits
    GroupOr(Vec<MatcherId>),
    /// Repeats the child while it matches
    GroupLoop { child: MatcherId, mode: LoopMode },
    /// Zero or one occurrence of the child
    GroupOptional(MatcherId),
    /// Indirect link resolved through the tag registry at match time; the
    /// only mechanism for self-referential or mutually-recursive grammars
    TagRef(String),
}

/// A grammar node: a matcher kind plus optional capture name and trace tag
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    pub kind: MatcherKind,
    /// Capture label; named matchers record the text they consumed
    pub name: Option<String>,
    /// Trace label; tagged matchers record their position in the trace
    pub tag: Option<String>,
}

/// A successful match: the position after the last consumed token and the
/// trace appended by the attempt
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub end: usize,
    pub trace: MatchTrace,
}

/// Builder for a matcher arena and its tag registry
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    nodes: Vec<Matcher>,
    registry: TagRegistry,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder::default()
    }

    fn add(&mut self, kind: MatcherKind) -> MatcherId {
        let id = MatcherId(self.nodes.len());
        self.nodes.push(Matcher {
            kind,
            name: None,
            tag: None,
        });
        id
    }

    pub fn literal(&mut self, candidates: &[&str]) -> MatcherId {
        self.add(MatcherKind::Literal(
            candidates.iter().map(|c| c.to_string()).collect(),
        ))
    }

    pub fn typename(&mut self) -> MatcherId {
        self.add(MatcherKind::Typename)
    }

    pub fn number(&mut self) -> MatcherId {
        self.add(MatcherKind::Number)
    }

    pub fn group_and(&mut self, children: Vec<MatcherId>) -> MatcherId {
        self.add(MatcherKind::GroupAnd(children))
    }

    pub fn group_or(&mut self, alternatives: Vec<MatcherId>) -> MatcherId {
        self.add(MatcherKind::GroupOr(alternatives))
    }

    pub fn zero_or_more(&mut self, child: MatcherId) -> MatcherId {
        self.add(MatcherKind::GroupLoop {
            child,
            mode: LoopMode::ZeroOrMore,
        })
    }

    pub fn one_or_more(&mut self, child: MatcherId) -> MatcherId {
        self.add(MatcherKind::GroupLoop {
            child,
            mode: LoopMode::OneOrMore,
        })
    }

    pub fn optional(&mut self, child: MatcherId) -> MatcherId {
        self.add(MatcherKind::GroupOptional(child))
    }

    pub fn tag_ref(&mut self, tag: &str) -> MatcherId {
        self.add(MatcherKind::TagRef(tag.to_string()))
    }

    /// Attach a capture name to a matcher
    pub fn with_name(&mut self, id: MatcherId, name: &str) -> MatcherId {
        self.nodes[id.0].name = Some(name.to_string());
        id
    }

    /// Attach a trace tag to a matcher
    pub fn with_tag(&mut self, id: MatcherId, tag: &str) -> MatcherId {
        self.nodes[id.0].tag = Some(tag.to_string());
        id
    }

    /// Tag a matcher and register it so `TagRef(tag)` resolves to it
    pub fn register(&mut self, tag: &str, id: MatcherId) -> MatcherId {
        self.nodes[id.0].tag = Some(tag.to_string());
        self.registry.register(tag, id);
        id
    }

    /// Freeze the arena into an immutable grammar rooted at `root`.
    ///
    /// Every `TagRef` in the arena must resolve; an unresolved tag is a
    /// configuration error reported at construction time rather than on
    /// first use.
    pub fn build(self, root: MatcherId) -> Result<Grammar, GrammarError> {
        for node in &self.nodes {
            if let MatcherKind::TagRef(tag) = &node.kind {
                self.registry.resolve(tag)?;
            }
        }
        Ok(Grammar {
            nodes: self.nodes,
            registry: self.registry,
            root,
        })
    }
}

/// An immutable compiled grammar: matcher arena, tag registry and root.
///
/// Read-only after construction; may be shared across independent parses.
#[derive(Debug, Clone)]
pub struct Grammar {
    nodes: Vec<Matcher>,
    registry: TagRegistry,
    root: MatcherId,
}

impl Grammar {
    /// Match the root matcher at the start of `tokens`.
    ///
    /// A prefix match is a success; `MatchOutcome::end` tells the caller how
    /// many tokens were consumed.
    pub fn match_tokens(&self, tokens: &[Token]) -> Result<Option<MatchOutcome>, GrammarError> {
        self.match_at(self.root, tokens, 0)
    }

    /// Match an arbitrary matcher of this grammar at `pos`.
    ///
    /// Returns `Ok(None)` when the matcher does not match; that is the
    /// recoverable outcome, handled by enclosing alternatives and loops.
    pub fn match_at(
        &self,
        id: MatcherId,
        tokens: &[Token],
        pos: usize,
    ) -> Result<Option<MatchOutcome>, GrammarError> {
        let matcher = &self.nodes[id.0];
        let mut trace = MatchTrace::new();
        if let Some(tag) = &matcher.tag {
            trace.push_tag(tag);
        }

        let end = match &matcher.kind {
            MatcherKind::Literal(candidates) => {
                match self.match_literal(candidates, tokens, pos) {
                    Some(end) => end,
                    None => return Ok(None),
                }
            }
            MatcherKind::Typename => match tokens.get(pos) {
                Some(token) if token.is_identifier() => pos + 1,
                _ => return Ok(None),
            },
            MatcherKind::Number => match tokens.get(pos) {
                Some(token) if token.is_number() => pos + 1,
                _ => return Ok(None),
            },
            MatcherKind::GroupAnd(children) => {
                let mut cursor = pos;
                for child in children {
                    match self.match_at(*child, tokens, cursor)? {
                        Some(outcome) => {
                            cursor = outcome.end;
                            trace.append(outcome.trace);
                        }
                        None => return Ok(None),
                    }
                }
                cursor
            }
            MatcherKind::GroupOr(alternatives) => {
                let mut matched = None;
                for alternative in alternatives {
                    if let Some(outcome) = self.match_at(*alternative, tokens, pos)? {
                        matched = Some(outcome);
                        break;
                    }
                }
                match matched {
                    Some(outcome) => {
                        let end = outcome.end;
                        trace.append(outcome.trace);
                        end
                    }
                    None => return Ok(None),
                }
            }
            MatcherKind::GroupLoop { child, mode } => {
                let mut cursor = pos;
                let mut repetitions = 0usize;
                while let Some(outcome) = self.match_at(*child, tokens, cursor)? {
                    // A repetition that consumes nothing would never stop
                    if outcome.end == cursor {
                        break;
                    }
                    cursor = outcome.end;
                    trace.append(outcome.trace);
                    repetitions += 1;
                }
                if *mode == LoopMode::OneOrMore && repetitions == 0 {
                    return Ok(None);
                }
                cursor
            }
            MatcherKind::GroupOptional(child) => match self.match_at(*child, tokens, pos)? {
                Some(outcome) => {
                    let end = outcome.end;
                    trace.append(outcome.trace);
                    end
                }
                None => pos,
            },
            MatcherKind::TagRef(tag) => {
                let target = self.registry.resolve(tag)?;
                match self.match_at(target, tokens, pos)? {
                    Some(outcome) => {
                        let end = outcome.end;
                        trace.append(outcome.trace);
                        end
                    }
                    None => return Ok(None),
                }
            }
        };

        if let Some(name) = &matcher.name {
            let text: String = tokens[pos..end].iter().map(|t| t.text.as_str()).collect();
            trace.push_capture(name, text);
        }

        Ok(Some(MatchOutcome { end, trace }))
    }

    /// Try literal candidates in order; a candidate matches when the texts
    /// of one or more consecutive tokens concatenate to exactly it.
    fn match_literal(&self, candidates: &[String], tokens: &[Token], pos: usize) -> Option<usize> {
        'candidates: for candidate in candidates {
            let mut matched = String::new();
            let mut cursor = pos;
            while matched.len() < candidate.len() {
                let token = match tokens.get(cursor) {
                    Some(token) => token,
                    None => continue 'candidates,
                };
                matched.push_str(&token.text);
                cursor += 1;
            }
            if &matched == candidate {
                return Some(cursor);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::lexer::tokenize;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).expect("test source must tokenize")
    }

    #[test]
    fn test_literal_matches_keyword_token() {
        let mut b = GrammarBuilder::new();
        let root = b.literal(&["use"]);
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("use X;")).unwrap().unwrap();
        assert_eq!(outcome.end, 1);
    }

    #[test]
    fn test_literal_does_not_match_identifier_prefix() {
        let mut b = GrammarBuilder::new();
        let root = b.literal(&["use"]);
        let grammar = b.build(root).unwrap();

        // "useful" is a single identifier token; its text is not "use"
        assert!(grammar.match_tokens(&tokens("useful")).unwrap().is_none());
    }

    #[test]
    fn test_literal_spans_decomposed_operator_tokens() {
        let mut b = GrammarBuilder::new();
        let root = b.literal(&["<<"]);
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("<< 1")).unwrap().unwrap();
        assert_eq!(outcome.end, 2);
    }

    #[test]
    fn test_literal_candidate_order_prefers_first_match() {
        // "<<" listed before "<" must win on input "<<"
        let mut b = GrammarBuilder::new();
        let lit = b.literal(&["<<", "<"]);
        let root = b.with_name(lit, "op");
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("<<")).unwrap().unwrap();
        assert_eq!(outcome.end, 2);
        let mut cursor = outcome.trace.cursor();
        assert_eq!(cursor.next_match("op").unwrap(), "<<");
    }

    #[test]
    fn test_group_or_commits_to_first_success() {
        let mut b = GrammarBuilder::new();
        let long = b.literal(&["<<"]);
        let long = b.with_tag(long, "shift");
        let short = b.literal(&["<"]);
        let short = b.with_tag(short, "less");
        let root = b.group_or(vec![long, short]);
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("<<")).unwrap().unwrap();
        assert_eq!(outcome.end, 2);
        assert_eq!(outcome.trace.tags(), ["shift"]);
    }

    #[test]
    fn test_group_and_fails_atomically() {
        let mut b = GrammarBuilder::new();
        let a1 = b.literal(&["a"]);
        let a1 = b.with_tag(a1, "first_a");
        let b1 = b.literal(&["b"]);
        let first = b.group_and(vec![a1, b1]);
        let a2 = b.literal(&["a"]);
        let c2 = b.literal(&["c"]);
        let c2 = b.with_tag(c2, "second_c");
        let second = b.group_and(vec![a2, c2]);
        let root = b.group_or(vec![first, second]);
        let grammar = b.build(root).unwrap();

        // The first alternative matches "a" then fails on "c"; its partial
        // trace must not leak into the committed second alternative.
        let outcome = grammar.match_tokens(&tokens("a c")).unwrap().unwrap();
        assert_eq!(outcome.trace.tags(), ["second_c"]);
    }

    #[test]
    fn test_zero_or_more_accepts_zero_repetitions() {
        let mut b = GrammarBuilder::new();
        let item = b.literal(&["x"]);
        let root = b.zero_or_more(item);
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("y")).unwrap().unwrap();
        assert_eq!(outcome.end, 0);
    }

    #[test]
    fn test_one_or_more_requires_a_repetition() {
        let mut b = GrammarBuilder::new();
        let item = b.literal(&["x"]);
        let root = b.one_or_more(item);
        let grammar = b.build(root).unwrap();

        assert!(grammar.match_tokens(&tokens("y")).unwrap().is_none());
        let outcome = grammar.match_tokens(&tokens("x x x y")).unwrap().unwrap();
        assert_eq!(outcome.end, 3);
    }

    #[test]
    fn test_tag_ref_supports_direct_recursion() {
        // nested ::= "(" nested? ")"
        let mut b = GrammarBuilder::new();
        let open = b.literal(&["("]);
        let inner = b.tag_ref("nested");
        let inner_opt = b.optional(inner);
        let close = b.literal(&[")"]);
        let nested = b.group_and(vec![open, inner_opt, close]);
        b.register("nested", nested);
        let root = b.tag_ref("nested");
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("((()))")).unwrap().unwrap();
        assert_eq!(outcome.end, 6);
        assert_eq!(outcome.trace.tags(), ["nested", "nested", "nested"]);
        assert!(grammar.match_tokens(&tokens("(()")).unwrap().is_none());
    }

    #[test]
    fn test_build_rejects_unregistered_tag() {
        let mut b = GrammarBuilder::new();
        let root = b.tag_ref("never_registered");
        assert_eq!(
            b.build(root).unwrap_err(),
            GrammarError::UnregisteredTag("never_registered".to_string())
        );
    }

    #[test]
    fn test_own_tag_precedes_child_tags() {
        let mut b = GrammarBuilder::new();
        let child = b.literal(&["x"]);
        let child = b.with_tag(child, "child");
        let root = b.group_and(vec![child]);
        let root = b.with_tag(root, "parent");
        let grammar = b.build(root).unwrap();

        let outcome = grammar.match_tokens(&tokens("x")).unwrap().unwrap();
        assert_eq!(outcome.trace.tags(), ["parent", "child"]);
    }

    #[test]
    fn test_rematching_is_deterministic() {
        let mut b = GrammarBuilder::new();
        let x = b.literal(&["x"]);
        let x = b.with_tag(x, "x");
        let y = b.literal(&["y"]);
        let y = b.with_tag(y, "y");
        let either = b.group_or(vec![x, y]);
        let root = b.one_or_more(either);
        let grammar = b.build(root).unwrap();

        let input = tokens("x y y x");
        let first = grammar.match_tokens(&input).unwrap().unwrap();
        let second = grammar.match_tokens(&input).unwrap().unwrap();
        assert_eq!(first, second);
    }
}
