#![no_main]
use chartparse::earley::{EarleyConfig, EarleyParser};
use chartparse::grammar::{GrammarBuilder, NonTerminal, Symbol};
use chartparse::lexer::{DelimiterTokenizer, Tokenizer, Word};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FuzzNonTerminal {
    Root,
    Empty,
}

impl NonTerminal for FuzzNonTerminal {
    fn name(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Empty => "Empty",
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Ambiguous, nullable and self-nesting all at once
    let Ok(word) = Word::pattern("[a-z]+") else {
        return;
    };
    let root = || Symbol::NonTerminal(FuzzNonTerminal::Root);
    let Ok(grammar) = GrammarBuilder::<Word, FuzzNonTerminal>::new()
        .entry_point(FuzzNonTerminal::Root)
        .rule(FuzzNonTerminal::Root, vec![root(), root()])
        .rule(
            FuzzNonTerminal::Root,
            vec![
                Symbol::Terminal(Word::literal("(")),
                root(),
                Symbol::Terminal(Word::literal(")")),
            ],
        )
        .rule(FuzzNonTerminal::Root, vec![Symbol::Terminal(word)])
        .rule(
            FuzzNonTerminal::Root,
            vec![Symbol::NonTerminal(FuzzNonTerminal::Empty)],
        )
        .rule(FuzzNonTerminal::Empty, vec![])
        .build()
    else {
        return;
    };

    let Ok(tokenizer) = DelimiterTokenizer::new(r"\s+") else {
        return;
    };
    let tokens = tokenizer.tokenize(input);
    if tokens.len() > 64 {
        return;
    }

    let Ok(parser) = EarleyParser::new(&grammar, EarleyConfig::default()) else {
        return;
    };

    // Every tree must cover exactly the input
    for tree in parser.parse(&tokens) {
        assert_eq!(tree.span(), 0..tokens.len());
        assert_eq!(tree.leaves().len(), tokens.len());
    }
});
