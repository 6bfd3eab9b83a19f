//! Random token soup and random valid-ish programs fed to the parser,
//! asserting termination without panics.
//!
//! Uses a deterministic LCG so failures reproduce from the seed.

use csparse_syntax::{CsParse, ParseOptions, Parser, Token, TokenKind};

struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_range(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next() % (hi - lo + 1) as u64) as usize
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next() as usize) % items.len();
        &items[idx]
    }
}

const FRAGMENTS: &[&str] = &[
    "class", "namespace", "using", "static", "public", "int", "void", "if", "else", "while",
    "return", "x", "Foo", "42", "3.5", "\"s\"", "'c'", "$\"{a}\"", "{", "}", "(", ")", "[", "]",
    "<", ">", ",", ";", ":", ".", "=", "==", "+", "-", "*", "/", "!", "++", "--", "&&", "||",
];

fn soup(rng: &mut Rng, len: usize) -> String {
    (0..len).map(|_| *rng.choose(FRAGMENTS)).collect::<Vec<_>>().join(" ")
}

#[test]
fn random_fragments_terminate() {
    let ctx = CsParse::new();
    for seed in 0..300 {
        let mut rng = Rng::new(seed);
        let len = rng.next_range(1, 80);
        let src = soup(&mut rng, len);
        let out = ctx.parse(&src).unwrap_or_else(|e| panic!("seed {}: {}", seed, e));
        // every diagnostic must render against its own source
        let _ = out.render_diagnostics(&src, "fuzz.cs");
    }
}

#[test]
fn random_fragments_respect_budget() {
    let ctx = CsParse::with_options(ParseOptions { max_depth: 32, max_diagnostics: Some(4) });
    for seed in 1000..1200 {
        let mut rng = Rng::new(seed);
        let src = soup(&mut rng, 120);
        let out = ctx.parse(&src).unwrap();
        assert!(out.diagnostics.len() <= 4, "seed {}", seed);
    }
}

#[test]
fn raw_token_vectors_terminate() {
    // tokens the lexer would never produce, including custom kinds
    let kinds = [
        TokenKind::Keyword,
        TokenKind::Identifier,
        TokenKind::Symbol,
        TokenKind::Number,
        TokenKind::custom("ODD"),
    ];
    let texts = ["class", "if", "{", "}", "(", ")", "<", ";", "x", "=", ""];
    for seed in 0..200 {
        let mut rng = Rng::new(seed);
        let len = rng.next_range(0, 60);
        let tokens: Vec<Token> = (0..len)
            .map(|i| Token::new(rng.choose(&kinds).clone(), *rng.choose(&texts), i))
            .collect();
        let mut parser = Parser::new(tokens);
        let program = parser.parse_statements();
        assert!(program.body.len() <= len, "seed {}", seed);
    }
}

#[test]
fn generated_classes_parse_cleanly() {
    let types = ["int", "string", "bool", "List<int>", "Map<string, Foo>"];
    let modifiers = ["public", "private static", "protected", "internal readonly"];
    let ctx = CsParse::new();
    for seed in 0..100 {
        let mut rng = Rng::new(seed);
        let mut src = String::from("namespace Gen {\n");
        let classes = rng.next_range(1, 4);
        for c in 0..classes {
            src.push_str(&format!("  class C{} {{\n", c));
            let members = rng.next_range(0, 6);
            for m in 0..members {
                let modifier = rng.choose(&modifiers);
                let ty = rng.choose(&types);
                if rng.next() % 2 == 0 {
                    src.push_str(&format!("    {} {} f{};\n", modifier, ty, m));
                } else {
                    src.push_str(&format!("    {} {} m{}(a, b) {{ x = a + b * {}; }}\n", modifier, ty, m, m));
                }
            }
            src.push_str("  }\n");
        }
        src.push('}');
        let out = ctx.parse(&src).unwrap();
        assert!(out.diagnostics.is_empty(), "seed {}: {:?}\n{}", seed, out.messages(), src);
        assert_eq!(out.program.body.len(), 1);
    }
}
