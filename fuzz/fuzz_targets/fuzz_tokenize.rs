#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultstat_tokenize::{MarkdownTokenizer, Tokenizer, strip_to_fixed_point, tokenizer_for};

const MAX_INPUT_SIZE: usize = 16 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let tokenizer = MarkdownTokenizer;
    let tokens = tokenizer.tokenize(text);
    assert_eq!(tokens.len(), tokenizer.count(text));

    for token in &tokens {
        assert!(!token.is_empty());
        // Stripping is idempotent once a fixed point is reached.
        assert_eq!(strip_to_fixed_point(token), token.as_str());
    }

    let stripped = strip_to_fixed_point(text);
    assert_eq!(strip_to_fixed_point(stripped), stripped);

    if let Some(code) = tokenizer_for("code") {
        assert_eq!(code.count(text), 0);
    }
});
