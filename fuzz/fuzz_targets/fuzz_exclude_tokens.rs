#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultstat_exclude::{ExcludeSet, normalize_exclude_token, parse_exclude_tokens};

const MAX_INPUT_SIZE: usize = 8 * 1024;
const SPLIT_BYTE: u8 = 0x1f;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_SIZE {
        return;
    }

    let split = data
        .iter()
        .position(|b| *b == SPLIT_BYTE)
        .unwrap_or(data.len());
    let spec = String::from_utf8_lossy(&data[..split]);
    let key = String::from_utf8_lossy(data.get(split + 1..).unwrap_or_default());

    let tokens = parse_exclude_tokens(&spec);
    assert_eq!(tokens, parse_exclude_tokens(&spec));

    for token in &tokens {
        assert!(!token.is_empty());
        assert!(!token.contains('\\'));
        assert_eq!(&normalize_exclude_token(token), token);
    }
    let mut deduped = tokens.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), tokens.len());

    let set = ExcludeSet::parse(&spec);
    match set.matching_token(&key) {
        Some(token) => {
            assert!(tokens.iter().any(|t| t == token));
            assert!(key.split(['/', '\\']).any(|seg| seg == token));
        }
        None => assert!(!set.is_excluded(&key)),
    }
});
