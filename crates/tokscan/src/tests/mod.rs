
mod termination;

use crate::{ByteSource, Scanner, Split};

/// Upper bound on tokens collected by [`drain`], so a broken scanner fails
/// the test instead of hanging it.
const TOKEN_LIMIT: usize = 1 << 20;

/// Collects every remaining token.
pub(crate) fn drain<S: ByteSource, F: Split>(scanner: &mut Scanner<S, F>) -> Vec<Vec<u8>> {
    let mut tokens = Vec::new();
    while scanner.advance() {
        tokens.push(scanner.token_vec());
        assert!(tokens.len() <= TOKEN_LIMIT, "scanner is looping");
    }
    tokens
}

/// Lossy text form of tokens, for readable assertions.
pub(crate) fn texts(tokens: &[Vec<u8>]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| String::from_utf8_lossy(t).into_owned())
        .collect()
}
