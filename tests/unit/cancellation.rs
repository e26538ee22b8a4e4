use cypherable::{CancellationSource, CancellationToken};

#[test]
fn token_observes_cancel() {
    tokio_test::block_on(async {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
        token.cancelled().await;
    });
}

#[test]
fn clones_share_the_signal() {
    tokio_test::block_on(async {
        let source = CancellationSource::new();
        let token = source.token();
        let clone = token.clone();
        source.cancel();
        assert!(clone.is_cancelled());
    });
}

#[test]
fn none_token_is_inert() {
    let token = CancellationToken::none();
    assert!(!token.is_cancelled());
}
