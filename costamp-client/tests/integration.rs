//! End-to-end integration tests against the in-process software authority

use std::sync::Arc;

use costamp_client::testutil::TestAuthority;
use costamp_client::TimestampClient;
use costamp_core::{SignatureVerifier, StreamHasher};
use costamp_types::{Digest, ProofCodec, SignatureEnvelope, Suite};

const SUITE: Suite = Suite::Ristretto255Blake3;

#[tokio::test]
async fn test_stamp_and_verify() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());

    let digest = Digest::new([42u8; 32]);
    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    assert_eq!(sig.suite_id, SUITE.id());
    assert!(!sig.proof.is_empty());

    let verifier = SignatureVerifier::new(config.suite, config.agg_public);
    assert!(verifier.verify(&digest, &sig));
}

#[tokio::test]
async fn test_stamp_of_file_content() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());
    let hasher = StreamHasher::new(config.suite);

    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("document.txt");
    std::fs::write(&path, b"file content for timestamping").expect("write failed");

    let mut file = std::fs::File::open(&path).unwrap();
    let digest = hasher.hash(&mut file).unwrap();

    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    let verifier = SignatureVerifier::new(config.suite, config.agg_public);
    assert!(verifier.verify(&digest, &sig));

    // The same content under another name hashes identically, so the same
    // signature verifies; the filename is never an input.
    let other = dir.path().join("renamed.txt");
    std::fs::copy(&path, &other).unwrap();
    let mut file = std::fs::File::open(&other).unwrap();
    let same_digest = hasher.hash(&mut file).unwrap();
    assert_eq!(digest, same_digest);
    assert!(verifier.verify(&same_digest, &sig));
}

#[tokio::test]
async fn test_portable_roundtrip_still_verifies() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());

    let digest = Digest::new([7u8; 32]);
    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    // Through JSON and back, as the browser round-trip does.
    let codec = ProofCodec::new(config.suite);
    let json = serde_json::to_string(&SignatureEnvelope {
        data: codec.encode(&sig, "document.txt"),
    })
    .unwrap();
    let envelope: SignatureEnvelope = serde_json::from_str(&json).unwrap();
    let decoded = codec.decode(&envelope.data).unwrap();

    assert_eq!(decoded, sig);

    let verifier = SignatureVerifier::new(config.suite, config.agg_public);
    assert!(verifier.verify(&digest, &decoded));
}

#[tokio::test]
async fn test_tampered_digest_does_not_verify() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());

    let digest = Digest::new([1u8; 32]);
    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    let mut tampered = *digest.as_bytes();
    tampered[0] ^= 0x01;

    let verifier = SignatureVerifier::new(config.suite, config.agg_public);
    assert!(!verifier.verify(&Digest::new(tampered), &sig));
}

#[tokio::test]
async fn test_wrong_pinned_key_does_not_verify() {
    let authority_a = TestAuthority::start().await;
    let authority_b = TestAuthority::start().await;

    let config = Arc::new(authority_a.config());
    let client = TimestampClient::new(config.clone());

    let digest = Digest::new([9u8; 32]);
    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    // A verifier pinning a different authority's key must reject the
    // signature even though the Schnorr equation holds for the carried key.
    let verifier = SignatureVerifier::new(SUITE, *authority_b.agg_public());
    assert!(!verifier.verify(&digest, &sig));
}

#[tokio::test]
async fn test_empty_filler_yields_empty_proof() {
    let authority = TestAuthority::start_with_filler(0).await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());

    let digest = Digest::new([5u8; 32]);
    let sig = client.request_stamp(&digest, None).await.expect("stamp failed");

    assert!(sig.proof.is_empty());
    assert_eq!(sig.merkle_root, digest);

    let verifier = SignatureVerifier::new(config.suite, config.agg_public);
    assert!(verifier.verify(&digest, &sig));
}

#[tokio::test]
async fn test_server_hint_selects_authority() {
    let authority = TestAuthority::start().await;

    // Configuration points at a dead endpoint; the hint rescues the call.
    let mut config = authority.config();
    config.servers = vec!["http://127.0.0.1:1".to_string()];
    let client = TimestampClient::new(Arc::new(config));

    let digest = Digest::new([3u8; 32]);
    let sig = client
        .request_stamp(&digest, Some(&authority.url()))
        .await
        .expect("stamp via hint failed");

    let verifier = SignatureVerifier::new(SUITE, *authority.agg_public());
    assert!(verifier.verify(&digest, &sig));
}

#[tokio::test]
async fn test_aggregate_key_matches_pinned() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());

    let key = client.aggregate_key(None).await.expect("aggregate_key failed");
    assert_eq!(key, config.agg_public);
}

#[tokio::test]
async fn test_multiple_stamps_share_key() {
    let authority = TestAuthority::start().await;
    let config = Arc::new(authority.config());
    let client = TimestampClient::new(config.clone());
    let verifier = SignatureVerifier::new(config.suite, config.agg_public);

    for i in 0u8..5 {
        let digest = Digest::new([i; 32]);
        let sig = client
            .request_stamp(&digest, None)
            .await
            .unwrap_or_else(|e| panic!("stamp {} failed: {}", i, e));

        assert_eq!(sig.agg_public, config.agg_public);
        assert!(verifier.verify(&digest, &sig));
    }
}
