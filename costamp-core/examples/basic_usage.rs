//! Basic usage example for Costamp core
//!
//! This example demonstrates:
//! - Hashing data the way the upload path does
//! - Building an aggregation-round tree and collectively signing its root
//! - Verifying the resulting timestamp signature
//!
//! Run with: cargo run --example basic_usage

use costamp_core::{RoundTreeBuilder, SignatureVerifier, SigningMember, StreamHasher};
use costamp_types::{build_sign_message, ProofCodec, Suite, TimestampSignature};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let suite = Suite::Ristretto255Blake3;
    let hasher = StreamHasher::new(suite);

    println!("Costamp Example");
    println!("===============\n");

    // Step 1: Some documents to timestamp in one aggregation round.
    let documents: &[&[u8]] = &[
        b"Hello, world!",
        b"Timestamp this document",
        b"Another piece of data",
    ];

    let digests: Vec<_> = documents.iter().map(|d| hasher.hash_bytes(d)).collect();
    println!("Digests:");
    for digest in &digests {
        println!("  {}", digest);
    }
    println!();

    // Step 2: The authority batches the digests into a round tree.
    let mut builder = RoundTreeBuilder::new(suite);
    for digest in &digests {
        builder.add_leaf(*digest);
    }
    let tree = builder.build();

    println!("Round tree:");
    println!("  Leaves: {}", tree.leaf_count());
    println!("  Root:   {}", tree.root());
    println!();

    // Step 3: Collectively sign the root (a single member stands in for
    // the aggregate here).
    let mut rng = rand::thread_rng();
    let member = SigningMember::generate(&mut rng);
    let timestamp = 1_720_000_000;
    let message = build_sign_message(tree.root(), timestamp);
    let parts = member.sign(suite, &message, &mut rng);

    // Step 4: Assemble the signature for the first document.
    let sig = TimestampSignature {
        suite_id: suite.id().to_string(),
        timestamp,
        merkle_root: *tree.root(),
        proof: tree.path(0).expect("leaf 0 exists"),
        challenge: parts.challenge,
        response: parts.response,
        agg_commit: parts.agg_commit,
        agg_public: *member.public(),
    };

    // Step 5: Encode for transport and decode again, as the browser
    // round-trip does.
    let codec = ProofCodec::new(suite);
    let portable = codec.encode(&sig, "hello.txt");
    let json = serde_json::to_string_pretty(&portable)?;
    println!("Portable signature:\n{}\n", json);

    let decoded = codec.decode(&portable)?;

    // Step 6: Verify against the pinned aggregate key.
    let verifier = SignatureVerifier::new(suite, *member.public());
    let valid = verifier.verify(&digests[0], &decoded);
    println!("Signature valid: {}", valid);
    assert!(valid);

    Ok(())
}
