//! Timestamp signature verification
//!
//! The verifier answers one question: does this signature bind this digest
//! to the authority behind the pinned aggregate key? The answer is a plain
//! boolean. Which of the internal checks failed is deliberately not
//! reported, so a probing caller learns nothing beyond valid/invalid.

use tracing::debug;

use costamp_types::{build_sign_message, Digest, GroupElement, Suite, TimestampSignature};

use crate::merkle;
use crate::schnorr;

/// Verifies timestamp signatures against a pinned aggregate public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    suite: Suite,
    known_agg_public: GroupElement,
}

impl SignatureVerifier {
    pub fn new(suite: Suite, known_agg_public: GroupElement) -> Self {
        Self {
            suite,
            known_agg_public,
        }
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// Verify a signature over `digest`. Four ordered checks, all
    /// required; any failure yields `false`. Never panics for a
    /// well-formed [`TimestampSignature`].
    pub fn verify(&self, digest: &Digest, sig: &TimestampSignature) -> bool {
        // 1. Suite agreement.
        if sig.suite_id != self.suite.id() {
            debug!(suite = %sig.suite_id, "signature suite does not match verifier");
            return false;
        }

        // 2. The signature must verify under the key this process pins,
        //    not merely under whatever key it carries.
        if sig.agg_public != self.known_agg_public {
            debug!("aggregate public key does not match pinned key");
            return false;
        }

        // 3. Recombine the inclusion proof. An empty proof reduces to
        //    comparing the digest to the root directly.
        let candidate = merkle::compute_root(self.suite, digest, &sig.proof);
        if candidate != sig.merkle_root {
            debug!("merkle recombination does not reach signed root");
            return false;
        }

        // 4. Collective Schnorr check over the signed round message.
        let message = build_sign_message(&sig.merkle_root, sig.timestamp);
        schnorr::verify_collective(
            self.suite,
            &sig.challenge,
            &sig.response,
            &sig.agg_commit,
            &sig.agg_public,
            &message,
        )
    }
}
