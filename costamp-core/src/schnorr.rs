//! Collective Schnorr signature primitives
//!
//! Commit-challenge-response signatures over the suite's group. The
//! multi-party aggregation protocol that combines per-member commitments
//! and responses is an external concern; this module implements the group
//! arithmetic both sides agree on. A single keypair is the degenerate
//! aggregate, which is exactly what the in-process test authority uses.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};

use costamp_types::{GroupElement, GroupScalar, Suite};

/// The scalar/element triple produced by one signing round.
#[derive(Debug, Clone, Copy)]
pub struct CollectiveParts {
    pub challenge: GroupScalar,
    pub response: GroupScalar,
    pub agg_commit: GroupElement,
}

/// A signing member: the secret scalar behind an aggregate public key.
pub struct SigningMember {
    secret: Scalar,
    public: GroupElement,
}

impl SigningMember {
    /// Generate a fresh keypair from a cryptographically secure RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = Scalar::random(rng);
        let public = GroupElement::from_point(RistrettoPoint::mul_base(&secret));
        Self { secret, public }
    }

    pub fn public(&self) -> &GroupElement {
        &self.public
    }

    /// Sign a message: commit `V = vG`, derive `c = H(V || msg)` with the
    /// suite's hash-to-scalar, respond `r = v - c·x`.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        suite: Suite,
        message: &[u8],
        rng: &mut R,
    ) -> CollectiveParts {
        let v = Scalar::random(rng);
        let commit = GroupElement::from_point(RistrettoPoint::mul_base(&v));

        let challenge = derive_challenge(suite, &commit, message);
        let response = GroupScalar::from_scalar(v - challenge.as_scalar() * self.secret);

        CollectiveParts {
            challenge,
            response,
            agg_commit: commit,
        }
    }
}

/// Derive the Schnorr challenge: `H(compress(commit) || msg)` reduced into
/// the group's scalar field.
pub fn derive_challenge(suite: Suite, commit: &GroupElement, message: &[u8]) -> GroupScalar {
    let mut buf = Vec::with_capacity(GroupElement::LEN + message.len());
    buf.extend_from_slice(&commit.to_bytes());
    buf.extend_from_slice(message);
    suite.hash_to_scalar(&buf)
}

/// Verify a collective signature against an aggregate public key.
///
/// Recomputes `V' = rG + c·X` and requires both that `V'` equals the
/// carried aggregate commitment and that the challenge equals
/// `H(V' || msg)`. Both checks are needed: the first ties the commitment
/// field to the response, the second ties the pair to the message.
pub fn verify_collective(
    suite: Suite,
    challenge: &GroupScalar,
    response: &GroupScalar,
    agg_commit: &GroupElement,
    agg_public: &GroupElement,
    message: &[u8],
) -> bool {
    let recombined = RistrettoPoint::mul_base(response.as_scalar())
        + challenge.as_scalar() * agg_public.as_point();

    if &GroupElement::from_point(recombined) != agg_commit {
        return false;
    }

    derive_challenge(suite, agg_commit, message) == *challenge
}
