// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Avalanche proofs and their identity derivation.
//!
//! A proof binds a set of staked UTXOs to a master key. Its identities are
//! derived from the canonical encoding when the proof is created, by decode
//! or by the builder, and never change afterwards.

use std::fmt::{Debug, Display};
use std::io::{self, Write};
use std::sync::Arc;

use crate::amount::{Amount, COIN};
use crate::hash::{Hash, Hasher};
use crate::schnorr::{PublicKey, Signature};
use crate::script::Script;
use crate::stake::{SignedStake, Stake};
use crate::{to_str, Serializable};

/// Ceiling on the number of stakes a single proof may carry, bounding the
/// validation cost per proof.
pub const AVALANCHE_MAX_PROOF_STAKES: usize = 1000;

/// Wire and identity format of a proof. The format is a node-level setting
/// and is always passed explicitly; there is no version marker inside a
/// serialized proof.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProofFormat {
    Legacy,
    Current,
}

/// Proof identity without the master key.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct LimitedProofId(Hash);

impl LimitedProofId {
    pub fn inner(&self) -> &Hash {
        &self.0
    }

    /// Completes the identity by binding the master key.
    pub fn compute_proof_id(&self, master: &PublicKey) -> io::Result<ProofId> {
        let mut hasher = Hasher::new();
        hasher.write_all(&self.0)?;
        master.write(&mut hasher)?;
        Ok(ProofId::from(hasher.finalize()))
    }
}

impl From<Hash> for LimitedProofId {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl Display for LimitedProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for LimitedProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_str(&self.0))
    }
}

/// Full proof identity: the limited identity bound to the master key.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct ProofId(Hash);

impl ProofId {
    pub fn inner(&self) -> &Hash {
        &self.0
    }
}

impl From<Hash> for ProofId {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl Display for ProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for ProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_str(&self.0))
    }
}

/// The 32-byte value every stake signature binds to.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct StakeCommitment(Hash);

impl StakeCommitment {
    /// Legacy commitment: the proof identity itself, so every stake must be
    /// known before any can be signed.
    pub fn legacy(proofid: &ProofId) -> Self {
        Self(*proofid.inner())
    }

    /// Current commitment: binds the expiration time and master key only.
    /// Independent of the stake set, so stakes can be signed before the set
    /// is final.
    pub fn current(
        expiration_time: i64,
        master: &PublicKey,
    ) -> io::Result<Self> {
        let mut hasher = Hasher::new();
        hasher.write_all(&expiration_time.to_le_bytes())?;
        master.write(&mut hasher)?;
        Ok(Self(hasher.finalize()))
    }

    pub fn inner(&self) -> &Hash {
        &self.0
    }
}

impl Debug for StakeCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_str(&self.0))
    }
}

/// Payout data carried only by current-format proofs: where rewards go,
/// and the master signature over the limited identity.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Payout {
    script: Script,
    signature: Signature,
}

impl Payout {
    pub fn new(script: Script, signature: Signature) -> Self {
        Self { script, signature }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// An avalanche proof: an ordered sequence of signed stakes bound to a
/// master key, carrying voting weight proportional to the staked amount.
#[derive(Debug, Clone)]
pub struct Proof {
    sequence: u64,
    expiration_time: i64,
    master: PublicKey,
    payout: Option<Payout>,
    stakes: Vec<SignedStake>,
    limited_proofid: LimitedProofId,
    proofid: ProofId,
    commitment: StakeCommitment,
    score: u32,
}

impl Proof {
    /// Assembles a proof and derives its identities and score. `payout`
    /// decides the format: `None` is a legacy proof. No validation happens
    /// here; see the verifier crate.
    pub fn new(
        sequence: u64,
        expiration_time: i64,
        master: PublicKey,
        payout: Option<Payout>,
        stakes: Vec<SignedStake>,
    ) -> io::Result<Self> {
        let mut proof = Self {
            sequence,
            expiration_time,
            master,
            payout,
            stakes,
            limited_proofid: Default::default(),
            proofid: Default::default(),
            commitment: Default::default(),
            score: 0,
        };
        proof.compute_proof_id()?;
        proof.compute_score();
        Ok(proof)
    }

    fn compute_proof_id(&mut self) -> io::Result<()> {
        self.limited_proofid = limited_proof_id(
            self.sequence,
            self.expiration_time,
            self.payout.as_ref().map(Payout::script),
            self.stakes.iter().map(SignedStake::stake),
        )?;
        self.proofid = self.limited_proofid.compute_proof_id(&self.master)?;

        self.commitment = match &self.payout {
            None => StakeCommitment::legacy(&self.proofid),
            Some(_) => {
                StakeCommitment::current(self.expiration_time, &self.master)?
            }
        };

        Ok(())
    }

    fn compute_score(&mut self) {
        self.score = amount_to_score(self.staked_amount());
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn expiration_time(&self) -> i64 {
        self.expiration_time
    }

    pub fn master(&self) -> &PublicKey {
        &self.master
    }

    pub fn payout(&self) -> Option<&Payout> {
        self.payout.as_ref()
    }

    pub fn stakes(&self) -> &[SignedStake] {
        &self.stakes
    }

    pub fn format(&self) -> ProofFormat {
        match self.payout {
            None => ProofFormat::Legacy,
            Some(_) => ProofFormat::Current,
        }
    }

    pub fn limited_proofid(&self) -> &LimitedProofId {
        &self.limited_proofid
    }

    pub fn proofid(&self) -> &ProofId {
        &self.proofid
    }

    /// The commitment this proof's stake signatures bind to.
    pub fn stake_commitment(&self) -> &StakeCommitment {
        &self.commitment
    }

    /// Voting weight derived from the staked amount.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total staked amount across all stakes.
    pub fn staked_amount(&self) -> Amount {
        self.stakes
            .iter()
            .fold(0, |total, ss| total.saturating_add(ss.stake().amount()))
    }
}

impl PartialEq for Proof {
    fn eq(&self, other: &Self) -> bool {
        // proofid covers everything but the signatures
        self.proofid == other.proofid
            && self.payout == other.payout
            && self.stakes == other.stakes
    }
}

impl Eq for Proof {}

/// Downstream holders keep proofs behind a reference count.
pub type ProofRef = Arc<Proof>;

/// H(sequence ‖ expiration ‖ [payout script] ‖ stake count ‖ stakes), the
/// identity shared by a proof and its unsigned preimage in the builder.
/// Stake signatures are not part of it.
pub(crate) fn limited_proof_id<'a>(
    sequence: u64,
    expiration_time: i64,
    payout_script: Option<&Script>,
    stakes: impl ExactSizeIterator<Item = &'a Stake>,
) -> io::Result<LimitedProofId> {
    let mut hasher = Hasher::new();
    hasher.write_all(&sequence.to_le_bytes())?;
    hasher.write_all(&expiration_time.to_le_bytes())?;
    if let Some(script) = payout_script {
        script.write(&mut hasher)?;
    }

    Stake::write_varint(&mut hasher, stakes.len() as u64)?;
    for stake in stakes {
        stake.write(&mut hasher)?;
    }

    Ok(LimitedProofId::from(hasher.finalize()))
}

fn amount_to_score(amount: Amount) -> u32 {
    (amount.saturating_mul(100) / COIN) as u32
}
