// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Signing-side assembly of avalanche proofs.

use std::collections::BTreeMap;
use std::io;

use crate::amount::Amount;
use crate::proof::{
    limited_proof_id, Payout, Proof, StakeCommitment,
};
use crate::schnorr::KeyPair;
use crate::script::Script;
use crate::stake::{OutPoint, SignedStake, Stake, StakeId};

/// Assembles and signs proofs. Stakes are kept ordered by stake id, so a
/// built proof always satisfies the ordering invariant.
///
/// Signing happens at build time: the legacy commitment is the proof id,
/// which is only known once the stake set is complete.
pub struct ProofBuilder {
    sequence: u64,
    expiration_time: i64,
    master: KeyPair,
    payout_script: Option<Script>,
    stakes: BTreeMap<StakeId, (Stake, KeyPair)>,
}

impl ProofBuilder {
    /// A builder for a current-format proof paying out to `payout_script`.
    pub fn new_current(
        sequence: u64,
        expiration_time: i64,
        master: KeyPair,
        payout_script: Script,
    ) -> Self {
        Self {
            sequence,
            expiration_time,
            master,
            payout_script: Some(payout_script),
            stakes: BTreeMap::new(),
        }
    }

    /// A builder for a legacy-format proof: no payout script, no proof
    /// signature.
    pub fn new_legacy(
        sequence: u64,
        expiration_time: i64,
        master: KeyPair,
    ) -> Self {
        Self {
            sequence,
            expiration_time,
            master,
            payout_script: None,
            stakes: BTreeMap::new(),
        }
    }

    /// Registers a stake and the key able to sign for it. Returns false if
    /// the same stake is already registered.
    pub fn add_utxo(
        &mut self,
        utxo: OutPoint,
        amount: Amount,
        height: u32,
        is_coinbase: bool,
        key: KeyPair,
    ) -> io::Result<bool> {
        let stake =
            Stake::new(utxo, amount, height, is_coinbase, *key.public_key())?;
        if self.stakes.contains_key(stake.id()) {
            return Ok(false);
        }

        self.stakes.insert(*stake.id(), (stake, key));
        Ok(true)
    }

    /// Derives the proof identity, signs every stake against the resulting
    /// commitment, signs the proof itself in the current format, and
    /// assembles the proof.
    pub fn build(self) -> io::Result<Proof> {
        let Self {
            sequence,
            expiration_time,
            master,
            payout_script,
            stakes,
        } = self;

        let limited = limited_proof_id(
            sequence,
            expiration_time,
            payout_script.as_ref(),
            stakes.values().map(|(stake, _)| stake),
        )?;
        let proofid = limited.compute_proof_id(master.public_key())?;

        let commitment = match payout_script {
            None => StakeCommitment::legacy(&proofid),
            Some(_) => {
                StakeCommitment::current(expiration_time, master.public_key())?
            }
        };

        let mut signed = Vec::with_capacity(stakes.len());
        for (stake, key) in stakes.into_values() {
            let msg = stake.signature_message(&commitment)?;
            let sig = key.sign_schnorr(&msg);
            signed.push(SignedStake::new(stake, sig));
        }

        let payout = payout_script.map(|script| {
            Payout::new(script, master.sign_schnorr(limited.inner()))
        });

        Proof::new(
            sequence,
            expiration_time,
            *master.public_key(),
            payout,
            signed,
        )
    }
}
