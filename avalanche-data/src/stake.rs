// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Stakes: UTXO records a proof vouches for, and their signatures.

use std::fmt::{Debug, Display};
use std::io::{self, Write};

use crate::amount::Amount;
use crate::hash::{Hash, Hasher};
use crate::proof::StakeCommitment;
use crate::schnorr::{PublicKey, Signature};
use crate::{to_str, Serializable};

/// A transaction output reference.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OutPoint {
    txid: Hash,
    index: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, index: u32) -> Self {
        Self { txid, index }
    }

    pub fn txid(&self) -> &Hash {
        &self.txid
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Debug for OutPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutPoint")
            .field("txid", &to_str(&self.txid))
            .field("index", &self.index)
            .finish()
    }
}

/// Stake identifier: double-SHA256 of the stake's canonical encoding.
/// Stakes inside a proof are ordered by ascending identifier.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StakeId(Hash);

impl StakeId {
    pub fn inner(&self) -> &Hash {
        &self.0
    }
}

impl From<Hash> for StakeId {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl Display for StakeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for StakeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_str(&self.0))
    }
}

/// A single staked UTXO and the key that may vouch for it.
///
/// The identifier is derived from the canonical encoding when the stake is
/// created and never changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Stake {
    utxo: OutPoint,
    amount: Amount,
    height: u32,
    is_coinbase: bool,
    pubkey: PublicKey,
    stakeid: StakeId,
}

impl Stake {
    pub fn new(
        utxo: OutPoint,
        amount: Amount,
        height: u32,
        is_coinbase: bool,
        pubkey: PublicKey,
    ) -> io::Result<Self> {
        let mut stake = Self {
            utxo,
            amount,
            height,
            is_coinbase,
            pubkey,
            stakeid: StakeId::default(),
        };

        let mut hasher = Hasher::new();
        stake.write(&mut hasher)?;
        stake.stakeid = StakeId::from(hasher.finalize());

        Ok(stake)
    }

    pub fn utxo(&self) -> &OutPoint {
        &self.utxo
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The block height the output was confirmed at.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_coinbase(&self) -> bool {
        self.is_coinbase
    }

    pub fn pubkey(&self) -> &PublicKey {
        &self.pubkey
    }

    pub fn id(&self) -> &StakeId {
        &self.stakeid
    }

    /// The 32-byte message a stake signature commits to:
    /// H(commitment ‖ canonical stake encoding).
    pub fn signature_message(
        &self,
        commitment: &StakeCommitment,
    ) -> io::Result<Hash> {
        let mut hasher = Hasher::new();
        hasher.write_all(commitment.inner())?;
        self.write(&mut hasher)?;
        Ok(hasher.finalize())
    }
}

/// A stake together with the Schnorr signature binding it to a proof
/// commitment.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SignedStake {
    stake: Stake,
    sig: Signature,
}

impl SignedStake {
    pub fn new(stake: Stake, sig: Signature) -> Self {
        Self { stake, sig }
    }

    pub fn stake(&self) -> &Stake {
        &self.stake
    }

    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    /// Checks the stake signature against the proof commitment.
    pub fn verify(&self, commitment: &StakeCommitment) -> bool {
        let Ok(msg) = self.stake.signature_message(commitment) else {
            return false;
        };
        self.stake.pubkey().verify_schnorr(&msg, &self.sig)
    }
}

#[cfg(any(feature = "faker", test))]
pub mod faker {
    use super::*;
    use crate::amount::COIN;
    use crate::schnorr::KeyPair;
    use fake::{Dummy, Fake, Faker};
    use rand::Rng;

    impl<T> Dummy<T> for OutPoint {
        fn dummy_with_rng<R: Rng + ?Sized>(_config: &T, rng: &mut R) -> Self {
            OutPoint::new(rng.gen::<[u8; 32]>(), rng.gen())
        }
    }

    impl<T> Dummy<T> for Stake {
        fn dummy_with_rng<R: Rng + ?Sized>(_config: &T, rng: &mut R) -> Self {
            let key = KeyPair::from_seed_u64(rng.gen());
            Stake::new(
                Faker.fake_with_rng(rng),
                rng.gen_range(0..21_000_000 * COIN),
                rng.gen_range(0..1 << 30),
                rng.gen_bool(0.5),
                *key.public_key(),
            )
            .expect("valid stake")
        }
    }

    impl<T> Dummy<T> for SignedStake {
        fn dummy_with_rng<R: Rng + ?Sized>(_config: &T, rng: &mut R) -> Self {
            let mut sig = [0u8; 64];
            rng.fill_bytes(&mut sig);
            SignedStake::new(Faker.fake_with_rng(rng), Signature(sig))
        }
    }
}
