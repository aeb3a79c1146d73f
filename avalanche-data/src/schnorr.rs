// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Schnorr keys and signatures over secp256k1.

use std::cmp::Ordering;
use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use secp256k1::{schnorr, Keypair, Message, SECP256K1};

use crate::hash::Hash;
use crate::to_str;

pub const PUBLIC_KEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;

/// Extends the secp256k1 public key by caching its compressed
/// serialization.
///
/// See also PublicKey::as_bytes(&self)
#[derive(Clone, Copy)]
pub struct PublicKey {
    inner: secp256k1::PublicKey,
    as_bytes: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    pub fn new(inner: secp256k1::PublicKey) -> Self {
        Self {
            as_bytes: inner.serialize(),
            inner,
        }
    }

    /// Parses a 33-byte compressed key; other lengths are rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, secp256k1::Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(secp256k1::Error::InvalidPublicKey);
        }
        Ok(Self::new(secp256k1::PublicKey::from_slice(bytes)?))
    }

    /// `as_bytes` returns a reference to the compressed serialization
    /// initialized on PublicKey::new call.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.as_bytes
    }

    pub fn inner(&self) -> &secp256k1::PublicKey {
        &self.inner
    }

    /// Verifies a 64-byte Schnorr signature over a 32-byte message digest,
    /// against the x coordinate of this key.
    pub fn verify_schnorr(&self, msg: &Hash, sig: &Signature) -> bool {
        let Ok(sig) = schnorr::Signature::from_slice(&sig.0) else {
            return false;
        };
        let msg = Message::from_digest(*msg);
        let (xonly, _) = self.inner.x_only_public_key();
        SECP256K1.verify_schnorr(&sig, &msg, &xonly).is_ok()
    }
}

impl TryFrom<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    type Error = secp256k1::Error;

    fn try_from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Result<Self, Self::Error> {
        Self::from_slice(&bytes)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes == other.as_bytes
    }
}

impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes.hash(state);
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes.cmp(&other.as_bytes)
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("key", &to_str(&self.as_bytes))
            .finish()
    }
}

/// A wrapper of a 64-sized array to facilitate Schnorr signatures.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Signature(pub [u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn inner(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    pub fn is_zeroed(&self) -> bool {
        self.0 == [0; SIGNATURE_SIZE]
    }
}

impl Default for Signature {
    fn default() -> Self {
        Signature([0; SIGNATURE_SIZE])
    }
}

impl From<[u8; SIGNATURE_SIZE]> for Signature {
    fn from(value: [u8; SIGNATURE_SIZE]) -> Self {
        Self(value)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("signature", &to_str(&self.0))
            .finish()
    }
}

/// A signing key pair for stake holders and proof masters.
#[derive(Clone)]
pub struct KeyPair {
    inner: Keypair,
    public: PublicKey,
}

impl KeyPair {
    pub fn new(inner: Keypair) -> Self {
        Self {
            public: PublicKey::new(inner.public_key()),
            inner,
        }
    }

    /// Generates a key pair from the specified seed.
    pub fn from_seed_u64(state: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(state);
        loop {
            let mut secret = [0u8; 32];
            rng.fill_bytes(&mut secret);
            if let Ok(inner) = Keypair::from_seckey_slice(&SECP256K1, &secret) {
                return Self::new(inner);
            }
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Signs a 32-byte message digest.
    pub fn sign_schnorr(&self, msg: &Hash) -> Signature {
        let msg = Message::from_digest(*msg);
        let sig = SECP256K1.sign_schnorr_no_aux_rand(&msg, &self.inner);
        Signature(sig.serialize())
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").field("public", &self.public).finish()
    }
}
