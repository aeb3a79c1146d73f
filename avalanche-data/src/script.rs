// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Transaction output script templates.
//!
//! Only the handful of standard templates matters here: payout scripts must
//! classify into one of them, and stake destinations must resolve to a
//! public key hash.

use std::fmt::Debug;

use crate::hash::hash160;

const OP_RETURN: u8 = 0x6a;
const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xa9;
const OP_CHECKSIG: u8 = 0xac;
const OP_CHECKMULTISIG: u8 = 0xae;
const OP_1: u8 = 0x51;
const OP_16: u8 = 0x60;

/// Maximum serialized script size admitted by the codec.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// A transaction output locking script.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct Script(Vec<u8>);

/// The recognized output script templates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TxOutType {
    PubKey,
    PubKeyHash,
    ScriptHash,
    Multisig,
    NullData,
    NonStandard,
}

/// A single-recipient destination extracted from an output script.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Destination {
    PubKeyHash([u8; 20]),
    ScriptHash([u8; 20]),
}

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// A pay-to-pubkey-hash script for the given key hash.
    pub fn new_p2pkh(hash: [u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(25);
        bytes.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
        bytes.extend_from_slice(&hash);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self(bytes)
    }

    /// A pay-to-script-hash script for the given script hash.
    pub fn new_p2sh(hash: [u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(23);
        bytes.extend_from_slice(&[OP_HASH160, 20]);
        bytes.extend_from_slice(&hash);
        bytes.push(OP_EQUAL);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn classify(&self) -> TxOutType {
        let s = self.0.as_slice();

        if s.len() == 25
            && s[0] == OP_DUP
            && s[1] == OP_HASH160
            && s[2] == 20
            && s[23] == OP_EQUALVERIFY
            && s[24] == OP_CHECKSIG
        {
            return TxOutType::PubKeyHash;
        }

        if s.len() == 23 && s[0] == OP_HASH160 && s[1] == 20 && s[22] == OP_EQUAL {
            return TxOutType::ScriptHash;
        }

        if is_key_push(s, 0) && s.len() == 2 + s[0] as usize && s[s.len() - 1] == OP_CHECKSIG {
            return TxOutType::PubKey;
        }

        if !s.is_empty() && s[0] == OP_RETURN {
            return TxOutType::NullData;
        }

        if self.is_multisig() {
            return TxOutType::Multisig;
        }

        TxOutType::NonStandard
    }

    /// Whether the script matches one of the recognized templates.
    pub fn is_standard(&self) -> bool {
        self.classify() != TxOutType::NonStandard
    }

    /// Extracts the single-recipient destination, if the script has one.
    /// Pay-to-pubkey resolves to the hash of the embedded key; bare
    /// multisig and data carriers have no destination.
    pub fn extract_destination(&self) -> Option<Destination> {
        let s = self.0.as_slice();
        match self.classify() {
            TxOutType::PubKeyHash => {
                Some(Destination::PubKeyHash(s[3..23].try_into().ok()?))
            }
            TxOutType::ScriptHash => {
                Some(Destination::ScriptHash(s[2..22].try_into().ok()?))
            }
            TxOutType::PubKey => {
                let key = &s[1..1 + s[0] as usize];
                Some(Destination::PubKeyHash(hash160(key)))
            }
            _ => None,
        }
    }

    /// `m <key>... n OP_CHECKMULTISIG` with plausible key pushes.
    fn is_multisig(&self) -> bool {
        let s = self.0.as_slice();
        if s.len() < 4 || s[s.len() - 1] != OP_CHECKMULTISIG {
            return false;
        }

        let m = s[0];
        let n = s[s.len() - 2];
        if !(OP_1..=OP_16).contains(&m) || !(OP_1..=OP_16).contains(&n) || m > n {
            return false;
        }

        let mut keys = 0u8;
        let mut i = 1;
        while i < s.len() - 2 {
            if !is_key_push(s, i) {
                return false;
            }
            i += 1 + s[i] as usize;
            keys += 1;
        }

        i == s.len() - 2 && keys == n - OP_1 + 1
    }
}

/// A 33- or 65-byte key push with a plausible header byte at `at`.
fn is_key_push(s: &[u8], at: usize) -> bool {
    match s.get(at) {
        Some(33) => matches!(s.get(at + 1), Some(0x02 | 0x03)),
        Some(65) => matches!(s.get(at + 1), Some(0x04)),
        _ => false,
    }
}

impl Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script")
            .field("script", &hex::encode(&self.0))
            .finish()
    }
}
