// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use avalanche_data::amount::{Amount, COIN};
use avalanche_data::proof::ProofFormat;
use serde::{Deserialize, Serialize};

/// Default for the legacy wire format toggle.
pub const AVALANCHE_DEFAULT_LEGACY_PROOF: bool = false;

/// Default confirmation floor for stake UTXOs.
pub const AVALANCHE_DEFAULT_STAKE_UTXO_CONFIRMATIONS: u32 = 1;

/// Minimum amount a single stake must reach to enter a proof.
pub const PROOF_DUST_THRESHOLD: Amount = COIN;

/// Node-level avalanche proof settings. Read once at startup and threaded
/// through explicitly; nothing consults these at validation time behind the
/// caller's back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `legacyavaproof`: selects the legacy wire and identity format.
    pub legacy_proof: bool,
    /// `avaproofstakeutxoconfirmations`: minimum confirmation depth for a
    /// stake UTXO.
    pub stake_utxo_min_confirmations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            legacy_proof: AVALANCHE_DEFAULT_LEGACY_PROOF,
            stake_utxo_min_confirmations:
                AVALANCHE_DEFAULT_STAKE_UTXO_CONFIRMATIONS,
        }
    }
}

impl Config {
    /// The proof format this node expects on the wire.
    pub fn format(&self) -> ProofFormat {
        if self.legacy_proof {
            ProofFormat::Legacy
        } else {
            ProofFormat::Current
        }
    }
}
