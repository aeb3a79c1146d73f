// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Read-only view of chain state consumed during proof verification.

use avalanche_data::amount::Amount;
use avalanche_data::script::Script;
use avalanche_data::stake::OutPoint;

use crate::config::AVALANCHE_DEFAULT_STAKE_UTXO_CONFIRMATIONS;

/// An unspent output as recorded by the active chain state.
#[derive(Debug, Clone)]
pub struct Coin {
    pub height: u32,
    pub is_coinbase: bool,
    pub amount: Amount,
    pub script: Script,
}

/// The active chain tip.
#[derive(Debug, Clone, Copy)]
pub struct ChainTip {
    pub height: i32,
    /// Median timestamp of the last eleven block headers.
    pub median_time_past: i64,
}

/// Chain state lookups required by proof verification.
///
/// Implementations document their own locking discipline; a caller holds
/// that lock across a whole verification, so the tip and every coin lookup
/// observe one consistent snapshot. Verification never mutates the view.
pub trait ChainView {
    /// The active tip, if the chain has one.
    fn active_tip(&self) -> Option<ChainTip>;

    /// Height of the active tip, 0 when there is no tip.
    fn active_height(&self) -> i32;

    /// Looks up an unspent output in the active UTXO set.
    fn get_coin(&self, utxo: &OutPoint) -> Option<Coin>;

    /// Confirmation floor for stake UTXOs, normally delegated to
    /// [`Config::stake_utxo_min_confirmations`](crate::config::Config).
    fn stake_utxo_min_confirmations(&self) -> u32 {
        AVALANCHE_DEFAULT_STAKE_UTXO_CONFIRMATIONS
    }
}
