// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Coin denomination of staked amounts.

const COIN_UNIT: f64 = 100_000_000.0;

/// The number of base units in one coin.
pub const COIN: Amount = 100_000_000;

/// The amount denomination: a signed count of the smallest currency unit.
/// Use the [`coins`] function to convert from floating point format, and
/// the [`from_coins`] function to convert back.
pub type Amount = i64;

/// Converts from floating point format to base units.
pub const fn coins(value: f64) -> Amount {
    (value * COIN_UNIT) as Amount
}

/// Converts from base units to floating point format.
pub const fn from_coins(amount: Amount) -> f64 {
    amount as f64 / COIN_UNIT
}
