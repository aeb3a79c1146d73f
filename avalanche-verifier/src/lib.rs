// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Validation of avalanche proofs: stateless structural checks, and
//! chain-context checks against a read-only view of the UTXO set.

pub mod chain;
pub mod config;
pub mod errors;
pub mod verifier;
