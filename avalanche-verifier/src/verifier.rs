// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Two-tier verification of avalanche proofs.
//!
//! [`check_proof`] validates a proof against itself and a dust floor; a
//! [`Verifier`] additionally validates it against a [`ChainView`] before
//! the proof may enter the live peer set. Both are fail-fast: the first
//! failed check determines the reported reason.

use std::collections::HashSet;

use tracing::debug;

use avalanche_data::amount::Amount;
use avalanche_data::hash::hash160;
use avalanche_data::proof::{Proof, AVALANCHE_MAX_PROOF_STAKES};
use avalanche_data::script::Destination;
use avalanche_data::stake::StakeId;

use crate::chain::ChainView;
use crate::errors::{ProofValidationError, ProofValidationResult};

/// Stateless checks of a proof against itself and the dust floor.
pub fn check_proof(
    proof: &Proof,
    stake_utxo_dust_threshold: Amount,
) -> Result<(), ProofValidationError> {
    use ProofValidationResult as R;

    if proof.stakes().is_empty() {
        return Err(ProofValidationError::new(R::NoStake, "no-stake"));
    }

    if proof.stakes().len() > AVALANCHE_MAX_PROOF_STAKES {
        return Err(ProofValidationError::with_detail(
            R::TooManyUtxos,
            "too-many-utxos",
            format!("{} > {}", proof.stakes().len(), AVALANCHE_MAX_PROOF_STAKES),
        ));
    }

    if let Some(payout) = proof.payout() {
        if !payout.script().is_standard() {
            return Err(ProofValidationError::new(
                R::InvalidPayoutScript,
                "payout-script-non-standard",
            ));
        }

        if !proof
            .master()
            .verify_schnorr(proof.limited_proofid().inner(), payout.signature())
        {
            return Err(ProofValidationError::new(
                R::InvalidProofSignature,
                "invalid-proof-signature",
            ));
        }
    }

    let mut prev_stakeid = StakeId::default();
    let mut seen_utxos = HashSet::with_capacity(proof.stakes().len());
    for ss in proof.stakes() {
        let stake = ss.stake();

        if stake.amount() < stake_utxo_dust_threshold {
            return Err(ProofValidationError::with_detail(
                R::DustThreshold,
                "amount-below-dust-threshold",
                format!("{} < {}", stake.amount(), stake_utxo_dust_threshold),
            ));
        }

        // strict inversions only; equal consecutive ids fall through to the
        // UTXO uniqueness check
        if *stake.id() < prev_stakeid {
            return Err(ProofValidationError::new(
                R::WrongStakeOrdering,
                "wrong-stake-ordering",
            ));
        }
        prev_stakeid = *stake.id();

        if !seen_utxos.insert(*stake.utxo()) {
            return Err(ProofValidationError::new(
                R::DuplicateStake,
                "duplicated-stake",
            ));
        }

        if !ss.verify(proof.stake_commitment()) {
            return Err(ProofValidationError::with_detail(
                R::InvalidStakeSignature,
                "invalid-stake-signature",
                format!("txid: {}", hex::encode(stake.utxo().txid())),
            ));
        }
    }

    Ok(())
}

/// Chain-context verification of proofs against one consistent snapshot of
/// the chain state.
pub struct Verifier<'a, C: ChainView> {
    view: &'a C,
}

impl<'a, C: ChainView> Verifier<'a, C> {
    pub fn new(view: &'a C) -> Self {
        Self { view }
    }

    /// Runs the structural checks, then validates expiry and every stake
    /// against the UTXO set.
    pub fn verify(
        &self,
        proof: &Proof,
        stake_utxo_dust_threshold: Amount,
    ) -> Result<(), ProofValidationError> {
        use ProofValidationResult as R;

        debug!(event = "verify proof", proofid = %proof.proofid());

        check_proof(proof, stake_utxo_dust_threshold)?;

        let tip_mtp = self
            .view
            .active_tip()
            .map_or(0, |tip| tip.median_time_past);
        if proof.expiration_time() > 0 && tip_mtp >= proof.expiration_time() {
            return Err(ProofValidationError::new(R::Expired, "expired-proof"));
        }

        let active_height = i64::from(self.view.active_height());
        let min_confirmations =
            i64::from(self.view.stake_utxo_min_confirmations());

        for ss in proof.stakes() {
            let stake = ss.stake();
            let utxo = stake.utxo();

            let Some(coin) = self.view.get_coin(utxo) else {
                return Err(ProofValidationError::new(
                    R::MissingUtxo,
                    "utxo-missing-or-spent",
                ));
            };

            if i64::from(coin.height) + min_confirmations - 1 > active_height {
                return Err(ProofValidationError::with_detail(
                    R::ImmatureUtxo,
                    "immature-utxo",
                    format!(
                        "txid: {}, block height: {}, chaintip height: {}",
                        hex::encode(utxo.txid()),
                        coin.height,
                        active_height
                    ),
                ));
            }

            if stake.is_coinbase() != coin.is_coinbase {
                return Err(ProofValidationError::with_detail(
                    R::CoinbaseMismatch,
                    "coinbase-mismatch",
                    format!(
                        "expected {}, found {}",
                        stake.is_coinbase(),
                        coin.is_coinbase
                    ),
                ));
            }

            if stake.height() != coin.height {
                return Err(ProofValidationError::with_detail(
                    R::HeightMismatch,
                    "height-mismatch",
                    format!(
                        "expected {}, found {}",
                        stake.height(),
                        coin.height
                    ),
                ));
            }

            if stake.amount() != coin.amount {
                return Err(ProofValidationError::with_detail(
                    R::AmountMismatch,
                    "amount-mismatch",
                    format!(
                        "expected {}, found {}",
                        stake.amount(),
                        coin.amount
                    ),
                ));
            }

            let Some(destination) = coin.script.extract_destination() else {
                return Err(ProofValidationError::new(
                    R::NonStandardDestination,
                    "non-standard-destination",
                ));
            };

            let Destination::PubKeyHash(pkhash) = destination else {
                return Err(ProofValidationError::new(
                    R::DestinationNotSupported,
                    "destination-type-not-supported",
                ));
            };

            if pkhash != hash160(stake.pubkey().as_bytes()) {
                return Err(ProofValidationError::new(
                    R::DestinationMismatch,
                    "destination-mismatch",
                ));
            }
        }

        Ok(())
    }
}
