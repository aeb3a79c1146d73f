// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Every rejection reason triggered by a minimal mutation of a valid
//! proof, against an in-memory chain view.

use std::collections::HashMap;

use avalanche_data::amount::COIN;
use avalanche_data::builder::ProofBuilder;
use avalanche_data::hash::hash160;
use avalanche_data::proof::{Payout, Proof, StakeCommitment};
use avalanche_data::schnorr::{KeyPair, Signature};
use avalanche_data::script::Script;
use avalanche_data::stake::{OutPoint, SignedStake, Stake};
use avalanche_verifier::chain::{ChainTip, ChainView, Coin};
use avalanche_verifier::config::PROOF_DUST_THRESHOLD;
use avalanche_verifier::errors::ProofValidationResult as R;
use avalanche_verifier::verifier::{check_proof, Verifier};

const DUST: i64 = PROOF_DUST_THRESHOLD;

struct MockChainView {
    tip: Option<ChainTip>,
    coins: HashMap<OutPoint, Coin>,
    min_confirmations: u32,
}

impl Default for MockChainView {
    fn default() -> Self {
        Self {
            tip: Some(ChainTip {
                height: 150,
                median_time_past: 700_000,
            }),
            coins: HashMap::new(),
            min_confirmations: 1,
        }
    }
}

impl ChainView for MockChainView {
    fn active_tip(&self) -> Option<ChainTip> {
        self.tip
    }

    fn active_height(&self) -> i32 {
        self.tip.map_or(0, |tip| tip.height)
    }

    fn get_coin(&self, utxo: &OutPoint) -> Option<Coin> {
        self.coins.get(utxo).cloned()
    }

    fn stake_utxo_min_confirmations(&self) -> u32 {
        self.min_confirmations
    }
}

fn master() -> KeyPair {
    KeyPair::from_seed_u64(1)
}

fn stake_key(i: u64) -> KeyPair {
    KeyPair::from_seed_u64(100 + i)
}

fn p2pkh_for(key: &KeyPair) -> Script {
    Script::new_p2pkh(hash160(key.public_key().as_bytes()))
}

fn coin_for(stake: &Stake, key: &KeyPair) -> Coin {
    Coin {
        height: stake.height(),
        is_coinbase: stake.is_coinbase(),
        amount: stake.amount(),
        script: p2pkh_for(key),
    }
}

/// A current-format proof over one 10-coin UTXO at height 100, plus the
/// chain view it verifies against.
fn valid_setup() -> (Proof, MockChainView) {
    let mut builder =
        ProofBuilder::new_current(42, 0, master(), p2pkh_for(&master()));
    builder
        .add_utxo(OutPoint::new([1; 32], 0), 10 * COIN, 100, false, stake_key(0))
        .unwrap();
    let proof = builder.build().unwrap();

    let mut view = MockChainView::default();
    let stake = proof.stakes()[0].stake();
    view.coins.insert(*stake.utxo(), coin_for(stake, &stake_key(0)));

    (proof, view)
}

/// Assembles a current proof around prepared signed stakes, signing the
/// proof in a second pass once the limited id is known.
fn sign_current(
    sequence: u64,
    expiration_time: i64,
    master: &KeyPair,
    payout_script: Script,
    stakes: Vec<SignedStake>,
) -> Proof {
    let unsigned = Proof::new(
        sequence,
        expiration_time,
        *master.public_key(),
        Some(Payout::new(payout_script.clone(), Signature::default())),
        stakes.clone(),
    )
    .unwrap();

    let sig = master.sign_schnorr(unsigned.limited_proofid().inner());
    Proof::new(
        sequence,
        expiration_time,
        *master.public_key(),
        Some(Payout::new(payout_script, sig)),
        stakes,
    )
    .unwrap()
}

fn result_of(proof: &Proof, view: &MockChainView) -> Option<R> {
    Verifier::new(view).verify(proof, DUST).err().map(|e| e.result())
}

#[test]
fn a_valid_proof_passes_both_tiers() {
    let (proof, view) = valid_setup();

    assert!(check_proof(&proof, DUST).is_ok());
    assert!(Verifier::new(&view).verify(&proof, DUST).is_ok());
    assert_eq!(proof.score(), 1000);
}

#[test]
fn a_valid_legacy_proof_passes_both_tiers() {
    let mut builder = ProofBuilder::new_legacy(42, 0, master());
    builder
        .add_utxo(OutPoint::new([2; 32], 1), 10 * COIN, 100, false, stake_key(1))
        .unwrap();
    let proof = builder.build().unwrap();

    let mut view = MockChainView::default();
    let stake = proof.stakes()[0].stake();
    view.coins.insert(*stake.utxo(), coin_for(stake, &stake_key(1)));

    assert!(Verifier::new(&view).verify(&proof, DUST).is_ok());
}

#[test]
fn an_empty_proof_has_no_stake() {
    let proof = ProofBuilder::new_current(0, 0, master(), p2pkh_for(&master()))
        .build()
        .unwrap();

    let err = check_proof(&proof, DUST).unwrap_err();
    assert_eq!(err.result(), R::NoStake);
}

#[test]
fn too_many_stakes_are_rejected() {
    // signatures are irrelevant: the ceiling is checked before them
    let pubkey = *stake_key(0).public_key();
    let mut stakes = Vec::new();
    for i in 0..1001u32 {
        let mut txid = [0u8; 32];
        txid[..4].copy_from_slice(&i.to_le_bytes());
        let stake =
            Stake::new(OutPoint::new(txid, 0), 10 * COIN, 100, false, pubkey)
                .unwrap();
        stakes.push(SignedStake::new(stake, Signature::default()));
    }

    let proof =
        Proof::new(0, 0, *master().public_key(), None, stakes).unwrap();
    let err = check_proof(&proof, DUST).unwrap_err();
    assert_eq!(err.result(), R::TooManyUtxos);
}

#[test]
fn stakes_below_the_dust_threshold_are_rejected() {
    let mut builder =
        ProofBuilder::new_current(42, 0, master(), p2pkh_for(&master()));
    builder
        .add_utxo(OutPoint::new([1; 32], 0), COIN / 2, 100, false, stake_key(0))
        .unwrap();
    let proof = builder.build().unwrap();

    let err = check_proof(&proof, DUST).unwrap_err();
    assert_eq!(err.result(), R::DustThreshold);
}

#[test]
fn inverted_stake_ordering_is_rejected() {
    // current format: the stake commitment does not depend on the stake
    // set, so the reordered stakes keep valid signatures and only the
    // ordering is at fault once the proof itself is re-signed
    let m = master();
    let mut builder = ProofBuilder::new_current(0, 0, m.clone(), p2pkh_for(&m));
    for i in 0..2u8 {
        builder
            .add_utxo(
                OutPoint::new([i + 1; 32], 0),
                5 * COIN,
                100,
                false,
                stake_key(u64::from(i)),
            )
            .unwrap();
    }
    let proof = builder.build().unwrap();
    assert!(
        proof.stakes()[0].stake().id() <= proof.stakes()[1].stake().id(),
        "builder output must be sorted"
    );

    let mut reversed = proof.stakes().to_vec();
    reversed.reverse();
    let inverted = sign_current(0, 0, &m, p2pkh_for(&m), reversed);

    let err = check_proof(&inverted, DUST).unwrap_err();
    assert_eq!(err.result(), R::WrongStakeOrdering);
}

#[test]
fn duplicate_utxos_are_rejected() {
    let m = master();
    let commitment = StakeCommitment::current(0, m.public_key()).unwrap();

    // the same outpoint claimed by two different keys, both well signed
    let utxo = OutPoint::new([7; 32], 0);
    let mut stakes: Vec<(Stake, KeyPair)> = (1..=2)
        .map(|i| {
            let key = stake_key(i);
            let stake =
                Stake::new(utxo, 5 * COIN, 100, false, *key.public_key())
                    .unwrap();
            (stake, key)
        })
        .collect();
    stakes.sort_by_key(|(stake, _)| *stake.id());

    let signed = stakes
        .iter()
        .map(|(stake, key)| {
            let msg = stake.signature_message(&commitment).unwrap();
            SignedStake::new(stake.clone(), key.sign_schnorr(&msg))
        })
        .collect();

    let proof = sign_current(0, 0, &m, p2pkh_for(&m), signed);
    let err = check_proof(&proof, DUST).unwrap_err();
    assert_eq!(err.result(), R::DuplicateStake);
}

#[test]
fn a_bad_stake_signature_is_rejected() {
    let (proof, _) = valid_setup();

    let tampered: Vec<_> = proof
        .stakes()
        .iter()
        .map(|ss| SignedStake::new(ss.stake().clone(), Signature::default()))
        .collect();
    let proof = sign_current(
        proof.sequence(),
        proof.expiration_time(),
        &master(),
        p2pkh_for(&master()),
        tampered,
    );

    let err = check_proof(&proof, DUST).unwrap_err();
    assert_eq!(err.result(), R::InvalidStakeSignature);
    assert!(err.detail().unwrap().contains("txid"));
}

#[test]
fn a_bad_proof_signature_is_rejected() {
    let (proof, _) = valid_setup();

    let tampered = Proof::new(
        proof.sequence(),
        proof.expiration_time(),
        *proof.master(),
        Some(Payout::new(p2pkh_for(&master()), Signature::default())),
        proof.stakes().to_vec(),
    )
    .unwrap();

    let err = check_proof(&tampered, DUST).unwrap_err();
    assert_eq!(err.result(), R::InvalidProofSignature);
}

#[test]
fn a_non_standard_payout_script_is_rejected() {
    let (proof, _) = valid_setup();

    let tampered = Proof::new(
        proof.sequence(),
        proof.expiration_time(),
        *proof.master(),
        Some(Payout::new(Script::new(vec![0x51]), Signature::default())),
        proof.stakes().to_vec(),
    )
    .unwrap();

    let err = check_proof(&tampered, DUST).unwrap_err();
    assert_eq!(err.result(), R::InvalidPayoutScript);
}

#[test]
fn the_first_failing_check_wins() {
    // every stake is below dust and the order is inverted on top; the
    // dust check on the first stake is what gets reported
    let mut builder = ProofBuilder::new_legacy(0, 0, master());
    for (i, amount) in [(1u8, COIN / 4), (2, COIN / 8)] {
        builder
            .add_utxo(
                OutPoint::new([i; 32], 0),
                amount,
                100,
                false,
                stake_key(u64::from(i)),
            )
            .unwrap();
    }
    let proof = builder.build().unwrap();

    let mut reversed = proof.stakes().to_vec();
    reversed.reverse();
    let inverted =
        Proof::new(0, 0, *master().public_key(), None, reversed).unwrap();

    let err = check_proof(&inverted, DUST).unwrap_err();
    assert_eq!(err.result(), R::DustThreshold);
}

#[test]
fn proofs_expire_against_the_tip_mtp() {
    let mut builder = ProofBuilder::new_current(
        42,
        1_000_000,
        master(),
        p2pkh_for(&master()),
    );
    builder
        .add_utxo(OutPoint::new([1; 32], 0), 10 * COIN, 100, false, stake_key(0))
        .unwrap();
    let proof = builder.build().unwrap();

    let mut view = MockChainView::default();
    let stake = proof.stakes()[0].stake();
    view.coins.insert(*stake.utxo(), coin_for(stake, &stake_key(0)));

    // the boundary is exclusive: mtp == expiration is already expired
    view.tip = Some(ChainTip {
        height: 150,
        median_time_past: 1_000_000,
    });
    assert_eq!(result_of(&proof, &view), Some(R::Expired));

    view.tip = Some(ChainTip {
        height: 150,
        median_time_past: 999_999,
    });
    assert_eq!(result_of(&proof, &view), None);
}

#[test]
fn missing_utxos_are_rejected() {
    let (proof, mut view) = valid_setup();
    view.coins.clear();

    assert_eq!(result_of(&proof, &view), Some(R::MissingUtxo));
}

#[test]
fn immature_utxos_are_rejected() {
    let mut builder =
        ProofBuilder::new_current(42, 0, master(), p2pkh_for(&master()));
    builder
        .add_utxo(OutPoint::new([1; 32], 0), 10 * COIN, 200, true, stake_key(0))
        .unwrap();
    let proof = builder.build().unwrap();

    let mut view = MockChainView::default();
    view.min_confirmations = 100;
    view.tip = Some(ChainTip {
        height: 250,
        median_time_past: 700_000,
    });
    let stake = proof.stakes()[0].stake();
    view.coins.insert(*stake.utxo(), coin_for(stake, &stake_key(0)));

    // 200 + 100 - 1 = 299 > 250
    assert_eq!(result_of(&proof, &view), Some(R::ImmatureUtxo));

    // one block past maturity is enough
    view.tip = Some(ChainTip {
        height: 299,
        median_time_past: 700_000,
    });
    assert_eq!(result_of(&proof, &view), None);
}

#[test]
fn coinbase_mismatches_are_rejected() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().is_coinbase = true;

    assert_eq!(result_of(&proof, &view), Some(R::CoinbaseMismatch));
}

#[test]
fn height_mismatches_are_rejected() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().height = 90;

    assert_eq!(result_of(&proof, &view), Some(R::HeightMismatch));
}

#[test]
fn amount_mismatches_are_rejected() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().amount = 11 * COIN;

    assert_eq!(result_of(&proof, &view), Some(R::AmountMismatch));
}

#[test]
fn unparseable_destinations_are_rejected() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().script = Script::new(vec![0x00]);

    assert_eq!(result_of(&proof, &view), Some(R::NonStandardDestination));
}

#[test]
fn non_p2pkh_destinations_are_not_supported() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().script =
        Script::new_p2sh([0x11; 20]);

    assert_eq!(result_of(&proof, &view), Some(R::DestinationNotSupported));
}

#[test]
fn destinations_must_match_the_stake_key() {
    let (proof, mut view) = valid_setup();
    let utxo = *proof.stakes()[0].stake().utxo();
    view.coins.get_mut(&utxo).unwrap().script = p2pkh_for(&stake_key(9));

    assert_eq!(result_of(&proof, &view), Some(R::DestinationMismatch));
}
