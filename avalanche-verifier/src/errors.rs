// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Proof rejection reasons.

use thiserror::Error;

/// Machine-readable rejection kind.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProofValidationResult {
    NoStake,
    TooManyUtxos,
    DustThreshold,
    WrongStakeOrdering,
    DuplicateStake,
    InvalidStakeSignature,
    InvalidProofSignature,
    InvalidPayoutScript,
    Expired,
    MissingUtxo,
    ImmatureUtxo,
    CoinbaseMismatch,
    HeightMismatch,
    AmountMismatch,
    NonStandardDestination,
    DestinationNotSupported,
    DestinationMismatch,
}

/// A proof rejection: the kind, its short reject label, and an optional
/// detail such as the offending transaction id. The first failed check of
/// a verification produces the one and only error.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{label}{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
pub struct ProofValidationError {
    result: ProofValidationResult,
    label: &'static str,
    detail: Option<String>,
}

impl ProofValidationError {
    pub(crate) fn new(
        result: ProofValidationResult,
        label: &'static str,
    ) -> Self {
        Self {
            result,
            label,
            detail: None,
        }
    }

    pub(crate) fn with_detail(
        result: ProofValidationResult,
        label: &'static str,
        detail: String,
    ) -> Self {
        Self {
            result,
            label,
            detail: Some(detail),
        }
    }

    pub fn result(&self) -> ProofValidationResult {
        self.result
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
