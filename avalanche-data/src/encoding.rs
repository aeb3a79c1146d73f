// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Canonical wire encoding of stakes and proofs. Encode and decode are
//! inverse; the encoded bytes feed the identity hashes, so the layouts
//! here are consensus-critical.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::proof::{
    Payout, Proof, ProofFormat, AVALANCHE_MAX_PROOF_STAKES,
};
use crate::schnorr::{PublicKey, Signature, PUBLIC_KEY_SIZE};
use crate::script::{Script, MAX_SCRIPT_SIZE};
use crate::stake::{OutPoint, SignedStake, Stake};
use crate::Serializable;

impl Serializable for PublicKey {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        Self::write_var_bytes(w, self.as_bytes())
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized,
    {
        let bytes = Self::read_var_bytes(r, PUBLIC_KEY_SIZE)?;
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("public key must be {PUBLIC_KEY_SIZE} bytes"),
            ));
        }

        PublicKey::from_slice(&bytes).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "malformed public key")
        })
    }
}

impl Serializable for Signature {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.0)
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized,
    {
        Ok(Signature(Self::read_bytes(r)?))
    }
}

impl Serializable for Script {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        Self::write_var_bytes(w, self.as_bytes())
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized,
    {
        Ok(Script::new(Self::read_var_bytes(r, MAX_SCRIPT_SIZE)?))
    }
}

impl Serializable for Stake {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.utxo().txid())?;
        w.write_all(&self.utxo().index().to_le_bytes())?;
        w.write_all(&self.amount().to_le_bytes())?;

        // the coinbase flag rides in the low bit of the height field
        let wire_height = (self.height() << 1) | u32::from(self.is_coinbase());
        w.write_all(&wire_height.to_le_bytes())?;

        self.pubkey().write(w)
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized,
    {
        let txid = Self::read_bytes(r)?;
        let index = Self::read_u32_le(r)?;
        let amount = Self::read_i64_le(r)?;
        let wire_height = Self::read_u32_le(r)?;
        let pubkey = PublicKey::read(r)?;

        Stake::new(
            OutPoint::new(txid, index),
            amount,
            wire_height >> 1,
            wire_height & 1 == 1,
            pubkey,
        )
    }
}

impl Serializable for SignedStake {
    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.stake().write(w)?;
        self.signature().write(w)
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self>
    where
        Self: Sized,
    {
        let stake = Stake::read(r)?;
        let sig = Signature::read(r)?;
        Ok(SignedStake::new(stake, sig))
    }
}

impl Proof {
    /// Encodes the proof in its own format.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.sequence().to_le_bytes())?;
        w.write_all(&self.expiration_time().to_le_bytes())?;
        self.master().write(w)?;

        SignedStake::write_varint(w, self.stakes().len() as u64)?;
        for ss in self.stakes() {
            ss.write(w)?;
        }

        if let Some(payout) = self.payout() {
            payout.script().write(w)?;
            payout.signature().write(w)?;
        }

        Ok(())
    }

    /// Decodes a proof. The expected wire format must be known up front;
    /// there is no version marker inside the stream.
    pub fn read<R: Read>(format: ProofFormat, r: &mut R) -> io::Result<Self> {
        let sequence = SignedStake::read_u64_le(r)?;
        let expiration_time = SignedStake::read_i64_le(r)?;
        let master = PublicKey::read(r)?;

        let count = SignedStake::read_varint(r)?;
        if count > AVALANCHE_MAX_PROOF_STAKES as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "too many stakes: {count} > {AVALANCHE_MAX_PROOF_STAKES}"
                ),
            ));
        }

        let stakes = (0..count)
            .map(|_| SignedStake::read(r))
            .collect::<Result<Vec<_>, _>>()?;

        let payout = match format {
            ProofFormat::Legacy => None,
            ProofFormat::Current => {
                let script = Script::read(r)?;
                let signature = Signature::read(r)?;
                Some(Payout::new(script, signature))
            }
        };

        Proof::new(sequence, expiration_time, master, payout, stakes)
    }

    /// Decodes a proof from its hexadecimal representation.
    pub fn from_hex(
        format: ProofFormat,
        hex_proof: &str,
    ) -> Result<Self, ParseError> {
        let bytes = hex::decode(hex_proof).map_err(|_| ParseError::NotHex)?;

        let mut r = bytes.as_slice();
        let proof = Proof::read(format, &mut r)
            .map_err(|e| ParseError::MalformedEncoding(e.to_string()))?;

        if !r.is_empty() {
            return Err(ParseError::MalformedEncoding(
                "trailing bytes after proof".into(),
            ));
        }

        Ok(proof)
    }

    /// Lower-case, even-length hexadecimal encoding of the proof.
    pub fn to_hex(&self) -> String {
        let mut buf = vec![];
        self.write(&mut buf).expect("in-memory write");
        hex::encode(buf)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not a hexadecimal string.
    #[error("proof must be an hexadecimal string")]
    NotHex,
    /// The bytes do not decode in the expected format.
    #[error("proof has invalid format: {0}")]
    MalformedEncoding(String),
}
