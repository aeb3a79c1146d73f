// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Double-SHA256 hashing behind every proof identity.

use std::io::{self, Write};

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub type Hash = [u8; 32];

/// Incremental double-SHA256 writer. Canonical encodings stream straight
/// into it through [`io::Write`], without an intermediate buffer.
#[derive(Default)]
pub struct Hasher(Sha256);

impl Hasher {
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    pub fn finalize(self) -> Hash {
        Sha256::digest(self.0.finalize()).into()
    }

    /// One-shot digest of a byte slice.
    pub fn digest(bytes: &[u8]) -> Hash {
        let mut hasher = Self::new();
        hasher.0.update(bytes);
        hasher.finalize()
    }
}

impl Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// RIPEMD-160 of SHA-256, the short hash behind P2PKH destinations.
pub fn hash160(bytes: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(bytes)).into()
}
