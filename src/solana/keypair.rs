// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Master keypair loading from a Solana CLI keyfile.

use std::path::Path;

use ed25519_dalek::{SigningKey, KEYPAIR_LENGTH};

use super::error::KeypairError;
use super::pubkey::Pubkey;

/// Read a keyfile holding a JSON array of 64 bytes: secret then public.
pub fn load_keypair(path: &Path) -> Result<SigningKey, KeypairError> {
    let raw = std::fs::read_to_string(path).map_err(|source| KeypairError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes: Vec<u8> = serde_json::from_str(&raw).map_err(|source| KeypairError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes: [u8; KEYPAIR_LENGTH] = bytes
        .try_into()
        .map_err(|raw: Vec<u8>| KeypairError::Length(raw.len()))?;

    SigningKey::from_keypair_bytes(&bytes).map_err(|_| KeypairError::Mismatch)
}

pub fn pubkey_of(key: &SigningKey) -> Pubkey {
    Pubkey::new(key.verifying_key().to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn keyfile(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_cli_keyfile() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let json = serde_json::to_string(&key.to_keypair_bytes().to_vec()).unwrap();
        let file = keyfile(&json);

        let loaded = load_keypair(file.path()).unwrap();
        assert_eq!(pubkey_of(&loaded), pubkey_of(&key));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_keypair(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, KeypairError::Io { .. }));
    }

    #[test]
    fn short_array_is_rejected() {
        let file = keyfile(&serde_json::to_string(&vec![1u8; 32]).unwrap());
        assert!(matches!(load_keypair(file.path()), Err(KeypairError::Length(32))));
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let mut bytes = SigningKey::from_bytes(&[3u8; 32]).to_keypair_bytes();
        bytes[63] ^= 0xff;
        let file = keyfile(&serde_json::to_string(&bytes.to_vec()).unwrap());
        assert!(matches!(load_keypair(file.path()), Err(KeypairError::Mismatch)));
    }

    #[test]
    fn non_json_is_format_error() {
        let file = keyfile("not a keyfile");
        assert!(matches!(load_keypair(file.path()), Err(KeypairError::Format { .. })));
    }
}
