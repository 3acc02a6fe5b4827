use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::ArgEnum;
use serde::Serialize;
use sha_core::variant::{
    Sha160, Sha256_224, Sha256_256, Sha512_224, Sha512_256, Sha512_384, Sha512_512, Variant,
};
use sha_core::{Accumulator, Algorithm};

/// The hash functions the tools can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashFn {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    #[clap(name = "sha512-224")]
    Sha512_224,
    #[clap(name = "sha512-256")]
    Sha512_256,
}

macro_rules! dispatch {
    ($hash_fn:expr, $f:ident ( $($arg:expr),* )) => {
        match $hash_fn {
            HashFn::Sha1 => $f::<Sha160>($($arg),*),
            HashFn::Sha224 => $f::<Sha256_224>($($arg),*),
            HashFn::Sha256 => $f::<Sha256_256>($($arg),*),
            HashFn::Sha384 => $f::<Sha512_384>($($arg),*),
            HashFn::Sha512 => $f::<Sha512_512>($($arg),*),
            HashFn::Sha512_224 => $f::<Sha512_224>($($arg),*),
            HashFn::Sha512_256 => $f::<Sha512_256>($($arg),*),
        }
    };
}

impl HashFn {
    pub fn digest_bytes(self) -> usize {
        dispatch!(self, digest_bytes())
    }

    /// Hex digest of everything `reader` yields.
    pub fn hash_reader(self, reader: &mut dyn Read, double: bool) -> Result<String> {
        dispatch!(self, hash_reader(reader, double))
    }

    pub fn hash_file(self, path: &Path, double: bool) -> Result<String> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        self.hash_reader(&mut BufReader::new(file), double)
            .with_context(|| format!("failed to hash {}", path.display()))
    }

    /// Hex Merkle root of hex encoded leaf digests.
    pub fn merkle_root(self, leaves: &[String]) -> Result<String> {
        dispatch!(self, merkle_root(leaves))
    }

    /// Merkle root of `data` read as concatenated raw digests.
    pub fn merkle_root_bytes(self, data: &[u8]) -> Result<Vec<u8>> {
        dispatch!(self, merkle_root_bytes(data))
    }

    /// Hash `data` whole, returning the raw digest bytes.
    pub fn hash(self, data: &[u8]) -> Result<Vec<u8>> {
        dispatch!(self, hash(data))
    }

    /// Hash `data` as a batch of `message_bytes` long messages.
    pub fn hash_many(self, data: &[u8], message_bytes: usize) -> Result<usize> {
        dispatch!(self, hash_many(data, message_bytes))
    }
}

fn digest_bytes<V: Variant>() -> usize {
    V::DIGEST_BYTES
}

fn hash_reader<V: Variant>(reader: &mut dyn Read, double: bool) -> Result<String> {
    let mut accumulator = Accumulator::<V>::new();
    io::copy(reader, &mut accumulator).context("failed to read input")?;

    let digest = if double {
        accumulator.finalize_double()
    } else {
        accumulator.finalize()
    };
    Ok(hex::encode(digest.as_ref()))
}

fn merkle_root<V: Variant>(leaves: &[String]) -> Result<String> {
    let mut data = Vec::with_capacity(leaves.len() * V::DIGEST_BYTES);
    for leaf in leaves {
        let bytes = hex::decode(leaf.trim()).with_context(|| format!("invalid hex digest {:?}", leaf))?;
        if bytes.len() != V::DIGEST_BYTES {
            bail!("digest {:?} is not {} bytes", leaf, V::DIGEST_BYTES);
        }
        data.extend_from_slice(&bytes);
    }

    Ok(hex::encode(merkle_root_bytes::<V>(&data)?))
}

fn merkle_root_bytes<V: Variant>(data: &[u8]) -> Result<Vec<u8>> {
    let chunks = data.chunks_exact(V::DIGEST_BYTES);
    if !chunks.remainder().is_empty() {
        bail!("{} bytes are not a whole number of digests", data.len());
    }

    let digests = chunks
        .map(|chunk| {
            <V::Digest as TryFrom<&[u8]>>::try_from(chunk)
                .map_err(|_| anyhow!("digest is not {} bytes", V::DIGEST_BYTES))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Algorithm::<V>::merkle_root(digests).as_ref().to_vec())
}

fn hash<V: Variant>(data: &[u8]) -> Result<Vec<u8>> {
    Ok(Algorithm::<V>::hash(data)?.as_ref().to_vec())
}

fn hash_many<V: Variant>(data: &[u8], message_bytes: usize) -> Result<usize> {
    let messages = data.chunks_exact(message_bytes.max(1)).collect::<Vec<_>>();
    Ok(Algorithm::<V>::hash_many(&messages)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_hash_reader() {
        let digest = HashFn::Sha256
            .hash_reader(&mut &b"abc"[..], false)
            .expect("hash failed");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let double = HashFn::Sha256
            .hash_reader(&mut &b"abc"[..], true)
            .expect("hash failed");
        let once = HashFn::Sha256.hash(b"abc").expect("hash failed");
        assert_eq!(double, hex::encode(HashFn::Sha256.hash(&once).expect("hash failed")));
    }

    #[test]
    fn test_hash_file() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        file.write_all(b"abc").expect("failed to write");
        file.flush().expect("failed to flush");

        let digest = HashFn::Sha1.hash_file(file.path(), false).expect("hash failed");
        assert_eq!(digest, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_merkle_root_from_hex() {
        let leaves = (0..3u8)
            .map(|k| {
                let mut digest = [0u8; 32];
                digest[0] = k;
                hex::encode(digest)
            })
            .collect::<Vec<_>>();

        assert_eq!(
            HashFn::Sha256.merkle_root(&leaves).expect("merkle root failed"),
            "bfcfa993a9500b71ce1c4b1530cc26318f97db545895f71bd1fd1687532885a7"
        );
        assert!(HashFn::Sha512.merkle_root(&leaves).is_err());
        assert!(HashFn::Sha256.merkle_root(&["zz".to_string()]).is_err());
    }

    #[test]
    fn test_names_parse() {
        assert_eq!(HashFn::from_str("sha512-256", false), Ok(HashFn::Sha512_256));
        assert_eq!(HashFn::from_str("sha1", false), Ok(HashFn::Sha1));
        assert_eq!(HashFn::Sha384.digest_bytes(), 48);
    }
}
