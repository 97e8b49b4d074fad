//! In-process stand-in device for session tests.
//!
//! Speaks the byte-exact command protocol over an in-memory duplex pipe,
//! with a per-handle permission table so permission gating exercises the
//! same status-rejection path as real hardware. Sealing is a deterministic
//! keystream XOR with a checksum tag, deliberately not cryptography, just
//! enough structure that validate only matches under the sealing handle
//! and nonce.

use std::collections::HashMap;

use hsm_wire::{
    KeyHandleFlags, StatusCode, AEAD_MAC_SIZE, DATA_BUF_SIZE, MONITOR_EXIT_MAGIC, NONCE_SIZE,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use crate::session::Session;

pub(crate) struct MockDevice {
    handles: HashMap<u32, KeyHandleFlags>,
    stream: DuplexStream,
    rng_state: u32,
}

impl MockDevice {
    /// Spin up a device provisioned with the given key handles and return
    /// a session connected to it.
    pub(crate) fn provision(
        handles: &[(u32, KeyHandleFlags)],
    ) -> (Session<DuplexStream>, JoinHandle<()>) {
        let (client, server) = tokio::io::duplex(1024);
        let device = MockDevice {
            handles: handles.iter().copied().collect(),
            stream: server,
            rng_state: 0x1234_5678,
        };
        let task = tokio::spawn(device.run());
        (Session::new(client), task)
    }

    async fn run(mut self) {
        let mut buf = [0u8; 1024];
        loop {
            let n = match self.stream.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            // One read is one request frame; the client never pipelines.
            let frame = &buf[..n];
            let reply = self.dispatch(frame);
            if let Some(reply) = reply {
                if self.stream.write_all(&reply).await.is_err() {
                    return;
                }
            }
        }
    }

    fn dispatch(&mut self, frame: &[u8]) -> Option<Vec<u8>> {
        let (&opcode, payload) = frame.split_first()?;
        match opcode {
            0x01 => Some(self.generate(payload)),
            0x03 => Some(self.generate_random(payload)),
            0x04 => Some(self.validate(payload)),
            0x23 => Some(Self::echo(payload)),
            0x24 => Some(self.random(payload)),
            0x26 => Some(Self::system_info()),
            0x7F => {
                // Monitor exit never gets a reply, valid handshake or not;
                // the transition happens only on the exact magic pair.
                let magic = payload
                    .get(..4)
                    .map(|b| u32::from_le_bytes(b.try_into().unwrap()));
                let inv = payload
                    .get(4..8)
                    .map(|b| u32::from_le_bytes(b.try_into().unwrap()));
                debug_assert_eq!(magic, Some(MONITOR_EXIT_MAGIC));
                debug_assert_eq!(inv, Some(0xFFFF_FFFF - MONITOR_EXIT_MAGIC));
                None
            }
            _ => Some(vec![StatusCode::InvalidParameter as u8]),
        }
    }

    fn allowed(&self, key_handle: u32, flag: KeyHandleFlags) -> bool {
        self.handles
            .get(&key_handle)
            .is_some_and(|flags| flags.contains(flag))
    }

    fn generate(&self, payload: &[u8]) -> Vec<u8> {
        let Some((nonce, key_handle, plaintext)) = split_aead_request(payload) else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        if !self.allowed(key_handle, KeyHandleFlags::AEAD_GENERATE)
            || plaintext.len() > DATA_BUF_SIZE
        {
            return vec![StatusCode::InvalidParameter as u8];
        }
        let mut reply = vec![StatusCode::Ok as u8];
        reply.extend_from_slice(&seal(nonce, key_handle, plaintext));
        reply
    }

    fn generate_random(&mut self, payload: &[u8]) -> Vec<u8> {
        let Some((nonce, key_handle, rest)) = split_aead_request(payload) else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        let [num_bytes] = rest else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        let num_bytes = *num_bytes as usize;
        if !self.allowed(key_handle, KeyHandleFlags::RANDOM_AEAD_GENERATE)
            || num_bytes == 0
            || num_bytes > DATA_BUF_SIZE
        {
            return vec![StatusCode::InvalidParameter as u8];
        }
        let plaintext: Vec<u8> = (0..num_bytes).map(|_| self.next_random()).collect();
        let mut reply = vec![StatusCode::Ok as u8];
        reply.extend_from_slice(&seal(nonce, key_handle, &plaintext));
        reply
    }

    fn validate(&self, payload: &[u8]) -> Vec<u8> {
        let Some((nonce, key_handle, var)) = split_aead_request(payload) else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        if !self.allowed(key_handle, KeyHandleFlags::AEAD_DECRYPT_CMP) {
            return vec![StatusCode::InvalidParameter as u8];
        }
        // The variable region is aead_data(P+8) followed by expected(P).
        if var.len() < AEAD_MAC_SIZE || (var.len() - AEAD_MAC_SIZE) % 2 != 0 {
            return vec![StatusCode::InvalidParameter as u8];
        }
        let plaintext_len = (var.len() - AEAD_MAC_SIZE) / 2;
        let (aead_data, expected) = var.split_at(plaintext_len + AEAD_MAC_SIZE);

        let status = match open(nonce, key_handle, aead_data) {
            Some(plaintext) if plaintext == expected => StatusCode::Ok,
            _ => StatusCode::Mismatch,
        };
        vec![status as u8]
    }

    fn echo(payload: &[u8]) -> Vec<u8> {
        let Some((_count, data)) = payload.split_first() else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        let mut reply = vec![StatusCode::Ok as u8, data.len() as u8];
        reply.extend_from_slice(data);
        reply
    }

    fn random(&mut self, payload: &[u8]) -> Vec<u8> {
        let [num_bytes] = payload else {
            return vec![StatusCode::InvalidParameter as u8];
        };
        let mut reply = vec![StatusCode::Ok as u8, *num_bytes];
        for _ in 0..*num_bytes {
            let b = self.next_random();
            reply.push(b);
        }
        reply
    }

    fn system_info() -> Vec<u8> {
        let mut reply = vec![StatusCode::Ok as u8, 1, 0, 4, 1];
        reply.extend_from_slice(b"mock-hsm-dev");
        reply
    }

    fn next_random(&mut self) -> u8 {
        // xorshift; deterministic on purpose
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;
        self.rng_state as u8
    }
}

fn split_aead_request(payload: &[u8]) -> Option<(&[u8], u32, &[u8])> {
    if payload.len() < NONCE_SIZE + 4 {
        return None;
    }
    let (nonce, rest) = payload.split_at(NONCE_SIZE);
    let (kh, rest) = rest.split_at(4);
    let key_handle = u32::from_le_bytes(kh.try_into().unwrap());
    Some((nonce, key_handle, rest))
}

// Mixed well enough that flipping one handle or nonce bit changes every
// byte; a linear combination here would let wrong-handle opens cancel out.
fn keystream_byte(nonce: &[u8], key_handle: u32, i: usize) -> u8 {
    let mut x = key_handle
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(u32::from(nonce[i % NONCE_SIZE]) << 8)
        .wrapping_add(i as u32);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x as u8
}

fn tag(nonce: &[u8], key_handle: u32, plaintext: &[u8]) -> [u8; AEAD_MAC_SIZE] {
    let mut tag = [0u8; AEAD_MAC_SIZE];
    for (i, &b) in plaintext.iter().enumerate() {
        let slot = i % AEAD_MAC_SIZE;
        tag[slot] = tag[slot]
            .wrapping_add(b)
            .rotate_left(3)
            ^ keystream_byte(nonce, key_handle, i + 0x100);
    }
    for (i, t) in tag.iter_mut().enumerate() {
        *t ^= keystream_byte(nonce, key_handle, i + 0x200) ^ plaintext.len() as u8;
    }
    tag
}

fn seal(nonce: &[u8], key_handle: u32, plaintext: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = plaintext
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ keystream_byte(nonce, key_handle, i))
        .collect();
    out.extend_from_slice(&tag(nonce, key_handle, plaintext));
    out
}

fn open(nonce: &[u8], key_handle: u32, aead_data: &[u8]) -> Option<Vec<u8>> {
    if aead_data.len() < AEAD_MAC_SIZE {
        return None;
    }
    let (cipher, received_tag) = aead_data.split_at(aead_data.len() - AEAD_MAC_SIZE);
    let plaintext: Vec<u8> = cipher
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ keystream_byte(nonce, key_handle, i))
        .collect();
    if tag(nonce, key_handle, &plaintext) != received_tag {
        return None;
    }
    Some(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let nonce = [9u8; 6];
        let sealed = seal(&nonce, 0x2000, b"hello");
        assert_eq!(sealed.len(), 5 + AEAD_MAC_SIZE);
        assert_eq!(open(&nonce, 0x2000, &sealed).unwrap(), b"hello");
    }

    #[test]
    fn test_open_under_wrong_handle_fails() {
        let nonce = [9u8; 6];
        let sealed = seal(&nonce, 0x2000, b"hello");
        assert!(open(&nonce, 0x2001, &sealed).is_none());
        assert!(open(&[8u8; 6], 0x2000, &sealed).is_none());
    }
}
