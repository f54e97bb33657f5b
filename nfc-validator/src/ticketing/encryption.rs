// nfc-validator/src/ticketing/encryption.rs
//! AES-128-CBC envelope around the JSON ticket.
//!
//! The IV is the card UID copied into a zeroed block, so the same ticket on
//! two cards never encrypts to the same bytes.

use std::fmt;

use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::{Deserialize, Serialize};

use crate::constants::CIPHER_BLOCK_SIZE;
use crate::ticketing::ticket::Ticket;
use crate::{Error, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Static symmetric key shared by every validator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherKey(#[serde(with = "hex::serde")] [u8; CIPHER_BLOCK_SIZE]);

impl CipherKey {
    pub fn from_bytes(bytes: [u8; CIPHER_BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; CIPHER_BLOCK_SIZE];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|err| Error::Configuration(format!("cipher key: {}", err)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; CIPHER_BLOCK_SIZE] {
        &self.0
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey(****)")
    }
}

/// UID bytes at the start of a zeroed block.
pub fn padded_iv(card_id: &[u8]) -> Result<[u8; CIPHER_BLOCK_SIZE]> {
    if card_id.len() > CIPHER_BLOCK_SIZE {
        return Err(Error::OversizedIdentifier {
            actual: card_id.len(),
            max: CIPHER_BLOCK_SIZE,
        });
    }
    let mut iv = [0u8; CIPHER_BLOCK_SIZE];
    iv[..card_id.len()].copy_from_slice(card_id);
    Ok(iv)
}

#[derive(Debug, Clone)]
pub struct TicketCipher {
    key: CipherKey,
}

impl TicketCipher {
    pub fn new(key: CipherKey) -> Self {
        Self { key }
    }

    pub fn encrypt_bytes(&self, plaintext: &[u8], iv: &[u8; CIPHER_BLOCK_SIZE]) -> Vec<u8> {
        Aes128CbcEnc::new(self.key.as_bytes().into(), iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    pub fn decrypt_bytes(&self, ciphertext: &[u8], iv: &[u8; CIPHER_BLOCK_SIZE]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % CIPHER_BLOCK_SIZE != 0 {
            return Err(Error::Cipher(format!(
                "ciphertext of {} bytes is not a whole number of blocks",
                ciphertext.len()
            )));
        }
        Aes128CbcDec::new(self.key.as_bytes().into(), iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| Error::Cipher("invalid padding".into()))
    }

    /// JSON-serialize and encrypt with the IV derived from `card_id`.
    pub fn encrypt_ticket(&self, ticket: &Ticket, card_id: &[u8]) -> Result<Vec<u8>> {
        let iv = padded_iv(card_id)?;
        let json = serde_json::to_vec(ticket)?;
        Ok(self.encrypt_bytes(&json, &iv))
    }

    pub fn decrypt_ticket(&self, ciphertext: &[u8], card_id: &[u8]) -> Result<Ticket> {
        let iv = padded_iv(card_id)?;
        let json = self.decrypt_bytes(ciphertext, &iv)?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    const UID: [u8; 7] = [0x04, 0x15, 0x91, 0x8A, 0xCB, 0x42, 0x20];

    fn cipher() -> TicketCipher {
        TicketCipher::new(CipherKey::from_bytes(core::array::from_fn(|i| i as u8)))
    }

    fn sample() -> Ticket {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut ticket = Ticket::new(UID.to_vec(), "BIT", now);
        ticket.credit = Decimal::new(1050, 2);
        ticket.session_expense = Decimal::new(3, 0);
        ticket.current_validation = Some(now);
        ticket
    }

    #[test]
    fn iv_pads_with_zeros() {
        let iv = padded_iv(&UID).unwrap();
        assert_eq!(&iv[..7], &UID);
        assert!(iv[7..].iter().all(|&b| b == 0));
        assert_eq!(padded_iv(&[0xAB; 16]).unwrap(), [0xAB; 16]);
        assert!(matches!(
            padded_iv(&[0u8; 17]),
            Err(Error::OversizedIdentifier { actual: 17, max: 16 })
        ));
    }

    #[test]
    fn ticket_round_trip() {
        let c = cipher();
        let bytes = c.encrypt_ticket(&sample(), &UID).unwrap();
        assert_eq!(bytes.len() % CIPHER_BLOCK_SIZE, 0);
        assert_eq!(c.decrypt_ticket(&bytes, &UID).unwrap(), sample());
    }

    #[test]
    fn iv_depends_on_card() {
        let c = cipher();
        let a = c.encrypt_ticket(&sample(), &UID).unwrap();
        let b = c.encrypt_ticket(&sample(), &[0x04, 0x01]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_or_garbage_fails() {
        let bytes = cipher().encrypt_ticket(&sample(), &UID).unwrap();
        let other = TicketCipher::new(CipherKey::from_bytes([0x55; 16]));
        assert!(other.decrypt_ticket(&bytes, &UID).is_err());
        assert!(matches!(
            cipher().decrypt_ticket(&bytes[..15], &UID),
            Err(Error::Cipher(_))
        ));
        assert!(cipher().decrypt_ticket(&[], &UID).is_err());
    }

    #[test]
    fn oversized_uid_rejected() {
        assert!(matches!(
            cipher().encrypt_ticket(&sample(), &[0x01; 17]),
            Err(Error::OversizedIdentifier { .. })
        ));
    }

    #[test]
    fn key_from_hex() {
        let key = CipherKey::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(key.as_bytes()[15], 0x0F);
        assert!(CipherKey::from_hex("0001").is_err());
        assert_eq!(format!("{:?}", key), "CipherKey(****)");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"000102030405060708090a0b0c0d0e0f\"");
    }
}
