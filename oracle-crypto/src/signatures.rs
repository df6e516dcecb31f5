pub use ed25519_dalek::{SigningKey, VerifyingKey};
use anyhow::{anyhow, bail, Result};
use ed25519_dalek::{Signature, Signer, Verifier};
use oracle_types::{Principal, Transaction};
use rand::rngs::OsRng;

pub fn generate_keypair() -> SigningKey {
    let mut csprng = OsRng;
    SigningKey::generate(&mut csprng)
}

pub fn principal_of(key: &SigningKey) -> Principal {
    Principal(key.verifying_key().to_bytes())
}

pub fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    let sig: Signature = key.sign(message);
    sig.to_bytes().to_vec()
}

pub fn verify_signature(pubkey_bytes: &[u8; 32], message: &[u8], signature_bytes: &[u8]) -> Result<()> {
    let pubkey = VerifyingKey::from_bytes(pubkey_bytes).map_err(|_| anyhow!("Invalid public key"))?;

    let sig_bytes: &[u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| anyhow!("Invalid signature length"))?;
    let signature = Signature::from_bytes(sig_bytes);

    pubkey
        .verify(message, &signature)
        .map_err(|_| anyhow!("Signature verification failed"))?;
    Ok(())
}

/// Fills in `tx.signature` for the given key. The key must belong to `tx.sender`.
pub fn sign_transaction(key: &SigningKey, tx: &mut Transaction) -> Result<()> {
    if principal_of(key) != tx.sender {
        bail!("Signing key does not match sender {}", tx.sender);
    }
    tx.signature = sign(key, &tx.signing_bytes());
    Ok(())
}

pub fn verify_transaction(tx: &Transaction) -> Result<()> {
    verify_signature(tx.sender.as_bytes(), &tx.signing_bytes(), &tx.signature)
}
