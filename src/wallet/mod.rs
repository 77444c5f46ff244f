use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};

use crate::transaction::Transaction;

/// Generate a new secp256k1 keypair and return (priv_hex, pub_hex_compressed).
/// The compressed public key hex doubles as the wallet address.
pub fn generate_keypair_hex() -> (String, String) {
    let secp = Secp256k1::new();
    let (sk, pk) = secp.generate_keypair(&mut OsRng);
    (hex::encode(sk.secret_bytes()), hex::encode(pk.serialize()))
}

/// Derive the address (compressed public key hex) owned by a hex private key.
pub fn address_from_secret_hex(secret_hex: &str) -> Result<String, &'static str> {
    let secp = Secp256k1::signing_only();
    let sk = parse_secret_key(secret_hex)?;
    Ok(hex::encode(PublicKey::from_secret_key(&secp, &sk).serialize()))
}

/// Sign the canonical payload of `tx` and return the hex DER signature.
pub fn sign_transaction_hex(secret_hex: &str, tx: &Transaction) -> Result<String, &'static str> {
    let secp = Secp256k1::signing_only();
    let sk = parse_secret_key(secret_hex)?;
    let msg = Message::from_slice(&tx.sighash()).map_err(|_| "invalid message length")?;
    let sig = secp.sign_ecdsa(&msg, &sk);
    Ok(hex::encode(sig.serialize_der().to_vec()))
}

/// Check that `signature_hex` was produced by the key behind `sender_hex`
/// over the canonical payload of `tx`. Any decoding failure is a rejection.
pub fn verify(sender_hex: &str, signature_hex: &str, tx: &Transaction) -> bool {
    match verify_signature_hex(sender_hex, signature_hex, tx.sighash()) {
        Ok(ok) => ok,
        Err(reason) => {
            log::debug!("signature rejected: {reason}");
            false
        }
    }
}

/// Verify a signature (hex DER) against the given pubkey (hex) and message hash.
fn verify_signature_hex(
    pubkey_hex: &str,
    sig_hex: &str,
    msg32: [u8; 32],
) -> Result<bool, &'static str> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex).map_err(|_| "invalid signature hex")?;
    let sig = Signature::from_der(&sig_bytes).map_err(|_| "invalid DER signature")?;

    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| "invalid pubkey hex")?;
    let pk = PublicKey::from_slice(&pk_bytes).map_err(|_| "invalid pubkey bytes")?;

    let msg = Message::from_slice(&msg32).map_err(|_| "invalid message length")?;
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}

fn parse_secret_key(secret_hex: &str) -> Result<SecretKey, &'static str> {
    let bytes = hex::decode(secret_hex).map_err(|_| "invalid private key hex")?;
    SecretKey::from_slice(&bytes).map_err(|_| "invalid private key bytes")
}
