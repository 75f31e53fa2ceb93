use domain::UserName;
use sha2::{Digest, Sha256};

/// Stable like-ledger identity for a user name. The salt keeps raw names
/// out of the ledger table.
pub fn user_token(salt: &str, user_name: &UserName) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(user_name.as_str().as_bytes());
    hex::encode(hasher.finalize())
}
