use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::PasswordConfig;

/// Argon2id hashing of account passwords with one parameter set.
///
/// Also holds a decoy hash of a random secret, so a login for an unknown
/// username can pay the same verify cost as a login with a wrong password.
#[derive(Clone)]
pub struct Passwords {
    argon2: Argon2<'static>,
    decoy_hash: String,
}

fn hash_with(argon2: &Argon2<'_>, plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

impl Passwords {
    pub fn from_config(config: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_secret = SaltString::generate(&mut OsRng);
        let decoy_hash = hash_with(&argon2, decoy_secret.as_str())?;
        Ok(Self { argon2, decoy_hash })
    }

    /// PHC string with a fresh random salt, so equal inputs never hash alike.
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        hash_with(&self.argon2, plain)
    }

    /// Returns `Ok(false)` on mismatch; errors only when `hash` is not a PHC string.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    /// Runs a full verify against the decoy hash and discards the outcome.
    pub fn verify_decoy(&self, plain: &str) {
        let _ = self.verify(plain, &self.decoy_hash);
    }
}

#[cfg(test)]
pub(crate) fn test_passwords() -> Passwords {
    Passwords::from_config(&PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test argon2 parameters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let passwords = test_passwords();
        let password = "Secur3P@ssw0rd!";
        let hash = passwords.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(passwords.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let passwords = test_passwords();
        let hash = passwords.hash("correct-horse-battery-staple").unwrap();
        assert!(!passwords.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_secret_gets_a_new_salt_each_time() {
        let passwords = test_passwords();
        let a = passwords.hash("pw123456").expect("hash a");
        let b = passwords.hash("pw123456").expect("hash b");
        assert_ne!(a, b);
        assert!(passwords.verify("pw123456", &a).unwrap());
        assert!(passwords.verify("pw123456", &b).unwrap());
    }

    #[test]
    fn verifies_hashes_made_with_other_parameters() {
        let stored = Passwords::from_config(&PasswordConfig::default())
            .unwrap()
            .hash("pw123456")
            .unwrap();
        assert!(test_passwords().verify("pw123456", &stored).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = test_passwords()
            .verify("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn decoy_hash_costs_the_same_as_a_real_one() {
        let passwords = test_passwords();
        let real = passwords.hash("pw123456").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let decoy = PasswordHash::new(&passwords.decoy_hash).unwrap();
        assert_eq!(real.algorithm, decoy.algorithm);
        assert_eq!(real.version, decoy.version);
        assert_eq!(Params::try_from(&real).unwrap(), Params::try_from(&decoy).unwrap());

        assert!(!passwords.verify("pw123456", &passwords.decoy_hash).unwrap());
        passwords.verify_decoy("pw123456");
    }

    #[test]
    fn rejects_unusable_parameters() {
        let config = PasswordConfig {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        };
        assert!(Passwords::from_config(&config).is_err());
    }
}
