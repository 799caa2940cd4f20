//! Prime field arithmetic with a runtime modulus.
//!
//! All values live in `[0, P)` for a prime `P` chosen at session setup.
//! Every operation reduces its result back into that range before
//! returning; in particular [`PrimeField::sub`] corrects a negative raw
//! difference by adding the modulus back instead of relying on the sign
//! convention of `%`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors when constructing a [`PrimeField`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The modulus is not a prime number.
    #[error("modulus {0} is not prime")]
    NotPrime(u64),
    /// The modulus does not fit the supported range.
    #[error("modulus {0} is out of range, expected a prime below 2^31")]
    OutOfRange(u64),
}

/// A prime field with a runtime modulus.
///
/// This is a small context object; field elements themselves are plain
/// `u64` values already reduced into `[0, P)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeField {
    modulus: u64,
}

impl PrimeField {
    /// Moduli must stay below this bound so sums of two elements and the
    /// signed wire representation never overflow.
    pub const MAX_MODULUS: u64 = 1 << 31;

    /// Constructs the field, validating that `modulus` is a prime in range.
    pub fn new(modulus: u64) -> Result<Self, FieldError> {
        if modulus >= Self::MAX_MODULUS {
            return Err(FieldError::OutOfRange(modulus));
        }
        if !is_prime(modulus) {
            return Err(FieldError::NotPrime(modulus));
        }
        Ok(Self { modulus })
    }

    /// The prime modulus of this field.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduces an arbitrary signed integer into `[0, P)`.
    pub fn reduce(&self, value: i64) -> u64 {
        value.rem_euclid(self.modulus as i64) as u64
    }

    /// Computes `(a + b) mod P`.
    pub fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.modulus && b < self.modulus);
        (a + b) % self.modulus
    }

    /// Computes `(a - b) mod P`, mapping a negative raw difference back
    /// into the field.
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.modulus && b < self.modulus);
        if a >= b {
            a - b
        } else {
            a + self.modulus - b
        }
    }

    /// Computes `(a * b) mod P`.
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.modulus && b < self.modulus);
        ((a as u128 * b as u128) % self.modulus as u128) as u64
    }

    /// Draws a uniform element of `[0, P)`.
    pub fn random_element<R: Rng>(&self, rng: &mut R) -> u64 {
        rng.gen_range(0..self.modulus)
    }
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn f23() -> PrimeField {
        PrimeField::new(23).unwrap()
    }

    #[test]
    fn rejects_non_prime_moduli() {
        assert_eq!(PrimeField::new(0), Err(FieldError::NotPrime(0)));
        assert_eq!(PrimeField::new(1), Err(FieldError::NotPrime(1)));
        assert_eq!(PrimeField::new(21), Err(FieldError::NotPrime(21)));
        assert!(PrimeField::new(2).is_ok());
        assert!(PrimeField::new(2147483647).is_ok());
        assert_eq!(
            PrimeField::new(1 << 31),
            Err(FieldError::OutOfRange(1 << 31))
        );
    }

    #[test]
    fn sub_wraps_into_field() {
        let field = f23();
        assert_eq!(field.sub(2, 5), 20);
        assert_eq!(field.sub(5, 2), 3);
        assert_eq!(field.sub(0, 22), 1);
    }

    #[test]
    fn reduce_handles_negative_values() {
        let field = f23();
        assert_eq!(field.reduce(-3), 20);
        assert_eq!(field.reduce(-23), 0);
        assert_eq!(field.reduce(400), 9);
        assert_eq!(field.reduce(22), 22);
    }

    #[test]
    fn add_and_mul_are_commutative_and_associative() {
        let field = PrimeField::new(1000003).unwrap();
        let mut rng = thread_rng();
        for _ in 0..100 {
            let a = field.random_element(&mut rng);
            let b = field.random_element(&mut rng);
            let c = field.random_element(&mut rng);
            assert_eq!(field.add(a, b), field.add(b, a));
            assert_eq!(field.mul(a, b), field.mul(b, a));
            assert_eq!(
                field.add(field.add(a, b), c),
                field.add(a, field.add(b, c))
            );
            assert_eq!(
                field.mul(field.mul(a, b), c),
                field.mul(a, field.mul(b, c))
            );
        }
    }

    #[test]
    fn mul_does_not_overflow_near_the_modulus_bound() {
        let field = PrimeField::new(2147483647).unwrap();
        let a = 2147483646;
        assert_eq!(field.mul(a, a), 1);
    }
}
