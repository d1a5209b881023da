use rand::Rng;

/// Génère un code numérique à 6 chiffres, tirage uniforme sur [100000, 999999]
/// Utilisé pour la vérification email et le reset password
pub fn six_digit_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..100 {
            let code = six_digit_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }
}
