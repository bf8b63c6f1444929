use rand::Rng;

/// Simulated wallet address for a connecting player. Cosmetic only; there
/// is no key material behind it.
pub fn mock_wallet_address() -> String {
    let mut rng = rand::thread_rng();
    let head: String = (0..8)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    let tail: String = (0..4)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!("0x{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_wallet_address_shape() {
        let address = mock_wallet_address();

        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 17);
        assert!(address.contains("..."));
    }

    #[test]
    fn test_mock_wallet_addresses_vary() {
        let a = mock_wallet_address();
        let b = mock_wallet_address();

        // 48 bits of randomness; a collision here means the generator broke.
        assert_ne!(a, b);
    }
}
