/// Syntactic check for a Solana address: 43 or 44 characters, all from the
/// base-58 alphabet (no `0`, `O`, `I`, `l`). Does not verify the address
/// exists on-chain.
pub fn is_valid_solana_address(address: &str) -> bool {
    if address.len() != 43 && address.len() != 44 {
        return false;
    }

    address.bytes().all(|b| {
        matches!(b,
            b'1'..=b'9'
            | b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'Z'
            | b'a'..=b'k' | b'm'..=b'z'
        )
    })
}
