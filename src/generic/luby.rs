/*!
The Luby restart sequence.

See <https://oeis.org/A182105> for details on the integer sequence.

Restart intervals follow finite subsequences of the sequence:

```text
0: 1
1: 1 1 2
2: 1 1 2 1 1 2 4
3: 1 1 2 1 1 2 4 1 1 2 1 1 2 4 8
…
```

[luby] generalises the sequence to an arbitrary base: the `x`-th element is `y` raised to the height of `x` within the subsequence containing `x`.
With base 2 this is exactly A182105, and the product with a base restart interval gives the conflict budget of the `x`-th restart.
*/

/// The `x`-th element of the Luby sequence with base `y`.
pub fn luby(y: f64, x: u32) -> f64 {
    // Find the finite subsequence containing index `x`, and the size of that subsequence.
    let mut size: u64 = 1;
    let mut seq: i32 = 0;
    let mut x = x as u64;

    while size < x + 1 {
        seq += 1;
        size = 2 * size + 1;
    }

    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }

    y.powi(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://oeis.org/A182105
    const LUBY_SLICE: &[u32] = &[
        1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8,
        16, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4,
        8, 16, 32, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1,
        1, 2, 4, 8, 16,
    ];

    #[test]
    fn base_two_matches_the_integer_sequence() {
        for (x, known_value) in LUBY_SLICE.iter().enumerate() {
            assert_eq!(luby(2.0, x as u32), *known_value as f64);
        }
    }

    #[test]
    fn other_bases() {
        assert_eq!(luby(3.0, 2), 3.0);
        assert_eq!(luby(3.0, 6), 9.0);
        assert_eq!(luby(1.5, 0), 1.0);
    }
}
