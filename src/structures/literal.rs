/*!
Literals, atoms paired with a (boolean) polarity.

The representation packs the atom and the polarity into a single integer: a literal over atom *a* is encoded as *2a + s*, where *s* is 0 for the positive literal and 1 for the negative literal.
Negation, then, flips the low bit, and the encoding doubles as an index for per-literal structures such as [watch lists](crate::db::watch).

An example:

```rust
# use orbit_sat::structures::literal::Lit;
let literal = Lit::new(79, true);

assert!(literal.polarity());
assert_eq!(literal.atom(), 79);
assert_eq!((!literal).polarity(), false);
assert_eq!(!!literal, literal);
```

In DIMACS texts a literal is an integer whose sign indicates the polarity, with atoms offset by one.
Conversions are provided both ways.
*/

use crate::structures::atom::Atom;

/// A literal, packed as `2·atom + sign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Lit(u32);

impl Lit {
    /// A fresh literal, specified by pairing an atom with a polarity (`true` for the positive literal).
    pub fn new(atom: Atom, polarity: bool) -> Self {
        Lit((atom << 1) | (!polarity as u32))
    }

    /// The positive literal over `atom`.
    pub fn positive(atom: Atom) -> Self {
        Lit::new(atom, true)
    }

    /// The negative literal over `atom`.
    pub fn negative(atom: Atom) -> Self {
        Lit::new(atom, false)
    }

    /// The atom of the literal.
    pub fn atom(self) -> Atom {
        self.0 >> 1
    }

    /// The polarity of the literal, `true` if positive.
    pub fn polarity(self) -> bool {
        self.0 & 1 == 0
    }

    /// The packed encoding, suitable as an index for per-literal structures.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The literal over the same atom with the given polarity.
    pub fn with_polarity(self, polarity: bool) -> Self {
        Lit::new(self.atom(), polarity)
    }

    /// The literal from a (non-zero) DIMACS integer, with atoms offset by one.
    pub fn from_dimacs(int: i32) -> Self {
        debug_assert!(int != 0);
        Lit::new(int.unsigned_abs() - 1, int > 0)
    }

    /// The literal as a DIMACS integer, with atoms offset by one.
    pub fn as_dimacs(self) -> i32 {
        let base = (self.atom() + 1) as i32;
        if self.polarity() {
            base
        } else {
            -base
        }
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

impl std::fmt::Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_dimacs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding() {
        let p = Lit::positive(3);
        let not_p = Lit::negative(3);

        assert_eq!(p.index(), 6);
        assert_eq!(not_p.index(), 7);
        assert_eq!(!p, not_p);
        assert_eq!(p.atom(), not_p.atom());
        assert!(p < not_p);
    }

    #[test]
    fn dimacs() {
        assert_eq!(Lit::from_dimacs(1), Lit::positive(0));
        assert_eq!(Lit::from_dimacs(-4), Lit::negative(3));
        assert_eq!(Lit::from_dimacs(-4).as_dimacs(), -4);
        assert_eq!(Lit::negative(0).to_string(), "-1");
    }
}
