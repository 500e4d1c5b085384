/// How many times a looping effect runs. `Forever` loops are ended by the
/// caller (an interrupt), never from inside the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

impl Repeat {
    /// Command-line convention: any negative count means forever.
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            Repeat::Forever
        } else {
            Repeat::Times(count.min(u32::MAX as i64) as u32)
        }
    }

    /// Whether pass number `done` (zero-based) should still run.
    pub fn allows(&self, done: u32) -> bool {
        match self {
            Repeat::Times(n) => done < *n,
            Repeat::Forever => true,
        }
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_count_is_forever() {
        assert_eq!(Repeat::from_count(-1), Repeat::Forever);
        assert_eq!(Repeat::from_count(3), Repeat::Times(3));
        assert!(Repeat::Forever.allows(u32::MAX));
        assert!(Repeat::Times(2).allows(1));
        assert!(!Repeat::Times(2).allows(2));
        assert!(!Repeat::Times(0).allows(0));
    }
}
