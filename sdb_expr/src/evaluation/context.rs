//! Machine state the evaluator reads through

/// A RISC-V 32 machine word
pub type Word = u32;

/// General-purpose register names in index order, without the `$` sigil.
/// Index 0 is spelled `$0`, so its expression form is `$$0`.
pub const REGISTER_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Index of a register by name. A leading `$` is accepted, so both `sp`
/// and `$sp` resolve; `$0` is only ever the zero register.
pub fn register_index(name: &str) -> Option<usize> {
    let lookup = |candidate: &str| REGISTER_NAMES.iter().position(|r| *r == candidate);

    lookup(name).or_else(|| name.strip_prefix('$').and_then(lookup))
}

/// Register and memory access used during evaluation
pub trait EvalContext {
    /// Value of the named register (sigil already stripped), if it exists
    fn lookup_register(&self, name: &str) -> Option<Word>;

    /// Read `width_bytes` bytes at `address`, little-endian
    fn read_memory(&self, address: Word, width_bytes: usize) -> Word;
}

impl<C: EvalContext + ?Sized> EvalContext for &C {
    fn lookup_register(&self, name: &str) -> Option<Word> {
        (**self).lookup_register(name)
    }

    fn read_memory(&self, address: Word, width_bytes: usize) -> Word {
        (**self).read_memory(address, width_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_index() {
        assert_eq!(register_index("$0"), Some(0));
        assert_eq!(register_index("sp"), Some(2));
        assert_eq!(register_index("$sp"), Some(2));
        assert_eq!(register_index("s10"), Some(26));
        assert_eq!(register_index("t6"), Some(31));
        assert_eq!(register_index("pc"), None);
        assert_eq!(register_index("0"), None);
    }

    #[test]
    fn test_register_names_are_unique() {
        for (i, name) in REGISTER_NAMES.iter().enumerate() {
            assert_eq!(register_index(name), Some(i));
        }
    }
}
