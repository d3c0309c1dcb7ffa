//! Shared monotonic counters.
//!
//! One compilation unit has one type-variable sequence and one generated
//! local-name sequence, both owned by the scope arena and threaded
//! explicitly through the stages that need them. Neither is ever reset
//! mid-compilation; later phases rely on variable identity to decide
//! which variables alias.

/// Fresh-id sources for type variables and generated local names.
#[derive(Default, Debug)]
pub struct Counters {
    next_type: u32,
    next_local: u32,
}

impl Counters {
    pub fn new() -> Self {
        Counters::default()
    }

    /// Reserve the next type variable id.
    pub fn reserve_type(&mut self) -> u32 {
        let id = self.next_type;
        self.next_type += 1;
        id
    }

    /// Reserve the next generated-local ordinal; callers render it as a
    /// name like `$2` that no user identifier can collide with.
    pub fn reserve_local(&mut self) -> u32 {
        let id = self.next_local;
        self.next_local += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::Counters;

    #[test]
    fn sequences_are_independent_and_monotonic() {
        let mut counters = Counters::new();
        assert_eq!(counters.reserve_type(), 0);
        assert_eq!(counters.reserve_type(), 1);
        assert_eq!(counters.reserve_local(), 0);
        assert_eq!(counters.reserve_type(), 2);
        assert_eq!(counters.reserve_local(), 1);
    }
}
