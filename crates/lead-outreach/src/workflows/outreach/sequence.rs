/// Monotonic id source owned by a single store.
///
/// Callers keep the allocator inside the same mutex as the collection it numbers, so
/// allocation and append happen in one critical section and ids are never handed out twice.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;

    #[test]
    fn starts_at_one_and_never_repeats() {
        let mut ids = IdAllocator::new();
        let issued: Vec<u64> = (0..4).map(|_| ids.allocate()).collect();
        assert_eq!(issued, vec![1, 2, 3, 4]);

        let mut copy = ids.clone();
        assert_eq!(copy.allocate(), 5);
        assert_eq!(ids.allocate(), 5);
    }
}
