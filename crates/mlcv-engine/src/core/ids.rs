use crate::api::types::EmitterId;

/// Source of emitter identifiers, distinct for the life of a session.
pub trait IdSource {
    fn next_id(&mut self) -> EmitterId;
}

/// Base-36 counter behind a per-session prefix.
#[derive(Debug, Clone)]
pub struct UniqueIds {
    prefix: String,
    counter: u64,
}

impl UniqueIds {
    /// Ids from different sessions differ as long as their seeds do.
    pub fn new(session_seed: u64) -> Self {
        Self {
            prefix: to_base36(session_seed & 0xFFFF_FFFF),
            counter: 0,
        }
    }
}

impl Default for UniqueIds {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdSource for UniqueIds {
    fn next_id(&mut self) -> EmitterId {
        self.counter += 1;
        EmitterId(format!("{}-{}", self.prefix, to_base36(self.counter)))
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_distinct() {
        let mut ids = UniqueIds::new(1234);
        let set: HashSet<EmitterId> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn prefix_comes_from_seed() {
        assert_eq!(UniqueIds::new(36).next_id().as_str(), "10-1");
    }
}
