//! In-flight guard for the save flow.
//!
//! Only one save may be pending at a time; each attempt carries a token so a
//! stale ack timeout cannot fail a save that already resolved.

#[derive(Debug, Default)]
pub struct SaveFlow {
    pending: Option<u64>,
    next_token: u64,
}

impl SaveFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a save attempt. Returns `None` if one is already pending.
    pub fn begin(&mut self) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(token);
        Some(token)
    }

    /// Resolve the pending save. Returns false if nothing was pending.
    pub fn acknowledge(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Expire the save started with `token`. Returns false if it already
    /// resolved or was replaced by a newer attempt.
    pub fn expire(&mut self, token: u64) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_save_is_rejected_while_pending() {
        let mut flow = SaveFlow::new();
        let token = flow.begin().unwrap();
        assert!(flow.is_busy());
        assert!(flow.begin().is_none());
        assert!(flow.expire(token));
        assert!(!flow.is_busy());
    }

    #[test]
    fn acknowledge_resolves_the_pending_save() {
        let mut flow = SaveFlow::new();
        flow.begin().unwrap();
        assert!(flow.acknowledge());
        assert!(!flow.acknowledge());
    }

    #[test]
    fn stale_timeout_cannot_fail_a_newer_save() {
        let mut flow = SaveFlow::new();
        let first = flow.begin().unwrap();
        assert!(flow.acknowledge());
        let second = flow.begin().unwrap();
        assert_ne!(first, second);
        assert!(!flow.expire(first));
        assert!(flow.is_busy());
        assert!(flow.expire(second));
    }
}
