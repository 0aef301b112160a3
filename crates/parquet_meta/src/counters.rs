use std::sync::atomic::{AtomicU64, Ordering};

/// Diagnostic byte counters for metadata reads.
///
/// Passed by reference through read options. Nothing here is global, callers
/// decide how widely a set of counters is shared.
#[derive(Debug, Default)]
pub struct MetadataCounters {
    decrypted_bytes: AtomicU64,
    footer_bytes: AtomicU64,
}

impl MetadataCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of metadata that went through a decryptor.
    pub fn decrypted_bytes(&self) -> u64 {
        self.decrypted_bytes.load(Ordering::Relaxed)
    }

    /// Bytes of footer read from sources, postscript included.
    pub fn footer_bytes(&self) -> u64 {
        self.footer_bytes.load(Ordering::Relaxed)
    }

    pub(crate) fn add_decrypted_bytes(&self, n: usize) {
        self.decrypted_bytes.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_footer_bytes(&self, n: usize) {
        self.footer_bytes.fetch_add(n as u64, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates() {
        let counters = MetadataCounters::new();
        counters.add_decrypted_bytes(10);
        counters.add_decrypted_bytes(5);
        counters.add_footer_bytes(100);

        assert_eq!(15, counters.decrypted_bytes());
        assert_eq!(100, counters.footer_bytes());
    }
}
