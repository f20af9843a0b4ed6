/// Runtime limits for a [`MessageDecoder`](crate::MessageDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest message delivered, in bytes. Longer frames are dropped.
    ///
    /// Values above the decoder's `MTU` storage are clamped to it.
    /// Default: no limit beyond `MTU`.
    pub max_message_size: usize,
}

impl DecoderConfig {
    /// Ceiling actually enforced by a decoder with `mtu` bytes of storage.
    pub fn effective_max(&self, mtu: usize) -> usize {
        self.max_message_size.min(mtu)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_message_size: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_defers_to_mtu() {
        assert_eq!(DecoderConfig::default().effective_max(128), 128);
    }

    #[test]
    fn smaller_limit_wins() {
        let config = DecoderConfig {
            max_message_size: 16,
        };
        assert_eq!(config.effective_max(128), 16);
        assert_eq!(config.effective_max(8), 8);
    }
}
