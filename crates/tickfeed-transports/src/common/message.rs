// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common message types for transports

/// Multipart message (for ZMQ and similar transports)
///
/// Frames arrive together or not at all; frame order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartMessage {
    /// Message parts
    pub parts: Vec<Vec<u8>>,
}

impl MultipartMessage {
    /// Create a new multipart message
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Add a part
    pub fn add_part(mut self, part: impl Into<Vec<u8>>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Get number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Get total size in bytes
    pub fn total_size(&self) -> usize {
        self.parts.iter().map(|p| p.len()).sum()
    }

    /// Borrow the frames in order
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.parts
    }
}

impl From<Vec<Vec<u8>>> for MultipartMessage {
    fn from(parts: Vec<Vec<u8>>) -> Self {
        Self { parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let msg = MultipartMessage::new()
            .add_part("topic")
            .add_part(b"ISR".to_vec())
            .add_part(r#"{"a":1}"#);

        assert_eq!(msg.len(), 3);
        assert_eq!(msg.frames()[0], b"topic");
        assert_eq!(msg.frames()[1], b"ISR");
        assert_eq!(msg.total_size(), 5 + 3 + 7);
    }
}
