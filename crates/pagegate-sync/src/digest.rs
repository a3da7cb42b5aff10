//! Content digest of a comment sequence.
//!
//! Two sequences with the same comments in the same order share a digest.
//! Any change to ids, content, authorship, timestamps, or order changes it.

use std::fmt;

use pagegate_core::Comment;

const DOMAIN: &[u8] = b"pagegate-comments-v1:";

/// BLAKE3 digest of a comment sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceDigest([u8; 32]);

impl SequenceDigest {
    /// Digest `comments` in order.
    pub fn of(comments: &[Comment]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN);
        hasher.update(&(comments.len() as u64).to_le_bytes());

        for comment in comments {
            update_field(&mut hasher, comment.id.as_str());
            update_field(&mut hasher, &comment.content);
            update_field(&mut hasher, comment.author.as_str());
            update_field(&mut hasher, &comment.created_at.to_rfc3339());
            match (&comment.modified_at, &comment.modified_by) {
                (Some(at), by) => {
                    hasher.update(&[1]);
                    update_field(&mut hasher, &at.to_rfc3339());
                    update_field(&mut hasher, by.as_ref().map(|p| p.as_str()).unwrap_or(""));
                }
                (None, _) => {
                    hasher.update(&[0]);
                }
            }
        }

        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Length-prefixed so adjacent fields cannot run together.
fn update_field(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

impl fmt::Debug for SequenceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequenceDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for SequenceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(id: &str, content: &str) -> Comment {
        Comment::new(id, content, "alice", Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    #[test]
    fn test_identical_sequences_share_digest() {
        let a = vec![comment("c2", "two"), comment("c1", "one")];
        let b = a.clone();
        assert_eq!(SequenceDigest::of(&a), SequenceDigest::of(&b));
    }

    #[test]
    fn test_order_and_content_matter() {
        let a = vec![comment("c2", "two"), comment("c1", "one")];
        let reversed: Vec<_> = a.iter().rev().cloned().collect();
        assert_ne!(SequenceDigest::of(&a), SequenceDigest::of(&reversed));

        let mut edited = a.clone();
        edited[0].apply_edit("two!", "bob".into(), Utc::now());
        assert_ne!(SequenceDigest::of(&a), SequenceDigest::of(&edited));
    }

    #[test]
    fn test_field_boundaries() {
        let a = vec![comment("c1", "ab")];
        let b = vec![comment("c1a", "b")];
        assert_ne!(SequenceDigest::of(&a), SequenceDigest::of(&b));
    }

    #[test]
    fn test_hex_display() {
        let digest = SequenceDigest::of(&[]);
        assert_eq!(digest.to_string().len(), 64);
    }
}
