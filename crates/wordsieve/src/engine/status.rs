//! Lifecycle status and its atomic cell

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Lifecycle status of an [`Engine`](super::Engine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// No dictionary loaded yet
    Init = 0,
    /// Serving, and the only status a rebuild may start from
    Ready = 1,
    /// Editing the live trie in batches
    PartialRebuild = 2,
    /// Building a replacement trie off to the side
    FullRebuild = 3,
}

impl Status {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Status::Init,
            1 => Status::Ready,
            2 => Status::PartialRebuild,
            _ => Status::FullRebuild,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Init => "init",
            Status::Ready => "ready",
            Status::PartialRebuild => "partial-rebuild",
            Status::FullRebuild => "full-rebuild",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub(crate) struct AtomicStatus(AtomicU8);

impl AtomicStatus {
    pub(crate) fn new(status: Status) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    pub(crate) fn load(&self) -> Status {
        Status::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, status: Status) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Move from `from` to `to` only if the current status is exactly `from`
    pub(crate) fn transition(&self, from: Status, to: Status) -> EngineResult<()> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| EngineError::StatusMismatch {
                expected: from,
                actual: Status::from_u8(actual),
            })
    }
}

/// Puts the status back to `Ready` when a rebuild ends, including by unwinding
pub(crate) struct ReadyOnDrop<'a>(pub(crate) &'a AtomicStatus);

impl Drop for ReadyOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(Status::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition() {
        let status = AtomicStatus::new(Status::Ready);
        assert!(status.transition(Status::Ready, Status::FullRebuild).is_ok());
        assert_eq!(status.load(), Status::FullRebuild);

        let err = status
            .transition(Status::Ready, Status::PartialRebuild)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::StatusMismatch {
                expected: Status::Ready,
                actual: Status::FullRebuild,
            }
        );
        assert_eq!(status.load(), Status::FullRebuild);
    }

    #[test]
    fn test_ready_on_drop() {
        let status = AtomicStatus::new(Status::Ready);
        status
            .transition(Status::Ready, Status::PartialRebuild)
            .unwrap();
        {
            let _guard = ReadyOnDrop(&status);
            assert_eq!(status.load(), Status::PartialRebuild);
        }
        assert_eq!(status.load(), Status::Ready);
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::PartialRebuild.to_string(), "partial-rebuild");
        assert_eq!(
            EngineError::StatusMismatch {
                expected: Status::Ready,
                actual: Status::Init,
            }
            .to_string(),
            "status mismatch: expected ready, found init"
        );
    }
}
