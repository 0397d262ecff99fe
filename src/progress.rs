/// Level-unlock progress, persisted as `{"unlocked_levels": [0, 1, ...]}`.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::level::MAX_LEVEL_ID;

#[derive(Serialize, Deserialize)]
struct ProgressFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unlocked_levels: Option<BTreeSet<i32>>,
}

/// Which levels the player may start. Level 0 is unlocked from the start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    unlocked: BTreeSet<i32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self { unlocked: BTreeSet::from([0]) }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock `level_id`. Fails for ids outside `0..=MAX_LEVEL_ID`.
    pub fn unlock_level(&mut self, level_id: i32) -> bool {
        if !(0..=MAX_LEVEL_ID).contains(&level_id) {
            return false;
        }
        self.unlocked.insert(level_id);
        true
    }

    pub fn is_level_unlocked(&self, level_id: i32) -> bool {
        self.unlocked.contains(&level_id)
    }

    /// Highest unlocked level, or `None` if a loaded file unlocked nothing.
    pub fn max_unlocked_level(&self) -> Option<i32> {
        self.unlocked.last().copied()
    }

    pub fn max_level(&self) -> i32 {
        MAX_LEVEL_ID
    }

    pub fn unlocked_levels(&self) -> impl Iterator<Item = i32> + '_ {
        self.unlocked.iter().copied()
    }

    /// Load from `path`. A missing file, or one without `unlocked_levels`,
    /// yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ProgressError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no progress file, starting fresh");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ProgressError::Read { path: path.to_path_buf(), source });
            }
        };
        let file: ProgressFile = serde_json::from_str(&text)
            .map_err(|source| ProgressError::Parse { path: path.to_path_buf(), source })?;
        Ok(match file.unlocked_levels {
            Some(unlocked) => Self { unlocked },
            None => Self::default(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgressError> {
        let file = ProgressFile { unlocked_levels: Some(self.unlocked.clone()) };
        let text = serde_json::to_string_pretty(&file)
            .map_err(|source| ProgressError::Parse { path: path.to_path_buf(), source })?;
        std::fs::write(path, text)
            .map_err(|source| ProgressError::Write { path: path.to_path_buf(), source })
    }
}
