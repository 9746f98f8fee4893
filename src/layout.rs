//! File naming and directory layout
use crate::{calendar::Day, constellation::System};

use std::path::{Path, PathBuf};

/// Raw differences directory, relative to the root
const DIFF_DIR: &str = "diff";

/// Daily summaries directory, relative to the root
const DAILY_DIR: &str = "ave";

/// [Layout] resolves the location of every input and output file,
/// one per (day, constellation).
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Builds a [Layout] rooted at this directory, where comparison files are stored.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Comparison file: `cmpDDD0_YY_SYS.txt`
    pub fn comparison_file(&self, day: &Day, system: System) -> PathBuf {
        self.root.join(format!(
            "cmp{:03}0_{:02}_{}.txt",
            day.doy,
            day.short_year(),
            system
        ))
    }

    /// Directory of raw difference files
    pub fn diff_dir(&self) -> PathBuf {
        self.root.join(DIFF_DIR)
    }

    /// Raw difference file: `diff/diffcorrYYYY_DDD_SYS`
    pub fn diff_file(&self, day: &Day, system: System) -> PathBuf {
        self.diff_dir()
            .join(format!("diffcorr{}_{:03}_{}", day.year, day.doy, system))
    }

    /// Directory of daily summaries
    pub fn daily_dir(&self) -> PathBuf {
        self.root.join(DAILY_DIR)
    }

    /// Daily summary file: `ave/avediffcorrYYYY_DDD_SYS`
    pub fn daily_file(&self, day: &Day, system: System) -> PathBuf {
        self.daily_dir()
            .join(format!("avediffcorr{}_{:03}_{}", day.year, day.doy, system))
    }

    /// Multi-day summary file: `aveSYS`
    pub fn final_file(&self, system: System) -> PathBuf {
        self.root.join(format!("ave{}", system))
    }
}
