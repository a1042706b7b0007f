//! Sound categories and the named pools behind them

use serde::{Deserialize, Serialize};
use skyburst_core::{Result, SkyRng};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File extensions picked up by a directory scan
pub const SOUND_EXTENSIONS: [&str; 4] = ["ogg", "wav", "mp3", "flac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCategory {
    Lift,
    Burst,
    BurstSmall,
    Crackle,
    CrackleSmall,
}

impl SoundCategory {
    pub const ALL: [SoundCategory; 5] = [
        SoundCategory::Lift,
        SoundCategory::Burst,
        SoundCategory::BurstSmall,
        SoundCategory::Crackle,
        SoundCategory::CrackleSmall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SoundCategory::Lift => "lift",
            SoundCategory::Burst => "burst",
            SoundCategory::BurstSmall => "burst_small",
            SoundCategory::Crackle => "crackle",
            SoundCategory::CrackleSmall => "crackle_small",
        }
    }

    /// Category for a file stem such as `burst_small2`.
    ///
    /// Longer prefixes win so `burst_small*` never lands in `burst`.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        let stem = stem.to_ascii_lowercase();
        [
            SoundCategory::BurstSmall,
            SoundCategory::CrackleSmall,
            SoundCategory::Burst,
            SoundCategory::Crackle,
            SoundCategory::Lift,
        ]
        .into_iter()
        .find(|c| stem.starts_with(c.name()))
    }
}

/// A sound file found on disk, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundFile {
    pub category: SoundCategory,
    /// Cache key, the file stem
    pub name: String,
    pub path: PathBuf,
}

/// List the category sound files in `dir`, sorted by name
pub fn scan_dir(dir: &Path) -> Result<Vec<SoundFile>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SOUND_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !ext_ok {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match SoundCategory::from_file_stem(stem) {
            Some(category) => files.push(SoundFile {
                category,
                name: stem.to_string(),
                path,
            }),
            None => tracing::debug!(file = %path.display(), "ignoring sound with no category"),
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Names of loaded sounds, grouped by category
#[derive(Debug, Default, Clone)]
pub struct SoundBank {
    pools: HashMap<SoundCategory, Vec<String>>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: SoundCategory, name: impl Into<String>) {
        let name = name.into();
        let pool = self.pools.entry(category).or_default();
        if !pool.contains(&name) {
            pool.push(name);
        }
    }

    /// A random sound from the category, if any are loaded
    pub fn pick(&self, category: SoundCategory, rng: &mut SkyRng) -> Option<&str> {
        let pool = self.pools.get(&category)?;
        rng.pick(pool).map(String::as_str)
    }

    pub fn names(&self, category: SoundCategory) -> &[String] {
        self.pools.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_map_to_longest_prefix() {
        assert_eq!(SoundCategory::from_file_stem("lift1"), Some(SoundCategory::Lift));
        assert_eq!(SoundCategory::from_file_stem("burst"), Some(SoundCategory::Burst));
        assert_eq!(
            SoundCategory::from_file_stem("burst_small3"),
            Some(SoundCategory::BurstSmall)
        );
        assert_eq!(
            SoundCategory::from_file_stem("Crackle_Small"),
            Some(SoundCategory::CrackleSmall)
        );
        assert_eq!(SoundCategory::from_file_stem("whistle"), None);
    }

    #[test]
    fn bank_picks_within_category() {
        let mut bank = SoundBank::new();
        bank.add(SoundCategory::Burst, "burst1");
        bank.add(SoundCategory::Burst, "burst2");
        bank.add(SoundCategory::Burst, "burst2");
        bank.add(SoundCategory::Lift, "lift1");
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.names(SoundCategory::Burst).len(), 2);

        let mut rng = SkyRng::new(9);
        for _ in 0..20 {
            let name = bank.pick(SoundCategory::Burst, &mut rng).unwrap();
            assert!(name.starts_with("burst"));
        }
        assert!(bank.pick(SoundCategory::Crackle, &mut rng).is_none());
        assert!(bank.names(SoundCategory::Crackle).is_empty());
    }

    #[test]
    fn scan_filters_by_extension_and_category() {
        let dir = std::env::temp_dir().join(format!("skyburst-scan-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["lift1.ogg", "burst_small1.WAV", "crackle2.mp3", "notes.txt", "wind.ogg"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let files = scan_dir(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let found: Vec<_> = files.iter().map(|f| (f.category, f.name.as_str())).collect();
        assert_eq!(
            found,
            vec![
                (SoundCategory::BurstSmall, "burst_small1"),
                (SoundCategory::Crackle, "crackle2"),
                (SoundCategory::Lift, "lift1"),
            ]
        );
    }

    #[test]
    fn missing_dir_is_io_error() {
        let err = scan_dir(Path::new("/nonexistent/skyburst-sounds")).unwrap_err();
        assert!(matches!(err, skyburst_core::SkyburstError::IoError(_)));
    }
}
