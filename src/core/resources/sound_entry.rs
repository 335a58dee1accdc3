//=========================================================================
// Sound Entry
//=========================================================================
//
// One row of the tab-separated sound descriptor table.
//
// Column order:
//   Sound  Index  FileName  Volume  GroupSize  Loop  FadeIn  FadeOut
//   DeferInst  StopInst  Duration  Compound  Reverb  Falloff  Cache
//   AsyncOnly  Priority  Stream  Stereo  Tracking  Solo  MusicVol
//   Block1  Block2  Block3
//
// Handle, index and file name are required. Numeric columns that are
// missing or empty default to 0; flag columns default to false.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::error::{EngineError, Result};

//=== SoundEntry ==========================================================

/// Descriptor for one playable sound, keyed by its handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoundEntry {
    pub handle: String,
    pub index: i32,
    pub file_name: String,
    pub volume: i32,
    pub group_size: i32,
    pub looping: bool,
    pub fade_in: i32,
    pub fade_out: i32,
    pub defer_inst: bool,
    pub stop_inst: bool,
    pub duration: i32,
    pub compound: i32,
    pub reverb: bool,
    pub falloff: i32,
    pub cache: bool,
    pub async_only: bool,
    pub priority: i32,
    pub stream: bool,
    pub stereo: bool,
    pub tracking: bool,
    pub solo: bool,
    pub music_vol: bool,
    pub block1: i32,
    pub block2: i32,
    pub block3: i32,
}

impl SoundEntry {
    /// Parses a descriptor row. `line` is the 1-based line number used in
    /// error reports.
    pub fn from_row(row: &str, line: usize) -> Result<Self> {
        let columns = Columns {
            fields: row.split('\t').collect(),
            line,
        };

        let handle = columns.required(0, "Sound")?.to_owned();
        let index = columns.number(1, "Index")?;
        let file_name = columns.required(2, "FileName")?.to_owned();

        Ok(Self {
            handle,
            index,
            file_name,
            volume: columns.number(3, "Volume")?,
            group_size: columns.number(4, "Group Size")?,
            looping: columns.flag(5, "Loop")?,
            fade_in: columns.number(6, "Fade In")?,
            fade_out: columns.number(7, "Fade Out")?,
            defer_inst: columns.flag(8, "Defer Inst")?,
            stop_inst: columns.flag(9, "Stop Inst")?,
            duration: columns.number(10, "Duration")?,
            compound: columns.number(11, "Compound")?,
            reverb: columns.flag(12, "Reverb")?,
            falloff: columns.number(13, "Falloff")?,
            cache: columns.flag(14, "Cache")?,
            async_only: columns.flag(15, "Async Only")?,
            priority: columns.number(16, "Priority")?,
            stream: columns.flag(17, "Stream")?,
            stereo: columns.flag(18, "Stereo")?,
            tracking: columns.flag(19, "Tracking")?,
            solo: columns.flag(20, "Solo")?,
            music_vol: columns.flag(21, "Music Vol")?,
            block1: columns.number(22, "Block 1")?,
            block2: columns.number(23, "Block 2")?,
            block3: columns.number(24, "Block 3")?,
        })
    }
}

//=== Columns =============================================================

struct Columns<'a> {
    fields: Vec<&'a str>,
    line: usize,
}

impl<'a> Columns<'a> {
    fn get(&self, idx: usize) -> &'a str {
        self.fields.get(idx).copied().map_or("", str::trim)
    }

    fn required(&self, idx: usize, name: &str) -> Result<&'a str> {
        match self.get(idx) {
            "" => Err(self.malformed(format!("missing {} column", name))),
            value => Ok(value),
        }
    }

    fn number(&self, idx: usize, name: &str) -> Result<i32> {
        match self.get(idx) {
            "" => Ok(0),
            value => value
                .parse()
                .map_err(|_| self.malformed(format!("{} is not a number: {:?}", name, value))),
        }
    }

    fn flag(&self, idx: usize, name: &str) -> Result<bool> {
        Ok(self.number(idx, name)? != 0)
    }

    fn malformed(&self, reason: String) -> EngineError {
        EngineError::MalformedSoundRow {
            line: self.line,
            reason,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_row() {
        let row = "cursor_pass\t3\tcursor\\button.wav\t128\t0\t1\t0\t0\t0\t0\t0\t0\t1\t2\t1\t0\t80\t0\t1\t0\t0\t0\t-1\t-1\t-1";
        let entry = SoundEntry::from_row(row, 2).unwrap();

        assert_eq!(entry.handle, "cursor_pass");
        assert_eq!(entry.index, 3);
        assert_eq!(entry.file_name, "cursor\\button.wav");
        assert_eq!(entry.volume, 128);
        assert!(entry.looping);
        assert!(entry.reverb);
        assert_eq!(entry.falloff, 2);
        assert!(entry.cache);
        assert_eq!(entry.priority, 80);
        assert!(entry.stereo);
        assert_eq!(entry.block1, -1);
        assert_eq!(entry.block3, -1);
    }

    #[test]
    fn missing_trailing_columns_default() {
        let entry = SoundEntry::from_row("ambient\t12\tambient\\wind.wav", 5).unwrap();
        assert_eq!(entry.volume, 0);
        assert!(!entry.looping);
        assert_eq!(entry.block3, 0);
    }

    #[test]
    fn missing_file_name_is_malformed() {
        let err = SoundEntry::from_row("ambient\t12", 9).unwrap_err();
        assert_eq!(
            err,
            EngineError::MalformedSoundRow {
                line: 9,
                reason: "missing FileName column".into()
            }
        );
    }

    #[test]
    fn non_numeric_index_is_malformed() {
        let err = SoundEntry::from_row("ambient\tx\tfile.wav", 4).unwrap_err();
        assert!(matches!(err, EngineError::MalformedSoundRow { line: 4, .. }));
    }
}
