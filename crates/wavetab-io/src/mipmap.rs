//! Per-note table series.
//!
//! A mipmap holds one band-limited [`WaveTable`] per MIDI note for each wave
//! type, so a player can pick the table whose partials stay below Nyquist at
//! the note it is playing. Tables are stored wave by wave in
//! [`WaveType::ALL`] order, notes ascending within each wave.

use std::path::Path;

use wavetab_core::{SynthConfig, WaveTable, WaveType, midi_to_freq};

use crate::Result;

/// Tables per wave type, one per MIDI note.
pub const MIDI_NOTE_COUNT: usize = 128;

/// Which tables a [`Mipmap`] contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipmapLayout {
    /// 128 tables for every wave type.
    #[default]
    Full,
    /// One sine table followed by 128 tables each for triangle, sawtooth
    /// and square. A sine has a single partial at every pitch.
    SingleSine,
}

impl MipmapLayout {
    /// Number of tables in this layout.
    pub fn table_count(self) -> usize {
        match self {
            MipmapLayout::Full => WaveType::ALL.len() * MIDI_NOTE_COUNT,
            MipmapLayout::SingleSine => 1 + (WaveType::ALL.len() - 1) * MIDI_NOTE_COUNT,
        }
    }

    /// `(wave, note)` for every table, in storage order.
    fn entries(self) -> impl Iterator<Item = (WaveType, u8)> {
        WaveType::ALL.into_iter().flat_map(move |wave| {
            let notes = if wave == WaveType::Sine && self == MipmapLayout::SingleSine {
                0..1
            } else {
                0..MIDI_NOTE_COUNT as u8
            };
            notes.map(move |note| (wave, note))
        })
    }

    /// Storage index of `(wave, note)`.
    fn index(self, wave: WaveType, note: usize) -> usize {
        let code = usize::from(wave.code());
        match self {
            MipmapLayout::Full => code * MIDI_NOTE_COUNT + note,
            MipmapLayout::SingleSine if wave == WaveType::Sine => 0,
            MipmapLayout::SingleSine => 1 + (code - 1) * MIDI_NOTE_COUNT + note,
        }
    }
}

/// A complete per-note table series.
#[derive(Debug, Clone)]
pub struct Mipmap {
    layout: MipmapLayout,
    tables: Vec<WaveTable>,
}

impl Mipmap {
    /// Build every table in `layout`.
    ///
    /// Note `n` is band-limited for `midi_to_freq(n)`. Fails if any note lies
    /// above the Nyquist frequency of `config`.
    pub fn build(config: &SynthConfig, layout: MipmapLayout) -> Result<Self> {
        Self::build_with(config, layout, |_, _| {})
    }

    /// Like [`Mipmap::build`], calling `progress(done, total)` after each table.
    pub fn build_with<F>(config: &SynthConfig, layout: MipmapLayout, mut progress: F) -> Result<Self>
    where
        F: FnMut(usize, usize),
    {
        let total = layout.table_count();
        let mut tables = Vec::with_capacity(total);
        for (wave, note) in layout.entries() {
            tables.push(WaveTable::build(wave, midi_to_freq(note), config)?);
            progress(tables.len(), total);
        }

        tracing::debug!(
            ?layout,
            tables = tables.len(),
            table_size = config.table_size,
            "built mipmap"
        );
        Ok(Self { layout, tables })
    }

    /// Layout the mipmap was built with.
    pub fn layout(&self) -> MipmapLayout {
        self.layout
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the mipmap has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All tables in storage order.
    pub fn tables(&self) -> &[WaveTable] {
        &self.tables
    }

    /// Table for `wave` at MIDI `note`, or `None` past the last note.
    ///
    /// In [`MipmapLayout::SingleSine`] every note maps to the one sine table.
    pub fn table(&self, wave: WaveType, note: u8) -> Option<&WaveTable> {
        let note = usize::from(note);
        if note >= MIDI_NOTE_COUNT {
            return None;
        }
        self.tables.get(self.layout.index(wave, note))
    }

    /// Every table's samples, concatenated in storage order.
    pub fn samples(&self) -> Vec<f64> {
        self.tables
            .iter()
            .flat_map(|t| t.samples().iter().copied())
            .collect()
    }

    /// Export the concatenated samples as raw little-endian `i32`.
    pub fn write_pcm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::write_pcm(path, &self.samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SynthConfig {
        SynthConfig::new(44100.0, 256).unwrap()
    }

    #[test]
    fn test_table_counts() {
        assert_eq!(MipmapLayout::Full.table_count(), 512);
        assert_eq!(MipmapLayout::SingleSine.table_count(), 385);
        assert_eq!(MipmapLayout::Full.entries().count(), 512);
        assert_eq!(MipmapLayout::SingleSine.entries().count(), 385);
    }

    #[test]
    fn test_index_matches_entry_order() {
        for layout in [MipmapLayout::Full, MipmapLayout::SingleSine] {
            for (i, (wave, note)) in layout.entries().enumerate() {
                assert_eq!(layout.index(wave, usize::from(note)), i, "{layout:?} {wave} {note}");
            }
        }
    }

    #[test]
    fn test_lookup() {
        let mipmap = Mipmap::build(&small_config(), MipmapLayout::SingleSine).unwrap();
        assert_eq!(mipmap.len(), 385);

        let sine = mipmap.table(WaveType::Sine, 100).unwrap();
        assert_eq!(sine.wave(), WaveType::Sine);

        let saw = mipmap.table(WaveType::Sawtooth, 69).unwrap();
        assert_eq!(saw.wave(), WaveType::Sawtooth);
        assert!((saw.frequency() - 440.0).abs() < 1e-9);
        assert!(mipmap.table(WaveType::Square, 128).is_none());
    }

    #[test]
    fn test_progress_reports_every_table() {
        let mut calls = 0;
        let mut last = (0, 0);
        Mipmap::build_with(&small_config(), MipmapLayout::Full, |done, total| {
            calls += 1;
            last = (done, total);
        })
        .unwrap();
        assert_eq!(calls, 512);
        assert_eq!(last, (512, 512));
    }
}
