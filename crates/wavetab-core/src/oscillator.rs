//! Table-lookup oscillators with three detuning strategies.
//!
//! Every oscillator plays a shared [`WaveTable`] at a frequency, a detune in
//! cents and a linear output level, and **accumulates** into the caller's
//! buffer so several layers can be mixed by rendering them in turn.
//!
//! | Variant | Detune method |
//! |---------|---------------|
//! | [`StandardOscillator`] | Recomputes the playback frequency: `f · 2^(cents/1200)` |
//! | [`ResamplingOscillator`] | Renders undetuned, then resamples the rendered buffer |
//! | [`RealTimeResamplingOscillator`] | Same result as `Resampling`, sample by sample |
//!
//! The two resampling variants reproduce the interpolation artifacts of
//! pitch-shifting a rendered buffer rather than an ideal frequency shift.
//! For the same parameters they agree to within rounding at every sample
//! the offline variant reaches (see [`reachable_len`]).

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use libm::floor;

use crate::config::SynthConfig;
use crate::error::{Error, Result, ensure_finite, ensure_positive};
use crate::math::{cents_to_ratio, lerp};
use crate::wavetable::{WaveTable, WaveType};

/// A source that accumulates rendered samples into a buffer.
pub trait Oscillator {
    /// Add `buffer.len()` samples of output to `buffer`.
    ///
    /// Existing buffer contents are kept; nothing is clamped.
    fn render(&mut self, buffer: &mut [f64]);

    /// Return to the start of the waveform.
    fn reset(&mut self);

    /// The parameters the oscillator was created with.
    fn params(&self) -> &OscillatorParams;

    /// The table being played.
    fn table(&self) -> &WaveTable;
}

/// Frequency, detune and level of one oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorParams {
    /// Fundamental in Hz.
    pub frequency: f64,
    /// Pitch offset in cents.
    pub detune: f64,
    /// Linear output gain.
    pub level: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            detune: 0.0,
            level: 1.0,
        }
    }
}

impl OscillatorParams {
    /// Parameters at `frequency` Hz, no detune, unity level.
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }

    /// Set the detune in cents.
    pub fn with_detune(mut self, detune: f64) -> Self {
        self.detune = detune;
        self
    }

    /// Set the linear output level.
    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    /// Frequency must be positive, level finite and detune within
    /// [`MAX_DETUNE_CENTS`] either way.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("frequency", self.frequency)?;
        ensure_finite("detune", self.detune)?;
        ensure_finite("level", self.level)?;
        if self.detune.abs() > MAX_DETUNE_CENTS {
            return Err(Error::invalid(
                "detune",
                alloc::format!(
                    "{} cents is outside +/-{MAX_DETUNE_CENTS} cents",
                    self.detune
                ),
            ));
        }
        Ok(())
    }

    /// Ratio applied by the detune, `2^(detune/1200)`.
    #[inline]
    pub fn playback_rate(&self) -> f64 {
        cents_to_ratio(self.detune)
    }
}

/// Largest detune magnitude accepted, in cents (100 octaves).
///
/// Keeps `2^(detune/1200)` and every table position derived from it finite
/// and non-zero.
pub const MAX_DETUNE_CENTS: f64 = 120_000.0;

/// Which detuning strategy an oscillator uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OscillatorKind {
    /// [`StandardOscillator`].
    #[default]
    Standard,
    /// [`ResamplingOscillator`].
    Resampling,
    /// [`RealTimeResamplingOscillator`].
    #[cfg_attr(feature = "serde", serde(alias = "realtime"))]
    RealTimeResampling,
}

impl OscillatorKind {
    /// All variants.
    pub const ALL: [OscillatorKind; 3] = [
        OscillatorKind::Standard,
        OscillatorKind::Resampling,
        OscillatorKind::RealTimeResampling,
    ];

    /// Name used in patches and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            OscillatorKind::Standard => "standard",
            OscillatorKind::Resampling => "resampling",
            OscillatorKind::RealTimeResampling => "real_time_resampling",
        }
    }
}

impl fmt::Display for OscillatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OscillatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(OscillatorKind::Standard),
            "resampling" | "offline" => Ok(OscillatorKind::Resampling),
            "real_time_resampling" | "realtime_resampling" | "realtime" | "real_time" => {
                Ok(OscillatorKind::RealTimeResampling)
            }
            _ => Err(Error::UnknownOscillatorKind(s.to_string())),
        }
    }
}

/// Table positions advanced per output sample at `frequency · ratio`.
#[inline]
fn phase_increment(frequency: f64, ratio: f64, table: &WaveTable) -> f64 {
    frequency * ratio / table.sample_rate() * table.len() as f64
}

/// Number of output samples the offline [`ResamplingOscillator`] writes into
/// a buffer of `len` samples at `playback_rate`.
///
/// Output index `i` reads intermediate positions `floor(i·rate)` and its
/// successor; rendering stops at the first index whose successor falls off
/// the end. That is `ceil((len - 1) / rate)` in exact arithmetic; the count
/// is settled with the same floating-point test the oscillator uses.
///
/// # Example
///
/// ```rust
/// use wavetab_core::reachable_len;
///
/// assert_eq!(reachable_len(100, 1.0), 99);
/// assert_eq!(reachable_len(101, 2.0), 50);
/// assert_eq!(reachable_len(100, 0.5), 100);
/// assert_eq!(reachable_len(1, 1.0), 0);
/// ```
pub fn reachable_len(len: usize, playback_rate: f64) -> usize {
    if len < 2 || !playback_rate.is_finite() || playback_rate <= 0.0 {
        return 0;
    }
    let fits = |i: usize| (floor(i as f64 * playback_rate) as usize) < len - 1;
    let estimate = libm::ceil((len - 1) as f64 / playback_rate);
    let mut n = if estimate >= len as f64 {
        len
    } else {
        estimate as usize
    };
    while n > 0 && !fits(n - 1) {
        n -= 1;
    }
    while n < len && fits(n) {
        n += 1;
    }
    n
}

/// Detunes by recomputing the playback frequency.
///
/// Output sample `n` reads the table at `n · incr` with
/// `incr = f · 2^(cents/1200) / fs · table_size`. `n` counts samples since
/// construction or the last [`reset`](Oscillator::reset), so consecutive
/// renders continue the waveform seamlessly.
///
/// # Example
///
/// ```rust
/// use wavetab_core::{Oscillator, OscillatorParams, StandardOscillator, SynthConfig, WaveType};
///
/// let params = OscillatorParams::new(43.65).with_detune(3.0).with_level(0.5);
/// let mut osc = StandardOscillator::new(WaveType::Sawtooth, params, &SynthConfig::default()).unwrap();
///
/// let mut buffer = vec![0.0; 512];
/// osc.render(&mut buffer);
/// assert!(buffer.iter().all(|s| s.abs() <= 0.5 + 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct StandardOscillator {
    table: Arc<WaveTable>,
    params: OscillatorParams,
    /// Table positions per output sample
    incr: f64,
    /// Samples rendered since the last reset
    position: u64,
}

impl StandardOscillator {
    /// Build a table for `wave` band-limited at the oscillator's frequency and
    /// play it.
    pub fn new(wave: WaveType, params: OscillatorParams, config: &SynthConfig) -> Result<Self> {
        params.validate()?;
        let table = WaveTable::build(wave, params.frequency, config)?;
        Self::with_table(Arc::new(table), params)
    }

    /// Play an existing table.
    pub fn with_table(table: Arc<WaveTable>, params: OscillatorParams) -> Result<Self> {
        params.validate()?;
        let incr = ensure_finite(
            "phase increment",
            phase_increment(params.frequency, params.playback_rate(), &table),
        )?;
        Ok(Self {
            table,
            params,
            incr,
            position: 0,
        })
    }

    /// Table positions advanced per output sample.
    pub fn increment(&self) -> f64 {
        self.incr
    }

    /// Samples rendered since the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Oscillator for StandardOscillator {
    fn render(&mut self, buffer: &mut [f64]) {
        let start = self.position;
        self.position += buffer.len() as u64;
        let level = self.params.level;
        if level == 0.0 {
            return;
        }
        for (n, sample) in (start..).zip(buffer.iter_mut()) {
            *sample += self.table.read(n as f64 * self.incr) * level;
        }
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn params(&self) -> &OscillatorParams {
        &self.params
    }

    fn table(&self) -> &WaveTable {
        &self.table
    }
}

/// Detunes by resampling an undetuned render (offline, two stages).
///
/// Each call first renders `buffer.len()` samples at detune 0 into an
/// internal buffer, then reads that buffer at `i · 2^(cents/1200)` with linear
/// interpolation and no wraparound. Output stops at the first index whose
/// right interpolation point lies past the end, so a sharp detune leaves the
/// tail of `buffer` untouched; [`rendered_len`](Self::rendered_len) reports
/// how far it got.
///
/// Every render starts from the beginning of the waveform.
#[derive(Debug, Clone)]
pub struct ResamplingOscillator {
    source: StandardOscillator,
    params: OscillatorParams,
    playback_rate: f64,
    intermediate: Vec<f64>,
    rendered_len: usize,
}

impl ResamplingOscillator {
    /// Build a table for `wave` at the oscillator's frequency and play it.
    pub fn new(wave: WaveType, params: OscillatorParams, config: &SynthConfig) -> Result<Self> {
        params.validate()?;
        let table = WaveTable::build(wave, params.frequency, config)?;
        Self::with_table(Arc::new(table), params)
    }

    /// Play an existing table.
    pub fn with_table(table: Arc<WaveTable>, params: OscillatorParams) -> Result<Self> {
        let source = StandardOscillator::with_table(table, params.with_detune(0.0))?;
        Ok(Self {
            source,
            params,
            playback_rate: params.playback_rate(),
            intermediate: Vec::new(),
            rendered_len: 0,
        })
    }

    /// Intermediate-buffer positions advanced per output sample.
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Samples written by the most recent render.
    pub fn rendered_len(&self) -> usize {
        self.rendered_len
    }
}

impl Oscillator for ResamplingOscillator {
    fn render(&mut self, buffer: &mut [f64]) {
        let len = buffer.len();
        self.intermediate.clear();
        self.intermediate.resize(len, 0.0);
        self.source.reset();
        self.source.render(&mut self.intermediate);

        let mut written = 0;
        if len < 2 {
            self.rendered_len = 0;
            return;
        }
        for (i, sample) in buffer.iter_mut().enumerate() {
            let x = i as f64 * self.playback_rate;
            let base = floor(x);
            let index = base as usize;
            if index >= len - 1 {
                break;
            }
            *sample += lerp(
                self.intermediate[index],
                self.intermediate[index + 1],
                x - base,
            );
            written += 1;
        }
        self.rendered_len = written;
    }

    fn reset(&mut self) {
        self.source.reset();
        self.rendered_len = 0;
    }

    fn params(&self) -> &OscillatorParams {
        &self.params
    }

    fn table(&self) -> &WaveTable {
        self.source.table()
    }
}

/// The offline resampling scheme computed one sample at a time.
///
/// For output position `i` the virtual intermediate position `i · rate` is
/// split into `j + θ`; the undetuned render at `j` and `j + 1` is recomputed
/// straight from the table, then the two are interpolated by `θ`. No
/// intermediate buffer exists, so there is no tail cutoff and the position
/// carries over between renders.
#[derive(Debug, Clone)]
pub struct RealTimeResamplingOscillator {
    table: Arc<WaveTable>,
    params: OscillatorParams,
    /// Table positions per intermediate sample (undetuned)
    incr: f64,
    playback_rate: f64,
    position: u64,
}

impl RealTimeResamplingOscillator {
    /// Build a table for `wave` at the oscillator's frequency and play it.
    pub fn new(wave: WaveType, params: OscillatorParams, config: &SynthConfig) -> Result<Self> {
        params.validate()?;
        let table = WaveTable::build(wave, params.frequency, config)?;
        Self::with_table(Arc::new(table), params)
    }

    /// Play an existing table.
    pub fn with_table(table: Arc<WaveTable>, params: OscillatorParams) -> Result<Self> {
        params.validate()?;
        let incr = ensure_finite(
            "phase increment",
            phase_increment(params.frequency, cents_to_ratio(0.0), &table),
        )?;
        Ok(Self {
            table,
            params,
            incr,
            playback_rate: params.playback_rate(),
            position: 0,
        })
    }

    /// Intermediate positions advanced per output sample.
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Samples rendered since the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Oscillator for RealTimeResamplingOscillator {
    fn render(&mut self, buffer: &mut [f64]) {
        let start = self.position;
        self.position += buffer.len() as u64;
        let level = self.params.level;
        if level == 0.0 {
            return;
        }
        for (i, sample) in (start..).zip(buffer.iter_mut()) {
            let x = i as f64 * self.playback_rate;
            let base = floor(x);
            let theta = x - base;
            let j = base as u64;
            let left = self.table.read(j as f64 * self.incr);
            let right = self.table.read(j.saturating_add(1) as f64 * self.incr);
            *sample += lerp(left, right, theta) * level;
        }
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn params(&self) -> &OscillatorParams {
        &self.params
    }

    fn table(&self) -> &WaveTable {
        &self.table
    }
}

/// Create an oscillator of the given kind over a shared table.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wavetab_core::{build_oscillator, OscillatorKind, OscillatorParams, SynthConfig, WaveTable, WaveType};
///
/// let table = Arc::new(WaveTable::build(WaveType::Square, 110.0, &SynthConfig::default()).unwrap());
/// let params = OscillatorParams::new(110.0).with_detune(-7.0);
///
/// let mut mix = vec![0.0; 256];
/// for kind in OscillatorKind::ALL {
///     let mut osc = build_oscillator(kind, Arc::clone(&table), params).unwrap();
///     osc.render(&mut mix);
/// }
/// ```
pub fn build_oscillator(
    kind: OscillatorKind,
    table: Arc<WaveTable>,
    params: OscillatorParams,
) -> Result<Box<dyn Oscillator + Send>> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        kind = kind.name(),
        wave = table.wave().name(),
        frequency = params.frequency,
        detune = params.detune,
        level = params.level,
        "oscillator created"
    );

    Ok(match kind {
        OscillatorKind::Standard => Box::new(StandardOscillator::with_table(table, params)?),
        OscillatorKind::Resampling => Box::new(ResamplingOscillator::with_table(table, params)?),
        OscillatorKind::RealTimeResampling => {
            Box::new(RealTimeResamplingOscillator::with_table(table, params)?)
        }
    })
}
