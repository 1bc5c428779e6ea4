//! Factory patches bundled with the library.
//!
//! The first four are the detuning comparison at 43.65 Hz (F1): a plain
//! sawtooth, then a 3-cent detuned copy layered on top by each detune
//! method. The allpass patches pass a detuned sawtooth through one filter of
//! each family, for comparing phase smearing with resampling dullness.

use crate::Patch;

/// Names of the factory patches.
pub static FACTORY_PATCH_NAMES: &[&str] = &[
    "standard",
    "detuned_standard",
    "detuned_resampling",
    "realtime_resampling",
    "biquad_allpass",
    "modulated_allpass",
];

/// TOML content for factory patches, embedded at compile time.
static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("standard", STANDARD_PATCH),
    ("detuned_standard", DETUNED_STANDARD_PATCH),
    ("detuned_resampling", DETUNED_RESAMPLING_PATCH),
    ("realtime_resampling", REALTIME_RESAMPLING_PATCH),
    ("biquad_allpass", BIQUAD_ALLPASS_PATCH),
    ("modulated_allpass", MODULATED_ALLPASS_PATCH),
];

const STANDARD_PATCH: &str = r#"
name = "Standard"
description = "Band-limited F1 sawtooth"
duration = 4.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
level = 1.0
"#;

const DETUNED_STANDARD_PATCH: &str = r#"
name = "Detuned Standard"
description = "F1 sawtooth plus a copy 3 cents sharp, detuned by frequency"
duration = 4.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
level = 0.5

[[layers]]
wave = "sawtooth"
frequency = 43.65
detune = 3.0
level = 0.5
"#;

const DETUNED_RESAMPLING_PATCH: &str = r#"
name = "Detuned Resampling"
description = "F1 sawtooth plus a copy 3 cents sharp, detuned by resampling a rendered buffer"
duration = 4.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
level = 0.5

[[layers]]
wave = "sawtooth"
kind = "resampling"
frequency = 43.65
detune = 3.0
level = 0.5
"#;

const REALTIME_RESAMPLING_PATCH: &str = r#"
name = "Realtime Resampling"
description = "Detuned Resampling computed sample by sample"
duration = 4.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
level = 0.5

[[layers]]
wave = "sawtooth"
kind = "real_time_resampling"
frequency = 43.65
detune = 3.0
level = 0.5
"#;

const BIQUAD_ALLPASS_PATCH: &str = r#"
name = "Biquad Allpass"
description = "3-cent sawtooth through a wide second-order allpass at 18 kHz"
duration = 1.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
detune = 3.0
level = 1.0

[[filters]]
type = "biquad_allpass"
frequency = 18000.0
q = 0.1
"#;

const MODULATED_ALLPASS_PATCH: &str = r#"
name = "Modulated Allpass"
description = "3-cent sawtooth through a first-order allpass with an audio-rate coefficient"
duration = 1.0

[[layers]]
wave = "sawtooth"
frequency = 43.65
detune = 3.0
level = 1.0

[[filters]]
type = "modulated_allpass"
offset = 0.5
amplitude = 1.0
rate = 64000.0
"#;

/// Get all factory patches.
///
/// A patch that fails to parse is skipped; the unit tests guarantee none do.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Get a factory patch by id (`detuned_resampling`) or display name
/// (`Detuned Resampling`), case-insensitively.
pub fn get_factory_patch(name: &str) -> Option<Patch> {
    let wanted = name.trim().to_lowercase();
    FACTORY_PATCHES_TOML
        .iter()
        .find(|(id, _)| *id == wanted)
        .and_then(|(_, toml)| Patch::from_toml(toml).ok())
        .or_else(|| {
            factory_patches()
                .into_iter()
                .find(|p| p.name.to_lowercase() == wanted)
        })
}

/// Get the list of factory patch ids.
pub fn factory_patch_names() -> &'static [&'static str] {
    FACTORY_PATCH_NAMES
}

/// Check if `name` refers to a factory patch.
pub fn is_factory_patch(name: &str) -> bool {
    get_factory_patch(name).is_some()
}
