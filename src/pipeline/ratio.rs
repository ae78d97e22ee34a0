//! Bold-ratio calculation.
//!
//! Longer words need a smaller bolded share to stay recognisable, so the
//! ratio falls off with `log2(len + 1)`. The 0.3 floor keeps a visible cue
//! on very long words; the per-script ceiling bounds how much of a short
//! word is bolded.

use crate::config::BionicConfig;
use crate::pipeline::segment::ScriptClass;

/// Lower bound for every script.
pub const MIN_RATIO: f64 = 0.3;
/// Upper bound for CJK tokens.
pub const MAX_CJK_RATIO: f64 = 1.0;
/// Upper bound for Latin tokens.
pub const MAX_LATIN_RATIO: f64 = 0.5;

/// Fraction of a token of `len` characters that should be bolded.
///
/// `Other` tokens are never bolded and get `0.0`. `len` of zero is treated
/// as one.
pub fn bold_ratio(class: ScriptClass, len: usize, config: &BionicConfig) -> f64 {
    let denom = ((len.max(1) + 1) as f64).log2();
    match class {
        ScriptClass::Cjk => (config.chinese_ratio / denom).clamp(MIN_RATIO, MAX_CJK_RATIO),
        ScriptClass::Latin => (config.english_ratio / denom).clamp(MIN_RATIO, MAX_LATIN_RATIO),
        ScriptClass::Other => 0.0,
    }
}

/// Number of leading characters to bold, always within `1..=len` for CJK and
/// Latin tokens.
///
/// A single CJK character is bolded whole: there is no partial cue to give.
pub fn prefix_length(class: ScriptClass, len: usize, config: &BionicConfig) -> usize {
    if len == 0 || class == ScriptClass::Other {
        return 0;
    }
    if class == ScriptClass::Cjk && len == 1 {
        return 1;
    }
    let ratio = bold_ratio(class, len, config);
    ((len as f64 * ratio).ceil() as usize).clamp(1, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BionicConfig {
        BionicConfig::default()
    }

    #[test]
    fn latin_three_letter_word_hits_the_floor() {
        // 0.4 / log2(4) = 0.2 -> clamped up to 0.3 -> ceil(0.9) = 1
        let r = bold_ratio(ScriptClass::Latin, 3, &cfg());
        assert!((r - 0.3).abs() < 1e-9, "got {r}");
        assert_eq!(prefix_length(ScriptClass::Latin, 3, &cfg()), 1);
    }

    #[test]
    fn latin_known_prefixes() {
        let c = cfg();
        assert_eq!(prefix_length(ScriptClass::Latin, 5, &c), 2); // ceil(1.5)
        assert_eq!(prefix_length(ScriptClass::Latin, 6, &c), 2); // ceil(1.8)
        assert_eq!(prefix_length(ScriptClass::Latin, 7, &c), 3); // ceil(2.1)
        assert_eq!(prefix_length(ScriptClass::Latin, 10, &c), 3);
    }

    #[test]
    fn cjk_known_prefixes() {
        let c = cfg();
        // 1 / log2(3) ≈ 0.63 -> ceil(1.26) = 2
        assert_eq!(prefix_length(ScriptClass::Cjk, 2, &c), 2);
        // 1 / log2(5) ≈ 0.43 -> ceil(1.72) = 2
        assert_eq!(prefix_length(ScriptClass::Cjk, 4, &c), 2);
    }

    #[test]
    fn single_cjk_character_is_fully_bolded_whatever_the_ratio() {
        let c = BionicConfig {
            chinese_ratio: 0.01,
            ..cfg()
        };
        assert_eq!(prefix_length(ScriptClass::Cjk, 1, &c), 1);
    }

    #[test]
    fn ratios_stay_in_bounds() {
        let configs = [
            cfg(),
            BionicConfig {
                chinese_ratio: 100.0,
                english_ratio: 100.0,
                ..cfg()
            },
            BionicConfig {
                chinese_ratio: 0.001,
                english_ratio: 0.001,
                ..cfg()
            },
        ];
        for c in &configs {
            for len in 1..=500 {
                let cjk = bold_ratio(ScriptClass::Cjk, len, c);
                let latin = bold_ratio(ScriptClass::Latin, len, c);
                assert!((MIN_RATIO..=MAX_CJK_RATIO).contains(&cjk), "cjk {len}: {cjk}");
                assert!((MIN_RATIO..=MAX_LATIN_RATIO).contains(&latin), "latin {len}: {latin}");
                for class in [ScriptClass::Cjk, ScriptClass::Latin] {
                    let p = prefix_length(class, len, c);
                    assert!((1..=len).contains(&p), "{class:?} {len}: {p}");
                }
            }
        }
    }

    #[test]
    fn other_class_is_never_bolded() {
        assert_eq!(bold_ratio(ScriptClass::Other, 4, &cfg()), 0.0);
        assert_eq!(prefix_length(ScriptClass::Other, 4, &cfg()), 0);
    }
}
