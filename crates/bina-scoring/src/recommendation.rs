//! Risk tiers and their recommendation text.

use bina_core::enums::ModelVariant;
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// `>= 0.7` high, `>= 0.4` medium, otherwise low.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Advice text (Indonesian). The standard set also suggests picture
    /// exercises; the compact set matches the legacy three-feature model.
    #[must_use]
    pub const fn recommendation(self, variant: ModelVariant) -> &'static str {
        match (variant, self) {
            (ModelVariant::Standard, Self::High) => {
                "Risiko tinggi: rujuk evaluasi profesional; fokus modul huruf dasar, ejaan pelan dengan audio, dan latihan pengenalan gambar tingkat dasar."
            }
            (ModelVariant::Standard, Self::Medium) => {
                "Risiko sedang: latihan ejaan interaktif, permainan susun kata, dan latihan gambar berpasangan."
            }
            (ModelVariant::Compact, Self::High) => {
                "Risiko tinggi: rujuk evaluasi profesional; mulai modul huruf dasar dan ejaan pelan dengan panduan audio."
            }
            (ModelVariant::Compact, Self::Medium) => {
                "Risiko sedang: fokuskan latihan ejaan interaktif dan permainan susun kata level dasar."
            }
            (_, Self::Low) => "Risiko rendah: lanjutkan latihan bertahap dan pemantauan konsistensi.",
        }
    }
}
