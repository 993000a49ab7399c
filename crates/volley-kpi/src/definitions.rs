//! KPI catalogue, target bands and display grading

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use volley_core::{Error, Result};

/// Every KPI the engine computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    SideOutEfficiency,
    BreakPointRate,
    AttackKillPct,
    ReceptionQuality,
    DigRate,
    BlockKillPct,
    ServeInRate,
    AceRate,
    ServeErrorRate,
    AttackEfficiency,
    SetConversion,
    AceToErrorRatio,
    BlockTouchRate,
}

impl Kpi {
    pub const ALL: [Kpi; 13] = [
        Kpi::SideOutEfficiency,
        Kpi::BreakPointRate,
        Kpi::AttackKillPct,
        Kpi::ReceptionQuality,
        Kpi::DigRate,
        Kpi::BlockKillPct,
        Kpi::ServeInRate,
        Kpi::AceRate,
        Kpi::ServeErrorRate,
        Kpi::AttackEfficiency,
        Kpi::SetConversion,
        Kpi::AceToErrorRatio,
        Kpi::BlockTouchRate,
    ];

    pub fn key(&self) -> &'static str {
        self.definition().key
    }

    pub fn definition(&self) -> &'static KpiDefinition {
        &DEFINITIONS[*self as usize]
    }

    /// Whether the value is a proportion in [0, 1] that admits a
    /// binomial interval. Efficiency and ratio KPIs do not.
    pub fn is_proportion(&self) -> bool {
        !matches!(self, Kpi::AttackEfficiency | Kpi::AceToErrorRatio)
    }

    /// Whether the KPI is computed from classified rallies
    pub fn is_rally_based(&self) -> bool {
        matches!(self, Kpi::SideOutEfficiency | Kpi::BreakPointRate)
    }

    /// Whether a libero's rows may count toward this KPI in position
    /// breakdowns
    pub fn is_attack_or_block(&self) -> bool {
        matches!(
            self,
            Kpi::AttackKillPct | Kpi::AttackEfficiency | Kpi::BlockKillPct | Kpi::BlockTouchRate
        )
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Kpi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Kpi::ALL
            .into_iter()
            .find(|k| k.key() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown KPI '{}'", s.trim())))
    }
}

/// KPI grouping used by presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Scoring,
    Defense,
    Service,
    Efficiency,
}

/// Display grade of a value against its target band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    NoData,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Grade::NoData => "No data",
            Grade::Poor => "Poor",
            Grade::Fair => "Fair",
            Grade::Good => "Good",
            Grade::Excellent => "Excellent",
        })
    }
}

/// Target band {min, optimal, max}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBand {
    pub min: f64,
    pub optimal: f64,
    pub max: f64,
}

impl TargetBand {
    pub const fn new(min: f64, optimal: f64, max: f64) -> Self {
        Self { min, optimal, max }
    }

    /// Grade `value` honoring polarity.
    ///
    /// Higher-is-better: ≥ max Excellent, ≥ optimal Good, ≥ min Fair.
    /// Lower-is-better mirrors the band: ≤ min Excellent, ≤ optimal Good,
    /// ≤ max Fair.
    pub fn grade(&self, value: f64, lower_is_better: bool) -> Grade {
        if lower_is_better {
            if value <= self.min {
                Grade::Excellent
            } else if value <= self.optimal {
                Grade::Good
            } else if value <= self.max {
                Grade::Fair
            } else {
                Grade::Poor
            }
        } else if value >= self.max {
            Grade::Excellent
        } else if value >= self.optimal {
            Grade::Good
        } else if value >= self.min {
            Grade::Fair
        } else {
            Grade::Poor
        }
    }

    /// Whether `value` reaches the optimal target
    pub fn meets_target(&self, value: f64, lower_is_better: bool) -> bool {
        if lower_is_better {
            value <= self.optimal
        } else {
            value >= self.optimal
        }
    }
}

/// Static description of a KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub target: TargetBand,
    pub benchmark_amateur: f64,
    pub benchmark_pro: f64,
    pub lower_is_better: bool,
}

impl KpiDefinition {
    /// One-line tooltip: formula and optimal target
    pub fn tooltip(&self) -> String {
        if self.key == "ace_to_error_ratio" {
            format!("{}\n\nTarget: {:.1}", self.formula, self.target.optimal)
        } else {
            format!("{}\n\nTarget: {:.0}%", self.formula, self.target.optimal * 100.0)
        }
    }
}

// Indexed by `Kpi as usize`; order must match the enum.
static DEFINITIONS: [KpiDefinition; 13] = [
    KpiDefinition {
        key: "side_out_efficiency",
        name: "Receiving Point Rate",
        short_name: "Side-Out %",
        formula: "Points won on reception / Total reception rallies",
        description: "Share of points won when receiving serve.",
        category: Category::Scoring,
        target: TargetBand::new(0.50, 0.60, 0.70),
        benchmark_amateur: 0.45,
        benchmark_pro: 0.65,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "break_point_rate",
        name: "Serving Point Rate",
        short_name: "Break %",
        formula: "Points won on serve / Total serving rallies",
        description: "Share of points won when serving.",
        category: Category::Scoring,
        target: TargetBand::new(0.35, 0.45, 0.55),
        benchmark_amateur: 0.30,
        benchmark_pro: 0.50,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "attack_kill_pct",
        name: "Attack Kill %",
        short_name: "Kill %",
        formula: "Kills / Total attacks",
        description: "Share of attacks that end the rally in our favor.",
        category: Category::Scoring,
        target: TargetBand::new(0.35, 0.45, 0.55),
        benchmark_amateur: 0.30,
        benchmark_pro: 0.50,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "reception_quality",
        name: "Reception Quality",
        short_name: "Rec %",
        formula: "Good receptions / Total receptions",
        description: "Share of receptions that allow a full offensive option.",
        category: Category::Defense,
        target: TargetBand::new(0.60, 0.75, 0.85),
        benchmark_amateur: 0.55,
        benchmark_pro: 0.80,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "dig_rate",
        name: "Dig Rate",
        short_name: "Dig %",
        formula: "Successful digs / Total dig attempts",
        description: "Share of opponent attacks dug and kept in play.",
        category: Category::Defense,
        target: TargetBand::new(0.35, 0.50, 0.65),
        benchmark_amateur: 0.30,
        benchmark_pro: 0.55,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "block_kill_pct",
        name: "Block Kill %",
        short_name: "Block %",
        formula: "Block kills / Total block attempts",
        description: "Share of blocks that score directly.",
        category: Category::Defense,
        target: TargetBand::new(0.08, 0.15, 0.25),
        benchmark_amateur: 0.05,
        benchmark_pro: 0.20,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "serve_in_rate",
        name: "Serve In-Rate",
        short_name: "In %",
        formula: "(Aces + Good serves) / Total serves",
        description: "Share of serves that land in play.",
        category: Category::Service,
        target: TargetBand::new(0.85, 0.90, 0.95),
        benchmark_amateur: 0.80,
        benchmark_pro: 0.92,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "ace_rate",
        name: "Ace Rate",
        short_name: "Ace %",
        formula: "Aces / Total serves",
        description: "Share of serves that score directly.",
        category: Category::Service,
        target: TargetBand::new(0.03, 0.08, 0.15),
        benchmark_amateur: 0.03,
        benchmark_pro: 0.10,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "serve_error_rate",
        name: "Service Error Rate",
        short_name: "Err %",
        formula: "Serve errors / Total serves",
        description: "Share of serves lost to error. Lower is better.",
        category: Category::Service,
        target: TargetBand::new(0.05, 0.10, 0.15),
        benchmark_amateur: 0.15,
        benchmark_pro: 0.08,
        lower_is_better: true,
    },
    KpiDefinition {
        key: "attack_efficiency",
        name: "Attack Efficiency",
        short_name: "Eff %",
        formula: "(Kills - Errors - Blocked) / Total attacks",
        description: "Net attack result, penalizing errors and blocked attacks.",
        category: Category::Efficiency,
        target: TargetBand::new(0.15, 0.25, 0.40),
        benchmark_amateur: 0.10,
        benchmark_pro: 0.30,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "set_conversion",
        name: "Set Conversion",
        short_name: "Set %",
        formula: "Kills from sets / Total sets",
        description: "Share of sets converted into an attack kill.",
        category: Category::Efficiency,
        target: TargetBand::new(0.30, 0.40, 0.50),
        benchmark_amateur: 0.25,
        benchmark_pro: 0.45,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "ace_to_error_ratio",
        name: "Ace-to-Error Ratio",
        short_name: "A:E",
        formula: "Aces / Serve errors",
        description: "Aces earned per serve error conceded.",
        category: Category::Service,
        target: TargetBand::new(0.5, 1.0, 1.5),
        benchmark_amateur: 0.5,
        benchmark_pro: 1.5,
        lower_is_better: false,
    },
    KpiDefinition {
        key: "block_touch_rate",
        name: "Block Touch Rate",
        short_name: "Touch %",
        formula: "(Block kills + Touches + Blocks without kill) / Total block attempts",
        description: "Share of block attempts that contact the ball.",
        category: Category::Defense,
        target: TargetBand::new(0.10, 0.15, 0.25),
        benchmark_amateur: 0.10,
        benchmark_pro: 0.25,
        lower_is_better: false,
    },
];
