use crate::types::score::{AnalyzerKind, Category, PartialScore};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkillLevel {
    Expert,
    Advanced,
    Intermediate,
    Beginner,
    Novice,
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expert => "Expert",
            Self::Advanced => "Advanced",
            Self::Intermediate => "Intermediate",
            Self::Beginner => "Beginner",
            Self::Novice => "Novice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Trophy,
    Silver,
    Bronze,
    Seedling,
}

impl Badge {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Trophy => "🏆",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
            Self::Seedling => "🌱",
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub score: u32,
    pub max_score: u32,
}

impl From<&PartialScore> for ScoreView {
    fn from(partial: &PartialScore) -> Self {
        Self {
            score: partial.score,
            max_score: partial.max_score,
        }
    }
}

/// Display categories in fixed order; serializes as a JSON object keyed by label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScores(pub Vec<(Category, ScoreView)>);

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, view) in &self.0 {
            map.serialize_entry(category.label(), view)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub overall_score: u8,
    pub skill_level: SkillLevel,
    pub badge: Badge,
    pub summary: String,
    pub roadmap: Vec<String>,
    pub scores: CategoryScores,
    #[serde(skip)]
    pub analyzers: Vec<(AnalyzerKind, PartialScore)>,
}

impl Report {
    pub fn issue_count(&self) -> usize {
        self.analyzers
            .iter()
            .map(|(_, partial)| partial.issues.len())
            .sum()
    }
}
